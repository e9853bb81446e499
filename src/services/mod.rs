// Business logic services

pub mod course_composer_service;
pub mod course_record_service;

pub use course_composer_service::CourseComposerService;
pub use course_record_service::CourseRecordService;
