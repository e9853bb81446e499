// Shared fixtures for the integration tests
#![allow(dead_code)]

use std::sync::Arc;
use uuid::Uuid;

use rehab_course_composer::catalog::InMemoryCatalog;
use rehab_course_composer::models::{
    BodyPartExerciseMapping, BodyPartSelection, CourseRequest, ExerciseTemplate,
};
use rehab_course_composer::services::CourseComposerService;

pub const BACK: Uuid = Uuid::from_u128(0xB001);
pub const KNEE: Uuid = Uuid::from_u128(0xB002);
pub const SHOULDER: Uuid = Uuid::from_u128(0xB003);

/// Template id used by the fixtures
pub fn tid(n: u128) -> Uuid {
    Uuid::from_u128(0xE000 + n)
}

/// Demo catalog template id
pub fn demo_tid(n: u128) -> Uuid {
    Uuid::from_u128(0x2000 + n)
}

pub fn composer(catalog: InMemoryCatalog) -> CourseComposerService {
    CourseComposerService::new(Arc::new(catalog))
}

pub fn selection(id: Uuid, name: &str, pain: u8) -> BodyPartSelection {
    BodyPartSelection::new(id, name, pain)
}

pub fn request(selections: Vec<BodyPartSelection>, pain: u8, equipment: &[&str]) -> CourseRequest {
    CourseRequest::new(selections, pain)
        .with_equipment(equipment.iter().copied())
        .with_duration(60)
}

pub fn catalog_with_parts() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_body_part(BACK, "허리")
        .with_body_part(KNEE, "무릎")
        .with_body_part(SHOULDER, "어깨")
}

/// Catalog where 허리 and 무릎 share one main exercise
pub fn shared_template_catalog() -> InMemoryCatalog {
    catalog_with_parts()
        .with_template(ExerciseTemplate::new(tid(1), "브릿지").intensity(3).difficulty(3).duration(6))
        .with_template(ExerciseTemplate::new(tid(2), "골반 기울이기").intensity(1).difficulty(1).duration(3))
        .with_template(ExerciseTemplate::new(tid(3), "뒤꿈치 밀기").intensity(1).difficulty(1).duration(3))
        .with_template(ExerciseTemplate::new(tid(4), "스텝 업").intensity(3).difficulty(4).duration(5))
        .with_mapping(BodyPartExerciseMapping::new(BACK, tid(1), 1))
        .with_mapping(BodyPartExerciseMapping::new(BACK, tid(2), 2))
        .with_mapping(BodyPartExerciseMapping::new(KNEE, tid(1), 1))
        .with_mapping(BodyPartExerciseMapping::new(KNEE, tid(3), 2))
        .with_mapping(BodyPartExerciseMapping::new(KNEE, tid(4), 3))
}

/// Catalog whose main exercises differ only by equipment
pub fn equipment_catalog() -> InMemoryCatalog {
    catalog_with_parts()
        .with_template(ExerciseTemplate::new(tid(10), "바벨 로우").intensity(3).difficulty(3).duration(5).equipment(["바벨"]))
        .with_template(ExerciseTemplate::new(tid(11), "덤벨 로우").intensity(3).difficulty(3).duration(5).equipment(["덤벨"]))
        .with_template(ExerciseTemplate::new(tid(12), "맨몸 슈퍼맨").intensity(3).difficulty(3).duration(5).equipment(["없음"]))
        .with_template(ExerciseTemplate::new(tid(13), "밴드 풀어파트").intensity(3).difficulty(3).duration(5).equipment(["밴드", "덤벨"]))
        .with_template(ExerciseTemplate::new(tid(14), "무릎 대고 푸시업").intensity(3).difficulty(3).duration(5).equipment(["없음", "매트"]))
        .with_mapping(BodyPartExerciseMapping::new(SHOULDER, tid(10), 1))
        .with_mapping(BodyPartExerciseMapping::new(SHOULDER, tid(11), 2))
        .with_mapping(BodyPartExerciseMapping::new(SHOULDER, tid(12), 3))
        .with_mapping(BodyPartExerciseMapping::new(SHOULDER, tid(13), 4))
        .with_mapping(BodyPartExerciseMapping::new(SHOULDER, tid(14), 5))
}

/// Catalog with only gentle exercises, nothing reaches the main section
pub fn warmup_only_catalog() -> InMemoryCatalog {
    catalog_with_parts()
        .with_template(ExerciseTemplate::new(tid(20), "목 돌리기").intensity(1).difficulty(1).duration(3))
        .with_template(ExerciseTemplate::new(tid(21), "어깨 으쓱").intensity(2).difficulty(1).duration(3))
        .with_template(ExerciseTemplate::new(tid(22), "팔 흔들기").intensity(1).difficulty(2).duration(3))
        .with_mapping(BodyPartExerciseMapping::new(SHOULDER, tid(20), 1))
        .with_mapping(BodyPartExerciseMapping::new(SHOULDER, tid(21), 2))
        .with_mapping(BodyPartExerciseMapping::new(SHOULDER, tid(22), 3))
}
