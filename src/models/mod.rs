// Catalog entities, course DTOs and difficulty vocabulary

pub mod body_part;
pub mod exercise;
pub mod contraindication;
pub mod difficulty;
pub mod course;
pub mod validation;

pub use body_part::*;
pub use exercise::*;
pub use contraindication::*;
pub use difficulty::*;
pub use course::*;
pub use validation::*;
