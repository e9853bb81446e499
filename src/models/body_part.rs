use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Body part as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BodyPart {
    pub id: Uuid,
    pub name: String,
}

/// A body part picked by the user for one course request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BodyPartSelection {
    pub body_part_id: Uuid,

    #[validate(length(min = 1, max = 50, message = "Body part name must be 1-50 characters"))]
    pub body_part_name: String,

    /// 1 (barely noticeable) to 5 (severe)
    #[validate(range(min = 1, max = 5, message = "Pain level must be between 1 and 5"))]
    pub pain_level: u8,

    #[validate(range(min = 1, message = "Selection order must be positive"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_order: Option<u32>,
}

impl BodyPartSelection {
    pub fn new(body_part_id: Uuid, body_part_name: impl Into<String>, pain_level: u8) -> Self {
        Self {
            body_part_id,
            body_part_name: body_part_name.into(),
            pain_level,
            selection_order: None,
        }
    }

    pub fn with_selection_order(mut self, order: u32) -> Self {
        self.selection_order = Some(order);
        self
    }
}
