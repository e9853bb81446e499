use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How strictly a contraindication applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Keep the exercise, attach a warning
    #[serde(alias = "warning")]
    Soft,
    /// Remove the exercise
    #[serde(alias = "strict")]
    Hard,
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "soft" | "warning" => Ok(Severity::Soft),
            "hard" | "strict" => Ok(Severity::Hard),
            other => Err(format!("Unknown contraindication severity: {}", other)),
        }
    }
}

/// Clinical condition of the injury
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    #[serde(alias = "급성")]
    Acute,
    #[serde(alias = "만성")]
    Chronic,
    #[serde(alias = "수술후")]
    PostSurgical,
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "acute" | "급성" => Ok(Condition::Acute),
            "chronic" | "만성" => Ok(Condition::Chronic),
            "post_surgical" | "post-surgical" | "수술후" => Ok(Condition::PostSurgical),
            other => Err(format!("Unknown condition: {}", other)),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Condition::Acute => "acute",
            Condition::Chronic => "chronic",
            Condition::PostSurgical => "post_surgical",
        };
        f.write_str(name)
    }
}

/// Catalog rule marking a template unsafe for a body part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contraindication {
    pub body_part_id: Uuid,
    pub exercise_template_id: Uuid,
    /// Applies from this pain level upwards; `None` applies at every level
    pub pain_level_min: Option<u8>,
    /// Applies only to this condition when both sides know the condition
    pub condition: Option<Condition>,
    pub severity: Severity,
    pub reason: Option<String>,
}

impl Contraindication {
    pub fn new(body_part_id: Uuid, exercise_template_id: Uuid, severity: Severity) -> Self {
        Self {
            body_part_id,
            exercise_template_id,
            pain_level_min: None,
            condition: None,
            severity,
            reason: None,
        }
    }

    pub fn from_pain_level(mut self, pain_level_min: u8) -> Self {
        self.pain_level_min = Some(pain_level_min);
        self
    }

    pub fn for_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Whether the rule is in force at the given pain level
    pub fn applies_at(&self, pain_level: u8) -> bool {
        self.pain_level_min.map_or(true, |min| min <= pain_level)
    }
}
