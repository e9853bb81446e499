use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

use super::{
    BodyPartSelection, Condition, DifficultyAdjustment, DifficultyTier, RehabPhase,
    VolumeAdjustment,
};

/// Session lengths a course can be composed for
pub const ALLOWED_SESSION_MINUTES: [u32; 3] = [60, 90, 120];

/// Phase of a generated session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Warmup,
    Main,
    Cooldown,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Warmup, Section::Main, Section::Cooldown];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Warmup => "warmup",
            Section::Main => "main",
            Section::Cooldown => "cooldown",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Course generation request as received at the web boundary
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    #[validate(length(min = 1, max = 5, message = "Select between 1 and 5 body parts"), nested)]
    pub body_parts: Vec<BodyPartSelection>,

    #[validate(range(min = 1, max = 5, message = "Pain level must be between 1 and 5"))]
    pub pain_level: u8,

    #[serde(default)]
    pub equipment_available: Vec<String>,

    #[validate(length(max = 20, message = "Experience level must be at most 20 characters"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,

    /// 60, 90 or 120
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_duration_minutes: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rehab_phase: Option<RehabPhase>,

    #[validate(range(min = 1, max = 5, message = "Fitness level must be between 1 and 5"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_level: Option<u8>,
}

impl CourseRequest {
    pub fn new(body_parts: Vec<BodyPartSelection>, pain_level: u8) -> Self {
        Self {
            body_parts,
            pain_level,
            equipment_available: Vec::new(),
            experience_level: None,
            total_duration_minutes: None,
            condition: None,
            rehab_phase: None,
            fitness_level: None,
        }
    }

    pub fn with_equipment<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.equipment_available = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_experience(mut self, level: impl Into<String>) -> Self {
        self.experience_level = Some(level.into());
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.total_duration_minutes = Some(minutes);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_rehab_phase(mut self, phase: RehabPhase, fitness_level: Option<u8>) -> Self {
        self.rehab_phase = Some(phase);
        self.fitness_level = fitness_level;
        self
    }
}

/// One exercise of a composed course, possibly serving several body parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedExercise {
    pub exercise_template_id: Uuid,
    pub name: String,
    pub body_part_ids: Vec<Uuid>,
    pub section: Section,
    pub order_in_section: u32,
    /// Higher ranks first
    pub priority_score: f64,
    pub intensity_level: Option<u8>,
    pub difficulty_score: Option<u8>,
    pub tier: DifficultyTier,
    pub duration_minutes: Option<u32>,
    pub reps: Option<u32>,
    pub sets: Option<u32>,
    pub rest_seconds: Option<u32>,
    #[serde(default)]
    pub required_equipment: Vec<String>,
    /// Soft contraindication reasons
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cautions: Vec<String>,
    #[serde(skip)]
    pub cooldown_tagged: bool,
}

/// Time budget and actual allotment of one section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTime {
    pub budget_minutes: u32,
    pub allotted_minutes: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTimes {
    pub warmup: SectionTime,
    pub main: SectionTime,
    pub cooldown: SectionTime,
}

impl SectionTimes {
    pub fn get(&self, section: Section) -> SectionTime {
        match section {
            Section::Warmup => self.warmup,
            Section::Main => self.main,
            Section::Cooldown => self.cooldown,
        }
    }

    pub fn total_allotted(&self) -> u32 {
        self.warmup.allotted_minutes + self.main.allotted_minutes + self.cooldown.allotted_minutes
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStats {
    pub warmup: usize,
    pub main: usize,
    pub cooldown: usize,
    /// Exercise count per body-part name
    pub by_body_part: BTreeMap<String, usize>,
}

/// Alternatives offered for a hard-excluded exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Substitution {
    pub excluded_template_id: Uuid,
    pub excluded_template_name: String,
    pub body_part_id: Uuid,
    pub reason: String,
    pub alternative_template_ids: Vec<Uuid>,
}

/// Composed course returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub exercises: Vec<MergedExercise>,
    pub warnings: Vec<String>,
    pub total_duration_minutes: u32,
    pub sections: SectionTimes,
    pub stats: CourseStats,
    pub difficulty: DifficultyAdjustment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeAdjustment>,
    pub substitutions: Vec<Substitution>,
}

impl CourseResponse {
    pub fn section(&self, section: Section) -> impl Iterator<Item = &MergedExercise> {
        self.exercises.iter().filter(move |ex| ex.section == section)
    }
}

/// Accepted course handed to the persistence hook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCourseRequest {
    pub user_id: Uuid,
    pub total_duration_minutes: u32,
    pub pain_level: u8,
    #[serde(default)]
    pub experience_level: Option<String>,
    pub body_parts: Vec<String>,
    #[serde(default)]
    pub equipment_available: Vec<String>,
    pub exercises: Vec<MergedExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCourse {
    pub course_id: Uuid,
    pub exercise_count: usize,
    pub created_at: DateTime<Utc>,
}
