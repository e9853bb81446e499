use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::BodyPart;

/// Catalog exercise template, read-only to the composer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTemplate {
    pub id: Uuid,
    pub name: String,
    /// 1-5
    pub intensity_level: Option<u8>,
    /// 1-10
    pub difficulty_score: Option<u8>,
    pub duration_minutes: Option<u32>,
    pub reps: Option<u32>,
    pub sets: Option<u32>,
    pub rest_seconds: Option<u32>,
    /// Equipment names from the template's equipment mappings
    pub required_equipment: Vec<String>,
    /// Flagged at data entry as a cool-down (stretch / low intensity) exercise
    #[serde(default)]
    pub is_cooldown: bool,
    pub is_active: bool,
}

impl ExerciseTemplate {
    /// Bodyweight template with no optional numbers set
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            intensity_level: None,
            difficulty_score: None,
            duration_minutes: None,
            reps: None,
            sets: None,
            rest_seconds: None,
            required_equipment: vec!["none".to_string()],
            is_cooldown: false,
            is_active: true,
        }
    }

    pub fn intensity(mut self, level: u8) -> Self {
        self.intensity_level = Some(level);
        self
    }

    pub fn difficulty(mut self, score: u8) -> Self {
        self.difficulty_score = Some(score);
        self
    }

    pub fn duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn volume(mut self, reps: u32, sets: u32, rest_seconds: u32) -> Self {
        self.reps = Some(reps);
        self.sets = Some(sets);
        self.rest_seconds = Some(rest_seconds);
        self
    }

    pub fn equipment<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_equipment = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn cooldown(mut self) -> Self {
        self.is_cooldown = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Pain levels a body-part mapping applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PainLevelRange {
    All,
    Between { min: u8, max: u8 },
    Exactly(u8),
}

impl PainLevelRange {
    pub fn admits(&self, pain_level: u8) -> bool {
        match self {
            PainLevelRange::All => true,
            PainLevelRange::Between { min, max } => pain_level >= *min && pain_level <= *max,
            PainLevelRange::Exactly(level) => pain_level == *level,
        }
    }
}

impl FromStr for PainLevelRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(PainLevelRange::All);
        }

        if let Some((min, max)) = trimmed.split_once('-') {
            let min = min
                .trim()
                .parse::<u8>()
                .map_err(|_| format!("Invalid pain level range: {}", s))?;
            let max = max
                .trim()
                .parse::<u8>()
                .map_err(|_| format!("Invalid pain level range: {}", s))?;
            return Ok(PainLevelRange::Between { min, max });
        }

        trimmed
            .parse::<u8>()
            .map(PainLevelRange::Exactly)
            .map_err(|_| format!("Invalid pain level range: {}", s))
    }
}

impl TryFrom<String> for PainLevelRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PainLevelRange> for String {
    fn from(range: PainLevelRange) -> Self {
        range.to_string()
    }
}

impl fmt::Display for PainLevelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PainLevelRange::All => write!(f, "all"),
            PainLevelRange::Between { min, max } => write!(f, "{}-{}", min, max),
            PainLevelRange::Exactly(level) => write!(f, "{}", level),
        }
    }
}

/// Link between a body part and a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPartExerciseMapping {
    pub body_part_id: Uuid,
    pub exercise_template_id: Uuid,
    /// Lower value = higher precedence
    pub priority: i32,
    /// Overrides the template's intensity for this body part
    pub intensity_level: Option<u8>,
    pub pain_level_range: Option<PainLevelRange>,
    pub is_active: bool,
}

impl BodyPartExerciseMapping {
    pub fn new(body_part_id: Uuid, exercise_template_id: Uuid, priority: i32) -> Self {
        Self {
            body_part_id,
            exercise_template_id,
            priority,
            intensity_level: None,
            pain_level_range: None,
            is_active: true,
        }
    }

    pub fn intensity(mut self, level: u8) -> Self {
        self.intensity_level = Some(level);
        self
    }

    pub fn pain_range(mut self, range: PainLevelRange) -> Self {
        self.pain_level_range = Some(range);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// One row of the catalog's mapping read: mapping joined with its template
/// and body part
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub mapping: BodyPartExerciseMapping,
    pub template: ExerciseTemplate,
    pub body_part: BodyPart,
}
