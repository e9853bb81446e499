use serde::{Deserialize, Serialize};
use std::fmt;

/// Score assumed for templates that carry no difficulty score
pub const DEFAULT_DIFFICULTY_SCORE: u8 = 5;

/// Three-band difficulty vocabulary used instead of raw scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTier {
    /// 원리 - fundamentals, safe low-load movements
    Principle,
    /// 적응 - progressive adaptation
    Adaptation,
    /// 도움 - advanced, independent execution
    Mastery,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Principle,
        DifficultyTier::Adaptation,
        DifficultyTier::Mastery,
    ];

    /// Classify a difficulty score (1-10) into its tier.
    ///
    /// Bands are principle 1-4, adaptation 5-7 and mastery 8-10. Out-of-range
    /// scores saturate into the nearest band.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=4 => DifficultyTier::Principle,
            5..=7 => DifficultyTier::Adaptation,
            _ => DifficultyTier::Mastery,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyTier::Principle => "원리",
            DifficultyTier::Adaptation => "적응",
            DifficultyTier::Mastery => "도움",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DifficultyTier::Principle => "principle",
            DifficultyTier::Adaptation => "adaptation",
            DifficultyTier::Mastery => "mastery",
        };
        f.write_str(name)
    }
}

/// Self-reported training experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    /// Normalize free-form experience input.
    ///
    /// Accepts the canonical names, the onboarding form codes
    /// (`rarely`, `weekly_1_2`, `weekly_3_plus`) and the Korean answers to
    /// "how often do you exercise". Unknown or missing input is a beginner.
    pub fn normalize(input: Option<&str>) -> Self {
        let normalized = match input {
            Some(raw) => raw.trim().to_lowercase(),
            None => return ExperienceLevel::Beginner,
        };

        match normalized.as_str() {
            "rarely" | "beginner" | "초보" => return ExperienceLevel::Beginner,
            "weekly_1_2" | "intermediate" | "중급" => return ExperienceLevel::Intermediate,
            "weekly_3_plus" | "advanced" | "고급" | "경험자" => return ExperienceLevel::Advanced,
            _ => {}
        }

        if ["거의 안", "안 함", "없음"]
            .iter()
            .any(|needle| normalized.contains(needle))
        {
            return ExperienceLevel::Beginner;
        }

        if ["주1", "주 1"].iter().any(|needle| normalized.contains(needle)) {
            return ExperienceLevel::Intermediate;
        }

        if ["주3", "주 3"].iter().any(|needle| normalized.contains(needle)) {
            return ExperienceLevel::Advanced;
        }

        ExperienceLevel::Beginner
    }

    /// Tier a user of this experience starts from before pain overrides
    pub fn base_tier(&self) -> DifficultyTier {
        match self {
            ExperienceLevel::Beginner => DifficultyTier::Principle,
            ExperienceLevel::Intermediate => DifficultyTier::Adaptation,
            ExperienceLevel::Advanced => DifficultyTier::Mastery,
        }
    }
}

/// Inclusive difficulty-score range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyRange {
    pub min: u8,
    pub max: u8,
}

impl DifficultyRange {
    pub const FULL: DifficultyRange = DifficultyRange { min: 1, max: 10 };

    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, score: u8) -> bool {
        score >= self.min && score <= self.max
    }

    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }
}

/// Share of the session (in percent) spent at each tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyRatio {
    pub principle: u8,
    pub adaptation: u8,
    pub mastery: u8,
}

impl DifficultyRatio {
    pub const fn new(principle: u8, adaptation: u8, mastery: u8) -> Self {
        Self {
            principle,
            adaptation,
            mastery,
        }
    }

    pub fn share(&self, tier: DifficultyTier) -> u8 {
        match tier {
            DifficultyTier::Principle => self.principle,
            DifficultyTier::Adaptation => self.adaptation,
            DifficultyTier::Mastery => self.mastery,
        }
    }
}

/// Outcome of tier selection for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyAdjustment {
    pub target_level: DifficultyTier,
    pub allowed_range: DifficultyRange,
    pub ratio: DifficultyRatio,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment_reason: Option<String>,
}

/// Stage of rehabilitation the user reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RehabPhase {
    Initial,
    Recovery,
    Strengthening,
}

impl RehabPhase {
    pub fn label(&self) -> &'static str {
        match self {
            RehabPhase::Initial => "initial phase",
            RehabPhase::Recovery => "recovery phase",
            RehabPhase::Strengthening => "strengthening phase",
        }
    }
}

impl std::str::FromStr for RehabPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "initial" => Ok(RehabPhase::Initial),
            "recovery" => Ok(RehabPhase::Recovery),
            "strengthening" => Ok(RehabPhase::Strengthening),
            other => Err(format!("Unknown rehab phase: {}", other)),
        }
    }
}

/// Multiplicative factors applied to reps/sets/rest/duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMultipliers {
    pub reps: f64,
    pub sets: f64,
    pub rest: f64,
    pub duration: f64,
}

impl Default for VolumeMultipliers {
    fn default() -> Self {
        Self {
            reps: 1.0,
            sets: 1.0,
            rest: 1.0,
            duration: 1.0,
        }
    }
}

/// Result of the phase/fitness driven rescaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeAdjustment {
    /// Recommended intensity 1-5
    pub recommended_intensity: u8,
    pub adjustment_reason: String,
    pub multipliers: VolumeMultipliers,
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_bands() {
        assert_eq!(DifficultyTier::from_score(1), DifficultyTier::Principle);
        assert_eq!(DifficultyTier::from_score(4), DifficultyTier::Principle);
        assert_eq!(DifficultyTier::from_score(5), DifficultyTier::Adaptation);
        assert_eq!(DifficultyTier::from_score(7), DifficultyTier::Adaptation);
        assert_eq!(DifficultyTier::from_score(8), DifficultyTier::Mastery);
        assert_eq!(DifficultyTier::from_score(10), DifficultyTier::Mastery);
    }

    #[test]
    fn test_experience_normalization() {
        assert_eq!(ExperienceLevel::normalize(None), ExperienceLevel::Beginner);
        assert_eq!(ExperienceLevel::normalize(Some("rarely")), ExperienceLevel::Beginner);
        assert_eq!(ExperienceLevel::normalize(Some("weekly_1_2")), ExperienceLevel::Intermediate);
        assert_eq!(ExperienceLevel::normalize(Some("weekly_3_plus")), ExperienceLevel::Advanced);
        assert_eq!(ExperienceLevel::normalize(Some(" Advanced ")), ExperienceLevel::Advanced);
        assert_eq!(ExperienceLevel::normalize(Some("거의 안 함")), ExperienceLevel::Beginner);
        assert_eq!(ExperienceLevel::normalize(Some("주1-2회")), ExperienceLevel::Intermediate);
        assert_eq!(ExperienceLevel::normalize(Some("주 3회 이상")), ExperienceLevel::Advanced);
        assert_eq!(ExperienceLevel::normalize(Some("경험자")), ExperienceLevel::Advanced);
        assert_eq!(ExperienceLevel::normalize(Some("sometimes")), ExperienceLevel::Beginner);
    }

    #[test]
    fn test_range_contains() {
        let range = DifficultyRange::new(1, 4);
        assert!(range.contains(1));
        assert!(range.contains(4));
        assert!(!range.contains(5));
        assert!(DifficultyRange::FULL.is_full());
        assert!(!range.is_full());
    }
}
