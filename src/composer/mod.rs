// Course composition pipeline stages

pub mod candidate_pool;
pub mod contraindication_filter;
pub mod deduplicator;
pub mod difficulty_adjuster;
pub mod equipment_filter;
pub mod errors;
pub mod priority_scorer;
pub mod section_classifier;
pub mod time_distributor;

pub use candidate_pool::{build_pool, Candidate};
pub use contraindication_filter::{apply_contraindications, conservative_difficulty, ContraindicationOutcome, Verdict};
pub use deduplicator::deduplicate;
pub use difficulty_adjuster::{apply_volume, filter_by_difficulty, DifficultyTables, VolumeTables};
pub use equipment_filter::{filter_by_equipment, is_bodyweight, AvailableEquipment, BODYWEIGHT_ALIASES};
pub use errors::ComposerError;
pub use priority_scorer::{PriorityScorer, ScoreInput};
pub use section_classifier::{ClassifiedSections, CooldownSource, SectionThresholds};
pub use time_distributor::{distribute, Distribution, TimeBudgetConfig};

/// Tunables of one composer instance
#[derive(Debug, Clone)]
pub struct ComposerSettings {
    pub budgets: TimeBudgetConfig,
    pub thresholds: SectionThresholds,
    pub difficulty: DifficultyTables,
    pub volume: VolumeTables,
    pub scorer: PriorityScorer,
    /// Used when a request leaves the session length out
    pub default_session_minutes: u32,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            budgets: TimeBudgetConfig::default(),
            thresholds: SectionThresholds::default(),
            difficulty: DifficultyTables::default(),
            volume: VolumeTables::default(),
            scorer: PriorityScorer::default(),
            default_session_minutes: 90,
        }
    }
}
