use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use super::candidate_pool::Candidate;

/// Intensity assumed for exercises with no level on mapping or template
const DEFAULT_INTENSITY: u8 = 2;

/// Clinical precedence of a body part, lower first
pub fn body_part_base_priority(name: &str) -> u32 {
    match name.trim() {
        "허리" => 1,
        "무릎" => 2,
        "어깨" => 3,
        "목" => 4,
        "손목" | "발목" => 5,
        "팔꿈치" | "엉덩이" => 6,
        "등" => 7,
        "가슴" => 8,
        _ => 10,
    }
}

/// Intensity that suits a body part at the given pain level
pub fn target_intensity(pain_level: u8) -> u8 {
    5u8.saturating_sub(pain_level).max(1)
}

/// Everything a scoring strategy may look at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInput<'a> {
    pub body_part_name: &'a str,
    pub base_priority: u32,
    pub mapping_priority: i32,
    pub intensity_level: u8,
    pub target_intensity: u8,
    pub pain_level: u8,
    pub selection_order: u32,
}

impl<'a> ScoreInput<'a> {
    pub fn from_candidate(candidate: &'a Candidate) -> Self {
        Self {
            body_part_name: &candidate.body_part.name,
            base_priority: body_part_base_priority(&candidate.body_part.name),
            mapping_priority: candidate.mapping.priority,
            intensity_level: candidate.intensity_level().unwrap_or(DEFAULT_INTENSITY),
            target_intensity: target_intensity(candidate.pain_level),
            pain_level: candidate.pain_level,
            selection_order: candidate.selection_order,
        }
    }
}

pub type ScoreStrategy = Arc<dyn Fn(&ScoreInput<'_>) -> f64 + Send + Sync>;

/// Default weighting, higher is better.
///
/// Body-part pain and clinical precedence dominate, then mapping priority.
/// Intensity fit can move a score by at most 0.4, so a lower mapping priority
/// within one body part always wins.
pub fn weighted_score(input: &ScoreInput<'_>) -> f64 {
    let intensity_gap = (i16::from(input.intensity_level) - i16::from(input.target_intensity)).unsigned_abs();

    1000.0 + f64::from(input.pain_level) * 100.0
        - f64::from(input.base_priority) * 10.0
        - f64::from(input.mapping_priority)
        - f64::from(intensity_gap) * 0.1
        - f64::from(input.selection_order) * 0.001
}

/// Ranks candidates with a swappable scoring strategy
#[derive(Clone)]
pub struct PriorityScorer {
    strategy: ScoreStrategy,
}

impl fmt::Debug for PriorityScorer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityScorer").finish_non_exhaustive()
    }
}

impl Default for PriorityScorer {
    fn default() -> Self {
        Self::new(weighted_score)
    }
}

impl PriorityScorer {
    pub fn new<F>(strategy: F) -> Self
    where
        F: Fn(&ScoreInput<'_>) -> f64 + Send + Sync + 'static,
    {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    pub fn score(&self, candidate: &Candidate) -> f64 {
        (self.strategy)(&ScoreInput::from_candidate(candidate))
    }

    /// Score every candidate and sort best first; ties fall back to ids
    pub fn rank(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        for candidate in candidates.iter_mut() {
            candidate.priority_score = self.score(candidate);
        }
        candidates.sort_by(compare_ranked);
        candidates
    }
}

fn compare_ranked(a: &Candidate, b: &Candidate) -> Ordering {
    b.priority_score
        .total_cmp(&a.priority_score)
        .then_with(|| a.template_id().cmp(&b.template_id()))
        .then_with(|| a.body_part_id().cmp(&b.body_part_id()))
}
