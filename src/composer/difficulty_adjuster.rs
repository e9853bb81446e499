use std::collections::BTreeMap;

use super::candidate_pool::Candidate;
use crate::models::{
    DifficultyAdjustment, DifficultyRange, DifficultyRatio, DifficultyTier, ExperienceLevel,
    MergedExercise, RehabPhase, VolumeAdjustment, VolumeMultipliers,
};

const DEFAULT_FITNESS_LEVEL: u8 = 2;

fn clamp_pain(pain_level: u8) -> u8 {
    pain_level.clamp(1, 5)
}

/// Lookup tables driving tier selection.
///
/// Passed in by value so composition stays a function of its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyTables {
    pub pain_ranges: BTreeMap<u8, DifficultyRange>,
    /// Applied only when the pain range is the full span
    pub tier_ranges: BTreeMap<DifficultyTier, DifficultyRange>,
    pub pain_ratios: BTreeMap<u8, DifficultyRatio>,
    pub experience_ratios: BTreeMap<ExperienceLevel, DifficultyRatio>,
}

impl Default for DifficultyTables {
    fn default() -> Self {
        Self {
            pain_ranges: BTreeMap::from([
                (1, DifficultyRange::FULL),
                (2, DifficultyRange::FULL),
                (3, DifficultyRange::FULL),
                (4, DifficultyRange::new(1, 7)),
                (5, DifficultyRange::new(1, 4)),
            ]),
            tier_ranges: BTreeMap::from([
                (DifficultyTier::Principle, DifficultyRange::new(1, 4)),
                (DifficultyTier::Adaptation, DifficultyRange::new(1, 8)),
                (DifficultyTier::Mastery, DifficultyRange::new(4, 10)),
            ]),
            pain_ratios: BTreeMap::from([
                (4, DifficultyRatio::new(50, 50, 0)),
                (5, DifficultyRatio::new(100, 0, 0)),
            ]),
            experience_ratios: BTreeMap::from([
                (ExperienceLevel::Beginner, DifficultyRatio::new(70, 30, 0)),
                (ExperienceLevel::Intermediate, DifficultyRatio::new(20, 60, 20)),
                (ExperienceLevel::Advanced, DifficultyRatio::new(10, 30, 60)),
            ]),
        }
    }
}

impl DifficultyTables {
    /// Pick the target tier, allowed score range and tier ratio.
    ///
    /// Pain 5 forces principle, pain 4 lowers mastery to adaptation, lower
    /// pain keeps the experience tier.
    pub fn adjust(&self, experience: ExperienceLevel, pain_level: u8) -> DifficultyAdjustment {
        let pain_level = clamp_pain(pain_level);
        let base_tier = experience.base_tier();

        let (target_level, adjustment_reason) = match (pain_level, base_tier) {
            (5, DifficultyTier::Principle) => (DifficultyTier::Principle, None),
            (5, base) => (
                DifficultyTier::Principle,
                Some(format!(
                    "Pain level 5: difficulty lowered from {} to principle",
                    base
                )),
            ),
            (4, DifficultyTier::Mastery) => (
                DifficultyTier::Adaptation,
                Some("Pain level 4: difficulty lowered from mastery to adaptation".to_string()),
            ),
            (_, base) => (base, None),
        };

        let pain_range = self
            .pain_ranges
            .get(&pain_level)
            .copied()
            .unwrap_or(DifficultyRange::FULL);
        let allowed_range = if pain_range.is_full() {
            self.tier_ranges.get(&target_level).copied().unwrap_or(pain_range)
        } else {
            pain_range
        };

        let ratio = self
            .pain_ratios
            .get(&pain_level)
            .or_else(|| self.experience_ratios.get(&experience))
            .copied()
            .unwrap_or(DifficultyRatio::new(100, 0, 0));

        DifficultyAdjustment {
            target_level,
            allowed_range,
            ratio,
            adjustment_reason,
        }
    }
}

/// Drop candidates whose difficulty score falls outside the allowed range
pub fn filter_by_difficulty(candidates: Vec<Candidate>, range: DifficultyRange) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|candidate| range.contains(candidate.difficulty_score()))
        .collect()
}

/// Phase profile for volume rescaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseProfile {
    pub max_intensity: u8,
    pub reps: f64,
    pub sets: f64,
    pub rest: f64,
    pub duration: f64,
}

/// Adjustment keyed by the rounded average pain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PainModifier {
    pub intensity_delta: i8,
    pub reps: f64,
    pub rest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplierBounds {
    pub reps: (f64, f64),
    pub sets: (f64, f64),
    pub rest: (f64, f64),
    pub duration: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeTables {
    pub phases: BTreeMap<RehabPhase, PhaseProfile>,
    pub pain_modifiers: BTreeMap<u8, PainModifier>,
    pub bounds: MultiplierBounds,
    /// Recommended intensity ceiling once any body part reaches pain 4
    pub severe_pain_intensity_cap: u8,
}

impl Default for VolumeTables {
    fn default() -> Self {
        Self {
            phases: BTreeMap::from([
                (
                    RehabPhase::Initial,
                    PhaseProfile { max_intensity: 2, reps: 0.7, sets: 0.8, rest: 1.3, duration: 0.8 },
                ),
                (
                    RehabPhase::Recovery,
                    PhaseProfile { max_intensity: 3, reps: 1.0, sets: 1.0, rest: 1.0, duration: 1.0 },
                ),
                (
                    RehabPhase::Strengthening,
                    PhaseProfile { max_intensity: 4, reps: 1.2, sets: 1.1, rest: 0.8, duration: 1.1 },
                ),
            ]),
            pain_modifiers: BTreeMap::from([
                (1, PainModifier { intensity_delta: 1, reps: 1.2, rest: 0.9 }),
                (2, PainModifier { intensity_delta: 0, reps: 1.0, rest: 1.0 }),
                (3, PainModifier { intensity_delta: 0, reps: 0.9, rest: 1.1 }),
                (4, PainModifier { intensity_delta: -1, reps: 0.7, rest: 1.3 }),
                (5, PainModifier { intensity_delta: -2, reps: 0.5, rest: 1.5 }),
            ]),
            bounds: MultiplierBounds {
                reps: (0.5, 1.5),
                sets: (0.5, 1.5),
                rest: (0.8, 1.5),
                duration: (0.7, 1.3),
            },
            severe_pain_intensity_cap: 2,
        }
    }
}

fn clamp_between(value: f64, (min, max): (f64, f64)) -> f64 {
    value.clamp(min, max)
}

impl VolumeTables {
    /// Derive reps/sets/rest/duration multipliers from phase, fitness and
    /// the per-body-part pain levels
    pub fn calculate(&self, phase: RehabPhase, fitness_level: Option<u8>, pain_levels: &[u8]) -> VolumeAdjustment {
        let fitness_level = fitness_level.unwrap_or(DEFAULT_FITNESS_LEVEL).clamp(1, 5);
        let (average_pain, max_pain) = if pain_levels.is_empty() {
            (2.0, 2)
        } else {
            let sum: u32 = pain_levels.iter().map(|p| u32::from(*p)).sum();
            (
                f64::from(sum) / pain_levels.len() as f64,
                pain_levels.iter().copied().max().unwrap_or(2),
            )
        };

        let profile = self.phases.get(&phase).copied().unwrap_or(PhaseProfile {
            max_intensity: 3,
            reps: 1.0,
            sets: 1.0,
            rest: 1.0,
            duration: 1.0,
        });
        let rounded_pain = clamp_pain(average_pain.round() as u8);
        let modifier = self.pain_modifiers.get(&rounded_pain).copied().unwrap_or(PainModifier {
            intensity_delta: 0,
            reps: 1.0,
            rest: 1.0,
        });

        let base_intensity = fitness_level.min(profile.max_intensity) as i16;
        let mut recommended_intensity = (base_intensity + i16::from(modifier.intensity_delta)).clamp(1, 5) as u8;

        let mut warnings = Vec::new();
        if max_pain >= 4 {
            recommended_intensity = recommended_intensity.min(self.severe_pain_intensity_cap);
            warnings.push("A body part has severe pain; intensity is limited".to_string());
        }

        let multipliers = VolumeMultipliers {
            reps: clamp_between(profile.reps * modifier.reps, self.bounds.reps),
            sets: clamp_between(profile.sets, self.bounds.sets),
            rest: clamp_between(profile.rest * modifier.rest, self.bounds.rest),
            duration: clamp_between(profile.duration, self.bounds.duration),
        };

        let mut reasons = vec![format!("Rehab {}", phase.label())];
        if average_pain >= 3.0 {
            reasons.push(format!("intensity adjusted for average pain {:.1}", average_pain));
        }
        if fitness_level != DEFAULT_FITNESS_LEVEL {
            reasons.push(format!("fitness level {}", fitness_level));
        }

        VolumeAdjustment {
            recommended_intensity,
            adjustment_reason: reasons.join(", "),
            multipliers,
            warnings,
        }
    }
}

fn scale(value: Option<u32>, factor: f64) -> Option<u32> {
    value.map(|v| ((f64::from(v) * factor).round() as u32).max(1))
}

/// Rescale the numbers an exercise carries; absent values stay absent
pub fn apply_volume(exercise: &mut MergedExercise, multipliers: &VolumeMultipliers) {
    exercise.reps = scale(exercise.reps, multipliers.reps);
    exercise.sets = scale(exercise.sets, multipliers.sets);
    exercise.rest_seconds = scale(exercise.rest_seconds, multipliers.rest);
    exercise.duration_minutes = scale(exercise.duration_minutes, multipliers.duration);
}
