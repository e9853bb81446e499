use std::collections::HashMap;

use super::section_classifier::{ClassifiedSections, CooldownSource};
use crate::models::{DifficultyRatio, DifficultyTier, MergedExercise, Section, SectionTime, SectionTimes};

/// Fixed section budgets and fallback exercise lengths, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBudgetConfig {
    pub warmup_minutes: u32,
    pub cooldown_minutes: u32,
    pub warmup_exercise_minutes: u32,
    pub main_exercise_minutes: u32,
    pub cooldown_exercise_minutes: u32,
}

impl Default for TimeBudgetConfig {
    fn default() -> Self {
        Self {
            warmup_minutes: 10,
            cooldown_minutes: 10,
            warmup_exercise_minutes: 3,
            main_exercise_minutes: 5,
            cooldown_exercise_minutes: 3,
        }
    }
}

impl TimeBudgetConfig {
    /// Warm-up, main and cool-down budgets for a session of `total_minutes`
    pub fn budgets(&self, total_minutes: u32) -> (u32, u32, u32) {
        let warmup = self.warmup_minutes.min(total_minutes);
        let cooldown = self.cooldown_minutes.min(total_minutes - warmup);
        (warmup, total_minutes - warmup - cooldown, cooldown)
    }

    fn default_length(&self, section: Section) -> u32 {
        match section {
            Section::Warmup => self.warmup_exercise_minutes,
            Section::Main => self.main_exercise_minutes,
            Section::Cooldown => self.cooldown_exercise_minutes,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    /// Warm-up, then main, then cool-down
    pub exercises: Vec<MergedExercise>,
    pub sections: SectionTimes,
    pub warnings: Vec<String>,
}

fn effective_minutes(exercise: &MergedExercise, fallback: u32) -> u32 {
    exercise.duration_minutes.filter(|m| *m > 0).unwrap_or(fallback)
}

/// Take exercises in order while they fit; skipped ones are returned
fn select_greedy(
    candidates: Vec<MergedExercise>,
    budget: u32,
    fallback: u32,
) -> (Vec<MergedExercise>, Vec<MergedExercise>, u32) {
    let mut selected = Vec::new();
    let mut skipped = Vec::new();
    let mut used = 0;

    for mut exercise in candidates {
        let minutes = effective_minutes(&exercise, fallback);
        if used + minutes <= budget {
            used += minutes;
            exercise.duration_minutes = Some(minutes);
            selected.push(exercise);
        } else {
            skipped.push(exercise);
        }
    }

    (selected, skipped, used)
}

/// Main selection honouring per-tier quotas first, then free fill.
/// Selected exercises keep their incoming order.
fn select_main(candidates: Vec<MergedExercise>, budget: u32, fallback: u32, ratio: &DifficultyRatio) -> (Vec<MergedExercise>, u32) {
    let quotas: HashMap<DifficultyTier, u32> = DifficultyTier::ALL
        .iter()
        .map(|tier| (*tier, budget * u32::from(ratio.share(*tier)) / 100))
        .collect();
    let mut tier_used: HashMap<DifficultyTier, u32> = HashMap::new();
    let mut taken = vec![false; candidates.len()];
    let mut used = 0;

    for (index, exercise) in candidates.iter().enumerate() {
        let minutes = effective_minutes(exercise, fallback);
        let quota = quotas.get(&exercise.tier).copied().unwrap_or(0);
        let spent = tier_used.entry(exercise.tier).or_insert(0);
        if *spent + minutes <= quota && used + minutes <= budget {
            *spent += minutes;
            used += minutes;
            taken[index] = true;
        }
    }

    for (index, exercise) in candidates.iter().enumerate() {
        if taken[index] {
            continue;
        }
        let minutes = effective_minutes(exercise, fallback);
        if used + minutes <= budget {
            used += minutes;
            taken[index] = true;
        }
    }

    let selected = candidates
        .into_iter()
        .zip(taken)
        .filter(|(_, taken)| *taken)
        .map(|(mut exercise, _)| {
            exercise.duration_minutes = Some(effective_minutes(&exercise, fallback));
            exercise
        })
        .collect();

    (selected, used)
}

fn finish_section(
    section: Section,
    mut selected: Vec<MergedExercise>,
    budget: u32,
    allotted: u32,
    warnings: &mut Vec<String>,
) -> (Vec<MergedExercise>, SectionTime) {
    for (position, exercise) in selected.iter_mut().enumerate() {
        exercise.section = section;
        exercise.order_in_section = position as u32 + 1;
    }

    if selected.is_empty() {
        warnings.push(format!(
            "No {} exercises available; its {} minutes were left unused",
            section, budget
        ));
    }

    (
        selected,
        SectionTime {
            budget_minutes: budget,
            allotted_minutes: allotted,
        },
    )
}

/// Fit classified sections into the session length.
///
/// Allotted time is the sum of selected durations and never exceeds the
/// section budget. An empty section keeps zero minutes; its budget is not
/// handed to the other sections.
pub fn distribute(
    classified: ClassifiedSections,
    total_minutes: u32,
    ratio: &DifficultyRatio,
    config: &TimeBudgetConfig,
) -> Distribution {
    let (warmup_budget, main_budget, cooldown_budget) = config.budgets(total_minutes);
    let mut warnings = Vec::new();

    let (warmup, warmup_leftovers, warmup_used) = select_greedy(
        classified.warmup,
        warmup_budget,
        config.default_length(Section::Warmup),
    );
    let (main, main_used) = select_main(
        classified.main,
        main_budget,
        config.default_length(Section::Main),
        ratio,
    );
    let cooldown_pool = match classified.cooldown_source {
        CooldownSource::Tagged => classified.cooldown,
        CooldownSource::WarmupFallback => warmup_leftovers,
    };
    let (cooldown, _, cooldown_used) = select_greedy(
        cooldown_pool,
        cooldown_budget,
        config.default_length(Section::Cooldown),
    );

    let (warmup, warmup_time) = finish_section(Section::Warmup, warmup, warmup_budget, warmup_used, &mut warnings);
    let (main, main_time) = finish_section(Section::Main, main, main_budget, main_used, &mut warnings);
    let (cooldown, cooldown_time) =
        finish_section(Section::Cooldown, cooldown, cooldown_budget, cooldown_used, &mut warnings);

    let mut exercises = warmup;
    exercises.extend(main);
    exercises.extend(cooldown);

    Distribution {
        exercises,
        sections: SectionTimes {
            warmup: warmup_time,
            main: main_time,
            cooldown: cooldown_time,
        },
        warnings,
    }
}
