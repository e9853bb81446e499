use crate::models::{MergedExercise, Section};

/// Intensity cut-off between warm-up and main
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionThresholds {
    /// Levels up to and including this go to warm-up; anything above is main
    pub warmup_max_intensity: u8,
}

impl Default for SectionThresholds {
    fn default() -> Self {
        Self {
            warmup_max_intensity: 2,
        }
    }
}

/// Where cool-down candidates come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownSource {
    /// Exercises flagged as cool-down at data entry
    Tagged,
    /// Warm-up eligible exercises left over after warm-up selection
    WarmupFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedSections {
    pub warmup: Vec<MergedExercise>,
    pub main: Vec<MergedExercise>,
    pub cooldown: Vec<MergedExercise>,
    pub cooldown_source: CooldownSource,
}

impl SectionThresholds {
    pub fn section_for(&self, exercise: &MergedExercise) -> Section {
        if exercise.cooldown_tagged {
            return Section::Cooldown;
        }
        match exercise.intensity_level {
            Some(level) if level > self.warmup_max_intensity => Section::Main,
            _ => Section::Warmup,
        }
    }

    /// Split exercises into sections, each ordered by descending score
    pub fn classify(&self, exercises: Vec<MergedExercise>) -> ClassifiedSections {
        let mut warmup = Vec::new();
        let mut main = Vec::new();
        let mut cooldown = Vec::new();

        for mut exercise in exercises {
            exercise.section = self.section_for(&exercise);
            match exercise.section {
                Section::Warmup => warmup.push(exercise),
                Section::Main => main.push(exercise),
                Section::Cooldown => cooldown.push(exercise),
            }
        }

        for section in [&mut warmup, &mut main, &mut cooldown] {
            section.sort_by(|a, b| {
                b.priority_score
                    .total_cmp(&a.priority_score)
                    .then_with(|| a.exercise_template_id.cmp(&b.exercise_template_id))
            });
        }

        let cooldown_source = if cooldown.is_empty() {
            CooldownSource::WarmupFallback
        } else {
            CooldownSource::Tagged
        };

        ClassifiedSections {
            warmup,
            main,
            cooldown,
            cooldown_source,
        }
    }
}
