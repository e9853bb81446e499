use std::collections::HashMap;
use uuid::Uuid;

use super::candidate_pool::Candidate;
use crate::models::{DifficultyTier, MergedExercise, Section};

fn to_merged(candidate: Candidate) -> MergedExercise {
    let tier = DifficultyTier::from_score(candidate.difficulty_score());
    let intensity_level = candidate.intensity_level();
    MergedExercise {
        exercise_template_id: candidate.template.id,
        name: candidate.template.name,
        body_part_ids: vec![candidate.body_part.id],
        section: Section::Main,
        order_in_section: 0,
        priority_score: candidate.priority_score,
        intensity_level,
        difficulty_score: candidate.template.difficulty_score,
        tier,
        duration_minutes: candidate.template.duration_minutes,
        reps: candidate.template.reps,
        sets: candidate.template.sets,
        rest_seconds: candidate.template.rest_seconds,
        required_equipment: candidate.template.required_equipment,
        cautions: candidate.cautions,
        cooldown_tagged: candidate.template.is_cooldown,
    }
}

/// Collapse candidates sharing a template into one exercise.
///
/// Body parts are unioned in first-seen order and the best score wins,
/// along with the intensity of the mapping that produced it. Output is
/// sorted best first.
pub fn deduplicate(candidates: Vec<Candidate>) -> Vec<MergedExercise> {
    let mut merged: Vec<MergedExercise> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for candidate in candidates {
        let Some(&position) = index.get(&candidate.template_id()) else {
            index.insert(candidate.template_id(), merged.len());
            merged.push(to_merged(candidate));
            continue;
        };

        let existing = &mut merged[position];
        if !existing.body_part_ids.contains(&candidate.body_part.id) {
            existing.body_part_ids.push(candidate.body_part.id);
        }
        for caution in &candidate.cautions {
            if !existing.cautions.contains(caution) {
                existing.cautions.push(caution.clone());
            }
        }
        if candidate.priority_score > existing.priority_score {
            existing.priority_score = candidate.priority_score;
            existing.intensity_level = candidate.intensity_level();
        }
    }

    merged.sort_by(|a, b| {
        b.priority_score
            .total_cmp(&a.priority_score)
            .then_with(|| a.exercise_template_id.cmp(&b.exercise_template_id))
    });
    merged
}
