use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::catalog::CatalogReader;
use crate::composer::{
    apply_contraindications, apply_volume, build_pool, deduplicate, distribute, filter_by_difficulty,
    filter_by_equipment, AvailableEquipment, ComposerError, ComposerSettings,
};
use crate::models::{
    validate_course_request, BodyPartSelection, CourseRequest, CourseResponse, CourseStats,
    DifficultyAdjustment, ExperienceLevel, MergedExercise, Section,
};

/// Turns a course request into a time-boxed warm-up / main / cool-down course.
///
/// Holds no per-request state; clones share the catalog handle and settings.
#[derive(Clone)]
pub struct CourseComposerService {
    catalog: Arc<dyn CatalogReader>,
    settings: Arc<ComposerSettings>,
}

impl CourseComposerService {
    pub fn new(catalog: Arc<dyn CatalogReader>) -> Self {
        Self::with_settings(catalog, ComposerSettings::default())
    }

    pub fn with_settings(catalog: Arc<dyn CatalogReader>, settings: ComposerSettings) -> Self {
        Self {
            catalog,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &ComposerSettings {
        &self.settings
    }

    /// Tier selection only, without touching the catalog
    pub fn preview_difficulty(
        &self,
        experience_level: Option<&str>,
        pain_level: u8,
    ) -> Result<DifficultyAdjustment, ComposerError> {
        if !(1..=5).contains(&pain_level) {
            return Err(ComposerError::Validation(
                "Pain level must be between 1 and 5".to_string(),
            ));
        }
        let experience = ExperienceLevel::normalize(experience_level);
        Ok(self.settings.difficulty.adjust(experience, pain_level))
    }

    #[instrument(skip(self, request), fields(body_parts = request.body_parts.len(), pain_level = request.pain_level))]
    pub async fn compose(&self, request: CourseRequest) -> Result<CourseResponse, ComposerError> {
        validate_course_request(&request).map_err(ComposerError::Validation)?;

        let settings = self.settings.as_ref();
        let catalog = self.catalog.as_ref();
        let total_minutes = request
            .total_duration_minutes
            .unwrap_or(settings.default_session_minutes);
        let experience = ExperienceLevel::normalize(request.experience_level.as_deref());
        let pain_ceiling = request
            .body_parts
            .iter()
            .map(|selection| selection.pain_level)
            .fold(request.pain_level, u8::max);

        let pool = build_pool(catalog, &request.body_parts).await?;
        debug!("Candidate pool holds {} entries", pool.len());

        let available = AvailableEquipment::new(&request.equipment_available);
        let equipped = filter_by_equipment(pool, &available);
        debug!("{} candidates left after equipment filter", equipped.len());

        let screened = apply_contraindications(catalog, equipped, request.condition).await?;
        let mut warnings = screened.warnings;

        let difficulty = settings.difficulty.adjust(experience, pain_ceiling);
        if let Some(reason) = &difficulty.adjustment_reason {
            warnings.push(reason.clone());
        }
        let eligible = filter_by_difficulty(screened.kept, difficulty.allowed_range);
        debug!(
            "{} candidates within difficulty range {}-{}",
            eligible.len(),
            difficulty.allowed_range.min,
            difficulty.allowed_range.max
        );

        for selection in &request.body_parts {
            if !eligible.iter().any(|c| c.body_part_id() == selection.body_part_id) {
                warnings.push(format!(
                    "No suitable exercises found for {}",
                    selection.body_part_name
                ));
            }
        }

        let ranked = settings.scorer.rank(eligible);
        let mut merged = deduplicate(ranked);

        let volume = request.rehab_phase.map(|phase| {
            let pain_levels: Vec<u8> = request.body_parts.iter().map(|s| s.pain_level).collect();
            settings.volume.calculate(phase, request.fitness_level, &pain_levels)
        });
        if let Some(volume) = &volume {
            for exercise in merged.iter_mut() {
                apply_volume(exercise, &volume.multipliers);
            }
            warnings.extend(volume.warnings.iter().cloned());
        }

        let classified = settings.thresholds.classify(merged);
        let distribution = distribute(classified, total_minutes, &difficulty.ratio, &settings.budgets);
        warnings.extend(distribution.warnings);

        let stats = build_stats(&distribution.exercises, &request.body_parts);
        let total_duration_minutes = distribution.sections.total_allotted();

        info!(
            "Composed {} exercises ({} min of {}) with {} warnings",
            distribution.exercises.len(),
            total_duration_minutes,
            total_minutes,
            warnings.len()
        );

        Ok(CourseResponse {
            exercises: distribution.exercises,
            warnings: dedup_in_order(warnings),
            total_duration_minutes,
            sections: distribution.sections,
            stats,
            difficulty,
            volume,
            substitutions: screened.substitutions,
        })
    }
}

fn build_stats(exercises: &[MergedExercise], selections: &[BodyPartSelection]) -> CourseStats {
    let names: HashMap<Uuid, &str> = selections
        .iter()
        .map(|s| (s.body_part_id, s.body_part_name.as_str()))
        .collect();

    let mut by_body_part: BTreeMap<String, usize> = BTreeMap::new();
    for exercise in exercises {
        for body_part_id in &exercise.body_part_ids {
            if let Some(name) = names.get(body_part_id) {
                *by_body_part.entry(name.to_string()).or_insert(0) += 1;
            }
        }
    }

    let count = |section: Section| exercises.iter().filter(|e| e.section == section).count();

    CourseStats {
        warmup: count(Section::Warmup),
        main: count(Section::Main),
        cooldown: count(Section::Cooldown),
        by_body_part,
    }
}

fn dedup_in_order(warnings: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    warnings
        .into_iter()
        .filter(|warning| seen.insert(warning.clone()))
        .collect()
}
