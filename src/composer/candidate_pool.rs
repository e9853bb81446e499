use futures::future::try_join_all;
use uuid::Uuid;

use crate::catalog::{CatalogError, CatalogReader};
use crate::models::{
    BodyPart, BodyPartExerciseMapping, BodyPartSelection, CatalogEntry, ExerciseTemplate,
    DEFAULT_DIFFICULTY_SCORE,
};

/// A catalog exercise considered for one selected body part
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub mapping: BodyPartExerciseMapping,
    pub template: ExerciseTemplate,
    pub body_part: BodyPart,
    /// Pain level the user reported for this body part
    pub pain_level: u8,
    pub selection_order: u32,
    /// Soft contraindication reasons
    pub cautions: Vec<String>,
    pub priority_score: f64,
}

impl Candidate {
    pub fn from_entry(entry: CatalogEntry, selection: &BodyPartSelection, selection_order: u32) -> Self {
        Self {
            mapping: entry.mapping,
            template: entry.template,
            body_part: entry.body_part,
            pain_level: selection.pain_level,
            selection_order,
            cautions: Vec::new(),
            priority_score: 0.0,
        }
    }

    pub fn template_id(&self) -> Uuid {
        self.template.id
    }

    pub fn body_part_id(&self) -> Uuid {
        self.body_part.id
    }

    /// Mapping override first, then the template's own level
    pub fn intensity_level(&self) -> Option<u8> {
        self.mapping.intensity_level.or(self.template.intensity_level)
    }

    pub fn difficulty_score(&self) -> u8 {
        self.template.difficulty_score.unwrap_or(DEFAULT_DIFFICULTY_SCORE)
    }
}

/// Read every active mapping of the selected body parts.
///
/// One catalog read per body part, issued concurrently. Output follows the
/// selection order; a template mapped to several selected body parts appears
/// once per body part. Any failed read fails the whole pool.
pub async fn build_pool(
    catalog: &dyn CatalogReader,
    selections: &[BodyPartSelection],
) -> Result<Vec<Candidate>, CatalogError> {
    let reads = selections
        .iter()
        .map(|selection| catalog.fetch_mappings(std::slice::from_ref(&selection.body_part_id)));
    let results = try_join_all(reads).await?;

    let mut pool = Vec::new();
    for (index, (selection, entries)) in selections.iter().zip(results).enumerate() {
        let order = selection.selection_order.unwrap_or(index as u32 + 1);
        pool.extend(
            entries
                .into_iter()
                .filter(|entry| entry.body_part.id == selection.body_part_id)
                .map(|entry| Candidate::from_entry(entry, selection, order)),
        );
    }

    Ok(pool)
}
