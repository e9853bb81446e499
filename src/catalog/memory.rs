use async_trait::async_trait;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::{CatalogError, CatalogReader, MAX_ALTERNATIVES};
use crate::models::{
    BodyPart, BodyPartExerciseMapping, CatalogEntry, Contraindication, ExerciseTemplate,
};

/// Catalog snapshot held in memory.
///
/// Backs the demo server, the simulation CLI and the test suite. Iteration
/// order is fixed so results are reproducible.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    body_parts: BTreeMap<Uuid, BodyPart>,
    templates: BTreeMap<Uuid, ExerciseTemplate>,
    mappings: Vec<BodyPartExerciseMapping>,
    contraindications: Vec<Contraindication>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body_part(mut self, id: Uuid, name: impl Into<String>) -> Self {
        self.body_parts.insert(id, BodyPart { id, name: name.into() });
        self
    }

    pub fn with_template(mut self, template: ExerciseTemplate) -> Self {
        self.templates.insert(template.id, template);
        self
    }

    pub fn with_mapping(mut self, mapping: BodyPartExerciseMapping) -> Self {
        self.mappings.push(mapping);
        self
    }

    pub fn with_contraindication(mut self, contraindication: Contraindication) -> Self {
        self.contraindications.push(contraindication);
        self
    }

    pub fn body_parts(&self) -> impl Iterator<Item = &BodyPart> {
        self.body_parts.values()
    }

    pub fn templates(&self) -> impl Iterator<Item = &ExerciseTemplate> {
        self.templates.values()
    }

    pub fn mappings(&self) -> &[BodyPartExerciseMapping] {
        &self.mappings
    }

    pub fn contraindications(&self) -> &[Contraindication] {
        &self.contraindications
    }

    pub fn body_part_by_name(&self, name: &str) -> Option<&BodyPart> {
        self.body_parts.values().find(|bp| bp.name == name)
    }

    pub fn template(&self, id: Uuid) -> Option<&ExerciseTemplate> {
        self.templates.get(&id)
    }

    /// Active mappings of one body part whose template is active, best first
    fn active_mappings(&self, body_part_id: Uuid) -> Vec<(&BodyPartExerciseMapping, &ExerciseTemplate)> {
        let mut rows: Vec<_> = self
            .mappings
            .iter()
            .filter(|m| m.body_part_id == body_part_id && m.is_active)
            .filter_map(|m| {
                self.templates
                    .get(&m.exercise_template_id)
                    .filter(|t| t.is_active)
                    .map(|t| (m, t))
            })
            .collect();
        rows.sort_by(|(a, _), (b, _)| {
            a.priority
                .cmp(&b.priority)
                .then(a.exercise_template_id.cmp(&b.exercise_template_id))
        });
        rows
    }
}

#[async_trait]
impl CatalogReader for InMemoryCatalog {
    async fn fetch_mappings(&self, body_part_ids: &[Uuid]) -> Result<Vec<CatalogEntry>, CatalogError> {
        let mut entries = Vec::new();

        for body_part_id in body_part_ids {
            let Some(body_part) = self.body_parts.get(body_part_id) else {
                continue;
            };

            for (mapping, template) in self.active_mappings(*body_part_id) {
                entries.push(CatalogEntry {
                    mapping: mapping.clone(),
                    template: template.clone(),
                    body_part: body_part.clone(),
                });
            }
        }

        Ok(entries)
    }

    async fn fetch_contraindications(
        &self,
        template_id: Uuid,
        body_part_id: Uuid,
        pain_level: u8,
    ) -> Result<Vec<Contraindication>, CatalogError> {
        Ok(self
            .contraindications
            .iter()
            .filter(|c| c.exercise_template_id == template_id && c.body_part_id == body_part_id)
            .filter(|c| c.applies_at(pain_level))
            .cloned()
            .collect())
    }

    async fn fetch_alternatives(
        &self,
        excluded_template_id: Uuid,
        body_part_id: Uuid,
        max_difficulty: u8,
    ) -> Result<Vec<Uuid>, CatalogError> {
        Ok(self
            .active_mappings(body_part_id)
            .into_iter()
            .map(|(_, template)| template)
            .filter(|t| t.id != excluded_template_id)
            .filter(|t| t.difficulty_score.is_some_and(|score| score <= max_difficulty))
            .map(|t| t.id)
            .take(MAX_ALTERNATIVES)
            .collect())
    }
}
