use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use super::{CatalogError, CatalogReader, MAX_ALTERNATIVES};
use crate::models::{
    BodyPart, BodyPartExerciseMapping, CatalogEntry, Condition, Contraindication,
    ExerciseTemplate, PainLevelRange, Severity,
};

/// Catalog backed by the PostgreSQL schema in `migrations/`
#[derive(Clone)]
pub struct PgCatalog {
    db: PgPool,
}

impl PgCatalog {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromRow)]
struct MappingRow {
    body_part_id: Uuid,
    body_part_name: String,
    exercise_template_id: Uuid,
    priority: i32,
    mapping_intensity: Option<i16>,
    pain_level_range: Option<String>,
    template_name: String,
    intensity_level: Option<i16>,
    difficulty_score: Option<i16>,
    duration_minutes: Option<i32>,
    reps: Option<i32>,
    sets: Option<i32>,
    rest_seconds: Option<i32>,
    is_cooldown: bool,
    required_equipment: Vec<String>,
}

#[derive(Debug, FromRow)]
struct ContraindicationRow {
    body_part_id: Uuid,
    exercise_template_id: Uuid,
    pain_level_min: Option<i16>,
    condition: Option<String>,
    severity: String,
    reason: Option<String>,
}

fn small(value: Option<i16>, column: &str) -> Result<Option<u8>, CatalogError> {
    value
        .map(|v| u8::try_from(v).map_err(|_| CatalogError::Malformed(format!("{} out of range: {}", column, v))))
        .transpose()
}

fn count(value: Option<i32>, column: &str) -> Result<Option<u32>, CatalogError> {
    value
        .map(|v| u32::try_from(v).map_err(|_| CatalogError::Malformed(format!("{} is negative: {}", column, v))))
        .transpose()
}

impl TryFrom<MappingRow> for CatalogEntry {
    type Error = CatalogError;

    fn try_from(row: MappingRow) -> Result<Self, Self::Error> {
        let pain_level_range = row
            .pain_level_range
            .as_deref()
            .map(str::parse::<PainLevelRange>)
            .transpose()
            .map_err(CatalogError::Malformed)?;

        Ok(CatalogEntry {
            mapping: BodyPartExerciseMapping {
                body_part_id: row.body_part_id,
                exercise_template_id: row.exercise_template_id,
                priority: row.priority,
                intensity_level: small(row.mapping_intensity, "mapping intensity_level")?,
                pain_level_range,
                is_active: true,
            },
            template: ExerciseTemplate {
                id: row.exercise_template_id,
                name: row.template_name,
                intensity_level: small(row.intensity_level, "intensity_level")?,
                difficulty_score: small(row.difficulty_score, "difficulty_score")?,
                duration_minutes: count(row.duration_minutes, "duration_minutes")?,
                reps: count(row.reps, "reps")?,
                sets: count(row.sets, "sets")?,
                rest_seconds: count(row.rest_seconds, "rest_seconds")?,
                required_equipment: row.required_equipment,
                is_cooldown: row.is_cooldown,
                is_active: true,
            },
            body_part: BodyPart {
                id: row.body_part_id,
                name: row.body_part_name,
            },
        })
    }
}

impl TryFrom<ContraindicationRow> for Contraindication {
    type Error = CatalogError;

    fn try_from(row: ContraindicationRow) -> Result<Self, Self::Error> {
        let condition = row
            .condition
            .as_deref()
            .map(str::parse::<Condition>)
            .transpose()
            .map_err(CatalogError::Malformed)?;
        let severity = row
            .severity
            .parse::<Severity>()
            .map_err(CatalogError::Malformed)?;

        Ok(Contraindication {
            body_part_id: row.body_part_id,
            exercise_template_id: row.exercise_template_id,
            pain_level_min: small(row.pain_level_min, "pain_level_min")?,
            condition,
            severity,
            reason: row.reason,
        })
    }
}

#[async_trait]
impl CatalogReader for PgCatalog {
    async fn fetch_mappings(&self, body_part_ids: &[Uuid]) -> Result<Vec<CatalogEntry>, CatalogError> {
        let rows = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT m.body_part_id, bp.name AS body_part_name, m.exercise_template_id,
                   m.priority, m.intensity_level AS mapping_intensity, m.pain_level_range,
                   t.name AS template_name, t.intensity_level, t.difficulty_score,
                   t.duration_minutes, t.reps, t.sets, t.rest_seconds, t.is_cooldown,
                   COALESCE(
                       ARRAY_AGG(eq.name ORDER BY eq.name) FILTER (WHERE eq.name IS NOT NULL),
                       ARRAY[]::TEXT[]
                   ) AS required_equipment
            FROM body_part_exercise_mappings m
            JOIN body_parts bp ON bp.id = m.body_part_id
            JOIN exercise_templates t ON t.id = m.exercise_template_id
            LEFT JOIN exercise_template_equipment te ON te.exercise_template_id = t.id
            LEFT JOIN equipment_types eq ON eq.id = te.equipment_type_id
            WHERE m.body_part_id = ANY($1) AND m.is_active AND t.is_active
            GROUP BY m.id, bp.name, t.id
            ORDER BY m.body_part_id, m.priority, m.exercise_template_id
            "#,
        )
        .bind(body_part_ids)
        .fetch_all(&self.db)
        .await?;

        debug!("Fetched {} catalog mappings for {} body parts", rows.len(), body_part_ids.len());

        rows.into_iter().map(CatalogEntry::try_from).collect()
    }

    async fn fetch_contraindications(
        &self,
        template_id: Uuid,
        body_part_id: Uuid,
        pain_level: u8,
    ) -> Result<Vec<Contraindication>, CatalogError> {
        let rows = sqlx::query_as::<_, ContraindicationRow>(
            r#"
            SELECT body_part_id, exercise_template_id, pain_level_min, condition, severity, reason
            FROM contraindications
            WHERE exercise_template_id = $1
              AND body_part_id = $2
              AND is_active
              AND (pain_level_min IS NULL OR pain_level_min <= $3)
            ORDER BY id
            "#,
        )
        .bind(template_id)
        .bind(body_part_id)
        .bind(i16::from(pain_level))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Contraindication::try_from).collect()
    }

    async fn fetch_alternatives(
        &self,
        excluded_template_id: Uuid,
        body_part_id: Uuid,
        max_difficulty: u8,
    ) -> Result<Vec<Uuid>, CatalogError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT t.id
            FROM body_part_exercise_mappings m
            JOIN exercise_templates t ON t.id = m.exercise_template_id
            WHERE m.body_part_id = $1
              AND t.id <> $2
              AND m.is_active AND t.is_active
              AND t.difficulty_score IS NOT NULL
              AND t.difficulty_score <= $3
            ORDER BY m.priority, t.id
            LIMIT $4
            "#,
        )
        .bind(body_part_id)
        .bind(excluded_template_id)
        .bind(i16::from(max_difficulty))
        .bind(MAX_ALTERNATIVES as i64)
        .fetch_all(&self.db)
        .await?;

        Ok(ids)
    }
}
