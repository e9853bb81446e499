use anyhow::{Context, Result};
use sqlx::PgPool;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::catalog::InMemoryCatalog;
use crate::models::{
    BodyPartExerciseMapping as Mapping, Condition, Contraindication, ExerciseTemplate as Template,
    PainLevelRange, Severity,
};

pub const LOWER_BACK: Uuid = Uuid::from_u128(0x1001);
pub const KNEE: Uuid = Uuid::from_u128(0x1002);
pub const SHOULDER: Uuid = Uuid::from_u128(0x1003);
pub const NECK: Uuid = Uuid::from_u128(0x1004);

const fn template_id(n: u128) -> Uuid {
    Uuid::from_u128(0x2000 + n)
}

/// Deterministic sample catalog for the demo server, CLI and tests
pub fn demo_catalog() -> InMemoryCatalog {
    let mat = ["매트"];
    let band = ["밴드"];
    let dumbbell = ["덤벨"];
    let barbell = ["바벨"];

    InMemoryCatalog::new()
        .with_body_part(LOWER_BACK, "허리")
        .with_body_part(KNEE, "무릎")
        .with_body_part(SHOULDER, "어깨")
        .with_body_part(NECK, "목")
        // warm-up
        .with_template(Template::new(template_id(101), "골반 기울이기").intensity(1).difficulty(1).duration(3).volume(10, 2, 30))
        .with_template(Template::new(template_id(102), "고양이-소 스트레칭").intensity(1).difficulty(2).duration(4).volume(10, 2, 20).equipment(mat))
        .with_template(Template::new(template_id(103), "무릎 당기기").intensity(2).difficulty(2).duration(3).volume(10, 2, 30))
        .with_template(Template::new(template_id(104), "뒤꿈치 밀기").intensity(1).difficulty(1).duration(3).volume(12, 2, 30))
        .with_template(Template::new(template_id(105), "어깨 돌리기").intensity(1).difficulty(1).duration(2).volume(15, 2, 20))
        .with_template(Template::new(template_id(106), "턱 당기기").intensity(1).difficulty(1).duration(2).volume(10, 2, 20))
        .with_template(Template::new(template_id(107), "진자 운동").intensity(1).difficulty(2).duration(3).volume(20, 2, 30))
        // main
        .with_template(Template::new(template_id(201), "브릿지").intensity(3).difficulty(3).duration(6).volume(12, 3, 45).equipment(mat))
        .with_template(Template::new(template_id(202), "버드독").intensity(3).difficulty(4).duration(6).volume(10, 3, 45).equipment(mat))
        .with_template(Template::new(template_id(203), "데드버그").intensity(3).difficulty(5).duration(6).volume(10, 3, 45).equipment(mat))
        .with_template(Template::new(template_id(204), "루마니안 데드리프트").intensity(4).difficulty(8).duration(10).volume(8, 4, 90).equipment(barbell))
        .with_template(Template::new(template_id(205), "벽 스쿼트").intensity(3).difficulty(4).duration(5).volume(5, 3, 60))
        .with_template(Template::new(template_id(206), "고블릿 스쿼트").intensity(4).difficulty(6).duration(8).volume(10, 3, 60).equipment(dumbbell))
        .with_template(Template::new(template_id(207), "점프 스쿼트").intensity(5).difficulty(9).duration(6).volume(10, 3, 90))
        .with_template(Template::new(template_id(208), "밴드 외회전").intensity(3).difficulty(3).duration(6).volume(15, 3, 45).equipment(band))
        .with_template(Template::new(template_id(209), "덤벨 숄더 프레스").intensity(4).difficulty(7).duration(8).volume(10, 3, 60).equipment(dumbbell))
        .with_template(Template::new(template_id(210), "벽 푸시업").intensity(3).difficulty(2).duration(5).volume(12, 3, 45))
        .with_template(Template::new(template_id(211), "등척성 목 버티기").intensity(3).difficulty(2).duration(5).volume(5, 3, 30))
        .with_template(Template::new(template_id(212), "플랭크").intensity(3).difficulty(4).duration(5).volume(3, 3, 45).equipment(mat))
        .with_template(Template::new(template_id(213), "힙 힌지").intensity(3).difficulty(3).duration(5).volume(12, 3, 45))
        // cool-down
        .with_template(Template::new(template_id(301), "아기 자세").intensity(1).difficulty(1).duration(3).equipment(mat).cooldown())
        .with_template(Template::new(template_id(302), "햄스트링 스트레칭").intensity(1).difficulty(1).duration(3).cooldown())
        .with_template(Template::new(template_id(303), "상부 승모근 스트레칭").intensity(1).difficulty(1).duration(2).cooldown())
        .with_template(Template::new(template_id(304), "대퇴사두근 스트레칭").intensity(1).difficulty(1).duration(3).cooldown())
        // 허리
        .with_mapping(Mapping::new(LOWER_BACK, template_id(101), 1))
        .with_mapping(Mapping::new(LOWER_BACK, template_id(103), 2))
        .with_mapping(Mapping::new(LOWER_BACK, template_id(102), 3))
        .with_mapping(Mapping::new(LOWER_BACK, template_id(213), 4))
        .with_mapping(Mapping::new(LOWER_BACK, template_id(201), 5))
        .with_mapping(Mapping::new(LOWER_BACK, template_id(202), 6))
        .with_mapping(Mapping::new(LOWER_BACK, template_id(203), 7))
        .with_mapping(Mapping::new(LOWER_BACK, template_id(212), 8))
        .with_mapping(Mapping::new(LOWER_BACK, template_id(204), 9))
        .with_mapping(Mapping::new(LOWER_BACK, template_id(301), 10))
        .with_mapping(Mapping::new(LOWER_BACK, template_id(302), 11))
        // 무릎
        .with_mapping(Mapping::new(KNEE, template_id(104), 1))
        .with_mapping(Mapping::new(KNEE, template_id(103), 2).intensity(1))
        .with_mapping(Mapping::new(KNEE, template_id(201), 3))
        .with_mapping(Mapping::new(KNEE, template_id(205), 4).pain_range(PainLevelRange::Between { min: 1, max: 3 }))
        .with_mapping(Mapping::new(KNEE, template_id(206), 5))
        .with_mapping(Mapping::new(KNEE, template_id(207), 6).pain_range(PainLevelRange::Between { min: 1, max: 2 }))
        .with_mapping(Mapping::new(KNEE, template_id(302), 7))
        .with_mapping(Mapping::new(KNEE, template_id(304), 8))
        // 어깨
        .with_mapping(Mapping::new(SHOULDER, template_id(105), 1))
        .with_mapping(Mapping::new(SHOULDER, template_id(107), 2))
        .with_mapping(Mapping::new(SHOULDER, template_id(208), 3))
        .with_mapping(Mapping::new(SHOULDER, template_id(210), 4))
        .with_mapping(Mapping::new(SHOULDER, template_id(209), 5))
        .with_mapping(Mapping::new(SHOULDER, template_id(212), 6))
        .with_mapping(Mapping::new(SHOULDER, template_id(303), 7))
        // 목
        .with_mapping(Mapping::new(NECK, template_id(106), 1))
        .with_mapping(Mapping::new(NECK, template_id(105), 2))
        .with_mapping(Mapping::new(NECK, template_id(102), 3))
        .with_mapping(Mapping::new(NECK, template_id(211), 4))
        .with_mapping(Mapping::new(NECK, template_id(303), 5))
        .with_contraindication(
            Contraindication::new(LOWER_BACK, template_id(204), Severity::Hard)
                .from_pain_level(3)
                .reason("Loaded spinal flexion is unsafe with this level of back pain"),
        )
        .with_contraindication(
            Contraindication::new(KNEE, template_id(206), Severity::Soft)
                .from_pain_level(3)
                .reason("Limit knee flexion to a pain-free range"),
        )
        .with_contraindication(
            Contraindication::new(KNEE, template_id(207), Severity::Hard)
                .for_condition(Condition::Acute)
                .reason("Impact loading during an acute knee injury"),
        )
        .with_contraindication(
            Contraindication::new(SHOULDER, template_id(209), Severity::Hard)
                .from_pain_level(4)
                .reason("Overhead pressing aggravates shoulder pain"),
        )
        .with_contraindication(
            Contraindication::new(LOWER_BACK, template_id(212), Severity::Soft)
                .reason("Keep the pelvis neutral"),
        )
}

fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Soft => "soft",
        Severity::Hard => "hard",
    }
}

/// Copies an in-memory catalog into PostgreSQL. Existing rows are kept.
pub struct CatalogSeeder {
    pool: PgPool,
}

impl CatalogSeeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn seed_catalog(&self, catalog: &InMemoryCatalog) -> Result<()> {
        tracing::info!("Starting catalog seeding...");

        let mut tx = self.pool.begin().await.context("Failed to start seeding transaction")?;

        for body_part in catalog.body_parts() {
            sqlx::query("INSERT INTO body_parts (id, name) VALUES ($1, $2) ON CONFLICT DO NOTHING")
                .bind(body_part.id)
                .bind(&body_part.name)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to seed body part {}", body_part.name))?;
        }

        let equipment: BTreeSet<&str> = catalog
            .templates()
            .flat_map(|t| t.required_equipment.iter().map(String::as_str))
            .collect();
        for name in equipment {
            sqlx::query("INSERT INTO equipment_types (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(name)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to seed equipment {}", name))?;
        }

        for template in catalog.templates() {
            sqlx::query(
                r#"
                INSERT INTO exercise_templates (id, name, intensity_level, difficulty_score, duration_minutes,
                                                reps, sets, rest_seconds, is_cooldown, is_active)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(template.id)
            .bind(&template.name)
            .bind(template.intensity_level.map(i16::from))
            .bind(template.difficulty_score.map(i16::from))
            .bind(template.duration_minutes.map(|v| v as i32))
            .bind(template.reps.map(|v| v as i32))
            .bind(template.sets.map(|v| v as i32))
            .bind(template.rest_seconds.map(|v| v as i32))
            .bind(template.is_cooldown)
            .bind(template.is_active)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to seed exercise template {}", template.name))?;

            for name in &template.required_equipment {
                sqlx::query(
                    r#"
                    INSERT INTO exercise_template_equipment (exercise_template_id, equipment_type_id)
                    SELECT $1, id FROM equipment_types WHERE name = $2
                    ON CONFLICT DO NOTHING
                    "#,
                )
                .bind(template.id)
                .bind(name)
                .execute(&mut *tx)
                .await?;
            }
        }

        for mapping in catalog.mappings() {
            sqlx::query(
                r#"
                INSERT INTO body_part_exercise_mappings (body_part_id, exercise_template_id, priority,
                                                         intensity_level, pain_level_range, is_active)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (body_part_id, exercise_template_id) DO NOTHING
                "#,
            )
            .bind(mapping.body_part_id)
            .bind(mapping.exercise_template_id)
            .bind(mapping.priority)
            .bind(mapping.intensity_level.map(i16::from))
            .bind(mapping.pain_level_range.map(|range| range.to_string()))
            .bind(mapping.is_active)
            .execute(&mut *tx)
            .await
            .context("Failed to seed body part mapping")?;
        }

        for rule in catalog.contraindications() {
            sqlx::query(
                r#"
                INSERT INTO contraindications (body_part_id, exercise_template_id, pain_level_min,
                                               condition, severity, reason)
                SELECT $1, $2, $3, $4, $5, $6
                WHERE NOT EXISTS (
                    SELECT 1 FROM contraindications
                    WHERE body_part_id = $1 AND exercise_template_id = $2 AND severity = $5
                )
                "#,
            )
            .bind(rule.body_part_id)
            .bind(rule.exercise_template_id)
            .bind(rule.pain_level_min.map(i16::from))
            .bind(rule.condition.map(|c| c.to_string()))
            .bind(severity_name(rule.severity))
            .bind(rule.reason.as_deref())
            .execute(&mut *tx)
            .await
            .context("Failed to seed contraindication")?;
        }

        tx.commit().await.context("Failed to commit catalog seed")?;

        tracing::info!("Catalog seeding completed!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogReader;

    #[test]
    fn test_demo_catalog_is_consistent() {
        let catalog = demo_catalog();
        assert_eq!(catalog.body_parts().count(), 4);
        for mapping in catalog.mappings() {
            assert!(catalog.template(mapping.exercise_template_id).is_some());
        }
        for rule in catalog.contraindications() {
            assert!(catalog.template(rule.exercise_template_id).is_some());
        }
        assert_eq!(catalog.body_part_by_name("허리").map(|bp| bp.id), Some(LOWER_BACK));
    }

    #[tokio::test]
    async fn test_demo_catalog_shares_templates_across_body_parts() {
        let catalog = demo_catalog();
        let entries = catalog.fetch_mappings(&[LOWER_BACK, KNEE]).await.unwrap();
        let bridges = entries
            .iter()
            .filter(|e| e.template.id == template_id(201))
            .count();
        assert_eq!(bridges, 2);
    }
}
