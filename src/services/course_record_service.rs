use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::{SaveCourseRequest, SavedCourse};

/// Persists courses the user accepted
#[derive(Clone)]
pub struct CourseRecordService {
    db: PgPool,
}

impl CourseRecordService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Write the course and its exercises in one transaction
    pub async fn save_course(&self, request: SaveCourseRequest) -> Result<SavedCourse> {
        let mut tx = self
            .db
            .begin()
            .await
            .context("Failed to start course transaction")?;

        let (course_id, created_at): (Uuid, DateTime<Utc>) = sqlx::query_as(
            r#"
            INSERT INTO courses (user_id, total_duration_minutes, pain_level, experience_level,
                                 body_parts, equipment_available, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, created_at
            "#,
        )
        .bind(request.user_id)
        .bind(request.total_duration_minutes as i32)
        .bind(i16::from(request.pain_level))
        .bind(request.experience_level.as_deref())
        .bind(&request.body_parts)
        .bind(&request.equipment_available)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .context("Failed to insert course")?;

        for exercise in &request.exercises {
            sqlx::query(
                r#"
                INSERT INTO course_exercises (course_id, exercise_template_id, section, order_in_section,
                                              body_part_ids, priority_score, duration_minutes, reps,
                                              sets, rest_seconds)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(course_id)
            .bind(exercise.exercise_template_id)
            .bind(exercise.section.as_str())
            .bind(exercise.order_in_section as i32)
            .bind(&exercise.body_part_ids)
            .bind(exercise.priority_score)
            .bind(exercise.duration_minutes.map(|v| v as i32))
            .bind(exercise.reps.map(|v| v as i32))
            .bind(exercise.sets.map(|v| v as i32))
            .bind(exercise.rest_seconds.map(|v| v as i32))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to insert course exercise {}", exercise.exercise_template_id))?;
        }

        tx.commit().await.context("Failed to commit course")?;

        info!("Saved course {} with {} exercises", course_id, request.exercises.len());

        Ok(SavedCourse {
            course_id,
            exercise_count: request.exercises.len(),
            created_at,
        })
    }
}
