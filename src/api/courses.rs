use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::composer::ComposerError;
use crate::models::{
    validate_save_request, CourseRequest, CourseResponse, DifficultyAdjustment, SaveCourseRequest,
    SavedCourse,
};
use crate::services::{CourseComposerService, CourseRecordService};

#[derive(Clone)]
pub struct CourseAppState {
    pub composer: CourseComposerService,
    /// `None` when no database is configured
    pub records: Option<CourseRecordService>,
}

impl CourseAppState {
    pub fn new(composer: CourseComposerService, records: Option<CourseRecordService>) -> Self {
        Self { composer, records }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyQuery {
    pub experience_level: Option<String>,
    pub pain_level: u8,
}

pub fn course_routes(state: CourseAppState) -> Router {
    Router::new()
        .route("/compose", post(compose_course))
        .route("/difficulty", get(preview_difficulty))
        .route("/save", post(save_course))
        .with_state(state)
}

/// Compose a course for the selected body parts
pub async fn compose_course(
    State(state): State<CourseAppState>,
    Json(request): Json<CourseRequest>,
) -> Result<Json<CourseResponse>, ComposerError> {
    let response = state.composer.compose(request).await?;
    Ok(Json(response))
}

/// Preview the difficulty tier for an experience and pain level
pub async fn preview_difficulty(
    State(state): State<CourseAppState>,
    Query(query): Query<DifficultyQuery>,
) -> Result<Json<DifficultyAdjustment>, ComposerError> {
    let adjustment = state
        .composer
        .preview_difficulty(query.experience_level.as_deref(), query.pain_level)?;
    Ok(Json(adjustment))
}

/// Persist a course the user accepted
pub async fn save_course(
    State(state): State<CourseAppState>,
    Json(request): Json<SaveCourseRequest>,
) -> Result<Json<SavedCourse>, ComposerError> {
    let records = state
        .records
        .as_ref()
        .ok_or(ComposerError::PersistenceUnavailable)?;

    validate_save_request(&request).map_err(ComposerError::Validation)?;

    let saved = records.save_course(request).await?;
    Ok(Json(saved))
}
