use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;

#[derive(Error, Debug)]
pub enum ComposerError {
    #[error("{0}")]
    Validation(String),
    #[error("Exercise catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),
    #[error("Failed to save course: {0}")]
    Persistence(#[from] anyhow::Error),
    #[error("Course saving is not configured")]
    PersistenceUnavailable,
}

impl ComposerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ComposerError::Validation(_) => StatusCode::BAD_REQUEST,
            ComposerError::CatalogUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ComposerError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ComposerError::PersistenceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ComposerError::Validation(_) => "Invalid course request",
            ComposerError::CatalogUnavailable(_) => "Catalog unavailable",
            ComposerError::Persistence(_) => "Persistence error",
            ComposerError::PersistenceUnavailable => "Persistence unavailable",
        }
    }
}

impl IntoResponse for ComposerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Course request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.kind(),
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}
