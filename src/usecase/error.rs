use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::repository::errors::RepositoryError;
use crate::usecase::validation::ValidationError;

pub const SERVER_ERROR_MESSAGE: &str = "server error";

#[derive(Debug, Error)]
pub enum UsecaseError {
    #[error("{0} doesn't exist")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

/// Attached to 500 responses so that a non-production deployment can swap
/// the opaque body for the underlying failure.
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

impl From<ValidationError> for UsecaseError {
    fn from(e: ValidationError) -> Self {
        UsecaseError::Validation(e.to_string())
    }
}

impl From<RepositoryError> for UsecaseError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => UsecaseError::NotFound("Bookmark".to_string()),
            RepositoryError::DatabaseError(msg) => UsecaseError::Internal(msg),
        }
    }
}

impl IntoResponse for UsecaseError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            UsecaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UsecaseError::Validation(_) => StatusCode::BAD_REQUEST,
            UsecaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            UsecaseError::Internal(_) => {
                tracing::error!(error = %self, "internal error");
            }
            UsecaseError::NotFound(_) => {
                tracing::warn!(error = %self, "resource not found");
            }
            UsecaseError::Validation(_) => {
                tracing::debug!(error = %self);
            }
        }

        match self {
            UsecaseError::Internal(detail) => {
                let mut response = (
                    status,
                    Json(json!({ "error": { "message": SERVER_ERROR_MESSAGE } })),
                )
                    .into_response();
                response.extensions_mut().insert(InternalErrorDetail(detail));
                response
            }
            other => (status, Json(json!({ "error": { "message": other.to_string() } })))
                .into_response(),
        }
    }
}
