//! Error types and handling for web handlers

use axum::{Json as AxumJson, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::core::error::ArtifactError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Artifact source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::SourceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ArtifactError> for ApiError {
    fn from(error: ArtifactError) -> Self {
        match error {
            ArtifactError::Io { .. } => ApiError::SourceUnavailable(error.to_string()),
            ArtifactError::MissingProvidedVariable { .. } => ApiError::Internal(error.to_string()),
            ArtifactError::Variables(_) | ArtifactError::VariablesNotAnObject => {
                ApiError::InvalidQuery(error.to_string())
            }
            _ => ApiError::ValidationError(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = AxumJson(serde_json::json!({
            "status": status.as_u16(),
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}
