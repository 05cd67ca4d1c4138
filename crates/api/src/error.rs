use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain::DomainError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StorageUnavailable(_) | ApiError::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::StorageUnavailable(msg)
            | ApiError::Configuration(msg) => msg,
        }
    }
}

/// Uniform body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub code: u16,
    pub details: String,
    pub message: String,
}

impl ErrorEnvelope {
    /// Builds an envelope whose `details` is the standard reason phrase of `status`.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: status.as_u16(),
            details: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
        }
    }

    /// Status the envelope should be served with.
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::StorageUnavailable(msg) => tracing::error!("Storage unavailable: {}", msg),
            ApiError::Configuration(msg) => tracing::error!("Configuration error: {}", msg),
            _ => {}
        }

        ErrorEnvelope::new(self.status_code(), self.message()).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::StorageUnavailable(msg) => ApiError::StorageUnavailable(msg),
        }
    }
}

/// Fallback for unmatched routes.
pub async fn not_found_fallback() -> ErrorEnvelope {
    ErrorEnvelope::new(StatusCode::NOT_FOUND, "The requested resource does not exist")
}

/// Fallback for known routes called with an unsupported method.
pub async fn method_not_allowed_fallback() -> ErrorEnvelope {
    ErrorEnvelope::new(
        StatusCode::METHOD_NOT_ALLOWED,
        "The requested method is not supported for this resource",
    )
}
