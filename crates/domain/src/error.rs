//! Domain error types.

use thiserror::Error;

use shared::validation::message_of;

/// Failures of status and device operations.
///
/// The message of each variant is shown to API callers as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Client input is missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The referenced device does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A backing document could not be read, parsed or written.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl DomainError {
    /// Human-readable detail without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            DomainError::Validation(msg)
            | DomainError::NotFound(msg)
            | DomainError::StorageUnavailable(msg) => msg,
        }
    }

    pub fn device_not_found(id: &str) -> Self {
        DomainError::NotFound(format!("Device with ID {} not found", id))
    }
}

impl From<validator::ValidationError> for DomainError {
    fn from(err: validator::ValidationError) -> Self {
        DomainError::Validation(message_of(&err))
    }
}
