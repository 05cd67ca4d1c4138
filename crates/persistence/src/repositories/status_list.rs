//! Read-only access to the status-code reference list.

use serde_json::Value;
use std::sync::Arc;

use domain::DomainError;

use crate::store::{load_as, DocumentStore};

/// Repository for the status list document. The content is returned as-is.
#[derive(Clone)]
pub struct StatusListRepository {
    store: Arc<dyn DocumentStore>,
}

impl StatusListRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Value, DomainError> {
        load_as(self.store.as_ref()).await.map_err(|e| {
            tracing::error!(document = %self.store.name(), error = %e, "Status list unavailable");
            DomainError::StorageUnavailable("Failed to read status list".to_string())
        })
    }
}
