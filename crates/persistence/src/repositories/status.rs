//! Status repository: the single status record.

use std::sync::Arc;

use domain::models::StatusRecord;
use domain::DomainError;
use shared::time::local_timestamp;

use super::WriteLock;
use crate::store::{load_as, save_as, DocumentStore, StoreError};

/// Repository for the status document.
#[derive(Clone)]
pub struct StatusRepository {
    store: Arc<dyn DocumentStore>,
    write_lock: WriteLock,
}

impl StatusRepository {
    /// Creates a repository; `serialize_writes` guards status changes with a mutex.
    pub fn new(store: Arc<dyn DocumentStore>, serialize_writes: bool) -> Self {
        Self {
            store,
            write_lock: WriteLock::new(serialize_writes),
        }
    }

    /// Loads the current status record.
    pub async fn read(&self) -> Result<StatusRecord, DomainError> {
        load_as(self.store.as_ref())
            .await
            .map_err(|e| self.storage_error(e))
    }

    /// Sets the status code and stamps `last_updated` with the local time.
    ///
    /// The record is only returned once it has been persisted.
    pub async fn set_status(&self, status: i64) -> Result<StatusRecord, DomainError> {
        let _guard = self.write_lock.acquire().await;

        let mut record = self.read().await?;
        record.apply(status, local_timestamp());

        save_as(self.store.as_ref(), &record)
            .await
            .map_err(|e| self.storage_error(e))?;

        tracing::debug!(
            status = record.status,
            last_updated = %record.last_updated,
            "Status record persisted"
        );
        Ok(record)
    }

    fn storage_error(&self, err: StoreError) -> DomainError {
        tracing::error!(document = %self.store.name(), error = %err, "Status storage failure");
        if err.is_write() {
            DomainError::StorageUnavailable("Failed to update status".to_string())
        } else {
            DomainError::StorageUnavailable("Failed to read data file".to_string())
        }
    }
}
