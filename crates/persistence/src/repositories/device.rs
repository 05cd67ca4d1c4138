//! Device repository: the registered device collection.

use std::sync::Arc;

use domain::models::device::{Device, DeviceDraft, DeviceUpdate};
use domain::DomainError;
use shared::id::IdGenerator;
use shared::validation::require_param;

use super::WriteLock;
use crate::store::{load_as, save_as, DocumentStore, StoreError};

/// Repository for the device document.
///
/// Every operation reads the whole collection fresh from the store; mutations
/// write the whole collection back.
#[derive(Clone)]
pub struct DeviceRepository {
    store: Arc<dyn DocumentStore>,
    ids: Arc<dyn IdGenerator>,
    write_lock: WriteLock,
}

impl DeviceRepository {
    /// Creates a repository; `serialize_writes` guards mutations with a mutex.
    pub fn new(
        store: Arc<dyn DocumentStore>,
        ids: Arc<dyn IdGenerator>,
        serialize_writes: bool,
    ) -> Self {
        Self {
            store,
            ids,
            write_lock: WriteLock::new(serialize_writes),
        }
    }

    /// Returns all devices in insertion order.
    pub async fn list(&self) -> Result<Vec<Device>, DomainError> {
        load_as(self.store.as_ref())
            .await
            .map_err(|e| self.storage_error(e))
    }

    /// Validates and registers a new device under a freshly generated ID.
    pub async fn add_device(&self, draft: &DeviceDraft) -> Result<Device, DomainError> {
        let new_device = draft.validate()?;
        let _guard = self.write_lock.acquire().await;

        let mut devices = self.list().await?;
        let device = new_device.into_device(self.ids.new_id());
        devices.push(device.clone());
        self.persist(&devices).await?;

        Ok(device)
    }

    /// Applies a partial update to the device with the given ID.
    ///
    /// Nothing is changed unless every supplied field is valid.
    pub async fn set_device(
        &self,
        id: Option<&str>,
        update: &DeviceUpdate,
    ) -> Result<Device, DomainError> {
        let id = require_param("id", id)?;
        let _guard = self.write_lock.acquire().await;

        let mut devices = self.list().await?;
        let index = Self::position(&devices, id)?;
        let patch = update.validate()?;

        let mut device = devices[index].clone();
        patch.apply(&mut device);
        devices[index] = device.clone();
        self.persist(&devices).await?;

        Ok(device)
    }

    /// Removes the first device with the given ID and returns it.
    pub async fn remove_device(&self, id: Option<&str>) -> Result<Device, DomainError> {
        let id = require_param("id", id)?;
        let _guard = self.write_lock.acquire().await;

        let mut devices = self.list().await?;
        let index = Self::position(&devices, id)?;
        let removed = devices.remove(index);
        self.persist(&devices).await?;

        Ok(removed)
    }

    fn position(devices: &[Device], id: &str) -> Result<usize, DomainError> {
        devices
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| DomainError::device_not_found(id))
    }

    async fn persist(&self, devices: &[Device]) -> Result<(), DomainError> {
        save_as(self.store.as_ref(), &devices)
            .await
            .map_err(|e| self.storage_error(e))
    }

    fn storage_error(&self, err: StoreError) -> DomainError {
        tracing::error!(document = %self.store.name(), error = %err, "Device storage failure");
        if err.is_write() {
            DomainError::StorageUnavailable("Failed to save device data".to_string())
        } else {
            DomainError::StorageUnavailable("Failed to read devices data".to_string())
        }
    }
}
