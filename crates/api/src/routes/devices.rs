//! Device endpoint handlers.

use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::QueryParams;
use crate::middleware::metrics::{record_device_mutation, DeviceMutation};
use domain::models::device::{DeviceDraft, DeviceListResponse, DeviceResponse, DeviceUpdate};

/// Query parameters for device update.
#[derive(Debug, Deserialize)]
pub struct SetDeviceQuery {
    pub id: Option<String>,
    #[serde(flatten)]
    pub update: DeviceUpdate,
}

/// Query parameters for device removal.
#[derive(Debug, Deserialize)]
pub struct RemoveDeviceQuery {
    pub id: Option<String>,
}

/// List all registered devices.
///
/// GET /api/device/list
pub async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<DeviceListResponse>, ApiError> {
    let devices = state.devices.list().await?;
    Ok(Json(devices.into()))
}

/// Register a new device.
///
/// GET, POST /api/device/add?show_name=&using=&app_name=
pub async fn add_device(
    State(state): State<AppState>,
    QueryParams(draft): QueryParams<DeviceDraft>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let device = state.devices.add_device(&draft).await.map_err(|e| {
        tracing::info!(error = %e, "Device add rejected");
        e
    })?;
    record_device_mutation(DeviceMutation::Add);

    tracing::info!(
        device_id = %device.id,
        show_name = %device.show_name,
        "Device added"
    );

    Ok(Json(DeviceResponse::added(device)))
}

/// Partially update a device.
///
/// GET, POST /api/device/set?id=&show_name=&using=&app_name=
pub async fn set_device(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SetDeviceQuery>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let device = state
        .devices
        .set_device(query.id.as_deref(), &query.update)
        .await
        .map_err(|e| {
            tracing::info!(device_id = ?query.id, error = %e, "Device update rejected");
            e
        })?;
    record_device_mutation(DeviceMutation::Set);

    tracing::info!(
        device_id = %device.id,
        using = device.using,
        app_name = %device.app_name,
        "Device updated"
    );

    Ok(Json(DeviceResponse::updated(device)))
}

/// Remove a device.
///
/// GET, POST /api/device/remove?id=
pub async fn remove_device(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<RemoveDeviceQuery>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let device = state
        .devices
        .remove_device(query.id.as_deref())
        .await
        .map_err(|e| {
            tracing::info!(device_id = ?query.id, error = %e, "Device removal rejected");
            e
        })?;
    record_device_mutation(DeviceMutation::Remove);

    tracing::info!(device_id = %device.id, "Device removed");

    Ok(Json(DeviceResponse::removed(device)))
}
