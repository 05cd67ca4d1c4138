//! Anonymous read endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::{Device, StatusRecord};

/// Current status merged with every registered device.
#[derive(Debug, Serialize)]
pub struct StatusOverview {
    pub success: bool,
    #[serde(flatten)]
    pub record: StatusRecord,
    pub device_status: Vec<Device>,
}

impl StatusOverview {
    /// Keys of the overview itself; stored fields with these names are not echoed.
    const RESERVED_KEYS: [&'static str; 2] = ["success", "device_status"];

    pub fn new(mut record: StatusRecord, device_status: Vec<Device>) -> Self {
        for key in Self::RESERVED_KEYS {
            record.extra.remove(key);
        }
        Self {
            success: true,
            record,
            device_status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusListResponse {
    pub success: bool,
    #[serde(rename = "statusList")]
    pub status_list: Value,
}

/// Current status and device states.
///
/// GET /api/query/status, GET /api/status
pub async fn status_overview(
    State(state): State<AppState>,
) -> Result<Json<StatusOverview>, ApiError> {
    let record = state.statuses.read().await?;
    let device_status = state.devices.list().await?;

    Ok(Json(StatusOverview::new(record, device_status)))
}

/// The status-code reference list, passed through as stored.
///
/// GET /api/query/status/list
pub async fn status_list(
    State(state): State<AppState>,
) -> Result<Json<StatusListResponse>, ApiError> {
    let status_list = state.status_list.list().await?;
    Ok(Json(StatusListResponse {
        success: true,
        status_list,
    }))
}
