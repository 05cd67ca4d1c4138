//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::app::AppState;

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Readiness detail per backing document.
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub status_document: bool,
    pub devices_document: bool,
}

/// Liveness probe.
///
/// GET /api/health/live
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe: the status and device documents must both be readable.
///
/// GET /api/health/ready
pub async fn ready(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let (status_ok, devices_ok) = tokio::join!(state.statuses.read(), state.devices.list());
    let status_document = status_ok.is_ok();
    let devices_document = devices_ok.is_ok();

    if status_document && devices_document {
        (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                status_document,
                devices_document,
            }),
        )
    } else {
        tracing::warn!(status_document, devices_document, "Readiness check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not ready".to_string(),
                status_document,
                devices_document,
            }),
        )
    }
}
