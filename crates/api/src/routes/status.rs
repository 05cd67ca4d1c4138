//! Status mutation endpoint.

use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::QueryParams;
use crate::middleware::metrics::record_status_update;
use domain::models::status::{parse_status_code, SetStatusResponse};

#[derive(Debug, Deserialize)]
pub struct SetStatusQuery {
    pub status: Option<String>,
}

/// Sets the owner's status code.
///
/// GET, POST /api/set?status=<code>
pub async fn set_status(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SetStatusQuery>,
) -> Result<Json<SetStatusResponse>, ApiError> {
    let code = parse_status_code(query.status.as_deref()).map_err(|e| {
        tracing::info!(raw = ?query.status, error = %e, "Rejected status update");
        e
    })?;

    let record = state.statuses.set_status(code).await?;
    record_status_update();

    tracing::info!(
        status = record.status,
        last_updated = %record.last_updated,
        "Status updated"
    );

    Ok(Json(SetStatusResponse::new(record.status)))
}
