//! Service banner, site metadata and the error-envelope preview.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::config::SiteConfig;
use crate::error::ErrorEnvelope;
use crate::extractors::QueryParams;

/// Package version as reported to clients.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub success: bool,
    pub message: String,
    pub version: String,
}

/// Site metadata consumed by the front-end.
#[derive(Debug, Serialize)]
pub struct MetaResponse {
    pub success: bool,
    pub version: [u32; 3],
    pub version_str: String,
    pub timezone: String,
    pub page: PageMeta,
    pub metrics: bool,
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub background: String,
    pub desc: String,
    pub favicon: String,
    pub name: String,
    pub theme: String,
    pub title: String,
}

impl MetaResponse {
    pub fn from_site(site: &SiteConfig) -> Self {
        Self {
            success: true,
            version: version_parts(VERSION),
            version_str: VERSION.to_string(),
            timezone: site.timezone.clone(),
            page: PageMeta {
                background: site.background.clone(),
                desc: site.description.clone(),
                favicon: site.favicon.clone(),
                name: site.name.clone(),
                theme: site.theme.clone(),
                title: site.name.clone(),
            },
            metrics: true,
        }
    }
}

/// Splits `major.minor.patch`; missing or non-numeric parts read as 0.
fn version_parts(version: &str) -> [u32; 3] {
    let mut parts = [0; 3];
    for (slot, part) in parts.iter_mut().zip(version.split('.')) {
        *slot = part
            .split(|c: char| !c.is_ascii_digit())
            .next()
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0);
    }
    parts
}

#[derive(Debug, Deserialize)]
pub struct ErrorsQuery {
    pub code: Option<String>,
}

/// Service banner.
///
/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        success: true,
        message: "Sleepy status server is running".to_string(),
        version: VERSION.to_string(),
    })
}

/// Site metadata.
///
/// GET, POST /api/meta
pub async fn site_meta(State(state): State<AppState>) -> Json<MetaResponse> {
    Json(MetaResponse::from_site(&state.config.site))
}

/// Renders the error envelope for an HTTP error code.
///
/// GET /errors?code=N
pub async fn error_preview(
    QueryParams(query): QueryParams<ErrorsQuery>,
) -> ErrorEnvelope {
    match query.code.as_deref().and_then(error_status) {
        Some(status) => {
            let reason = status.canonical_reason().unwrap_or_default();
            ErrorEnvelope::new(status, reason)
        }
        None => {
            tracing::debug!(code = ?query.code, "Unknown error code requested");
            ErrorEnvelope::new(StatusCode::BAD_REQUEST, "Unknown error code")
        }
    }
}

/// Client and server error codes that have a standard reason phrase.
fn error_status(raw: &str) -> Option<StatusCode> {
    let code: u16 = raw.trim().parse().ok()?;
    StatusCode::from_u16(code)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .filter(|s| s.canonical_reason().is_some())
}
