//! Shared-secret authentication middleware.
//!
//! Mutating routes require the deployment's secret. Callers may present it in
//! one of four places, checked in order until a non-empty value is found:
//! 1. `secret` query parameter
//! 2. `Sleepy-Secret` header
//! 3. `Authorization: Bearer <secret>` header
//! 4. `secret` field of a JSON body (write methods only)

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, Method, Request, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::app::AppState;
use crate::config::AuthConfig;
use crate::error::ApiError;
use shared::crypto::{secret_fingerprint, secrets_match};

/// Query parameter carrying the secret.
pub const SECRET_QUERY_PARAM: &str = "secret";

/// Header carrying the secret.
pub const SECRET_HEADER: &str = "sleepy-secret";

const BEARER_PREFIX: &str = "Bearer ";

const MISSING_SECRET: &str =
    "No secret provided, please provide a valid secret for authentication";
const INCORRECT_SECRET: &str = "Provided secret is incorrect, please check and try again";

/// Where a candidate secret was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretSource {
    Query,
    Header,
    Bearer,
    Body,
}

#[derive(Debug, Deserialize)]
struct SecretBody {
    secret: Option<String>,
}

/// Middleware that requires the shared secret.
///
/// The request reaches the handler unchanged on success. A body buffered to
/// look for the secret is put back before the request is forwarded.
pub async fn require_secret(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&state.config.auth, req, state.config.server.max_body_size).await {
        Ok(req) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}

/// Checks the request against the configured secret.
pub async fn authenticate(
    auth: &AuthConfig,
    req: Request<Body>,
    body_limit: usize,
) -> Result<Request<Body>, ApiError> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    if !auth.is_configured() {
        tracing::error!(method = %method, path = %path, "Shared secret is not configured");
        return Err(ApiError::Configuration(
            "Authentication secret is not configured".to_string(),
        ));
    }

    let (req, candidate) = extract_secret(req, body_limit).await?;

    let (provided, source) = match candidate {
        Some(found) => found,
        None => {
            tracing::warn!(method = %method, path = %path, "No secret provided by client");
            return Err(ApiError::Unauthorized(MISSING_SECRET.to_string()));
        }
    };

    if !secrets_match(&provided, &auth.secret) {
        tracing::warn!(method = %method, path = %path, source = ?source, "Incorrect secret provided");
        tracing::debug!(
            provided = %secret_fingerprint(&provided),
            expected = %secret_fingerprint(&auth.secret),
            "Secret fingerprint mismatch"
        );
        return Err(ApiError::Unauthorized(INCORRECT_SECRET.to_string()));
    }

    tracing::debug!(method = %method, path = %path, source = ?source, "Secret accepted");
    Ok(req)
}

/// Finds the first non-empty candidate secret.
///
/// Returns the request (rebuilt if its body had to be read) with the candidate.
pub async fn extract_secret(
    req: Request<Body>,
    body_limit: usize,
) -> Result<(Request<Body>, Option<(String, SecretSource)>), ApiError> {
    if let Some(found) = secret_from_parts(req.uri(), req.headers())? {
        return Ok((req, Some(found)));
    }

    if !is_write_method(req.method()) {
        return Ok((req, None));
    }

    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, body_limit)
        .await
        .map_err(|_| ApiError::Validation("Request body could not be read".to_string()))?;
    let candidate = secret_from_body(&bytes).map(|s| (s, SecretSource::Body));

    Ok((Request::from_parts(parts, Body::from(bytes)), candidate))
}

/// Looks for a secret in the query string and headers, in precedence order.
///
/// A `secret` query parameter given more than once is never a match.
pub fn secret_from_parts(
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Option<(String, SecretSource)>, ApiError> {
    let mut from_query = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map(|Query(pairs)| pairs)
        .unwrap_or_default()
        .into_iter()
        .filter(|(key, value)| key == SECRET_QUERY_PARAM && !value.is_empty())
        .map(|(_, value)| value);
    match (from_query.next(), from_query.next()) {
        (Some(_), Some(_)) => {
            tracing::warn!(path = %uri.path(), "Secret query parameter given more than once");
            return Err(ApiError::Unauthorized(INCORRECT_SECRET.to_string()));
        }
        (Some(secret), None) => return Ok(Some((secret, SecretSource::Query))),
        _ => {}
    }

    let from_header = headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty());
    if let Some(secret) = from_header {
        return Ok(Some((secret.to_string(), SecretSource::Header)));
    }

    Ok(headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .filter(|s| !s.is_empty())
        .map(|s| (s.to_string(), SecretSource::Bearer)))
}

fn secret_from_body(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<SecretBody>(bytes)
        .ok()
        .and_then(|b| b.secret)
        .filter(|s| !s.is_empty())
}

fn is_write_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
