//! Status domain model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DomainError;
use shared::validation::{parse_integer, require_param};

/// The owner's current status.
///
/// Exactly one record exists per deployment. Fields other than `status` and
/// `last_updated` are carried through reads and writes untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub status: i64,
    #[serde(default)]
    pub last_updated: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StatusRecord {
    pub fn new(status: i64, last_updated: impl Into<String>) -> Self {
        Self {
            status,
            last_updated: last_updated.into(),
            extra: Map::new(),
        }
    }

    /// Overwrites the status code and its timestamp.
    pub fn apply(&mut self, status: i64, last_updated: impl Into<String>) {
        self.status = status;
        self.last_updated = last_updated.into();
    }
}

/// Validates the raw `status` argument of a set-status request.
pub fn parse_status_code(raw: Option<&str>) -> Result<i64, DomainError> {
    let raw = require_param("status", raw)?;
    Ok(parse_integer("status", raw)?)
}

/// Response payload for a successful status change.
#[derive(Debug, Clone, Serialize)]
pub struct SetStatusResponse {
    pub success: bool,
    pub code: String,
    pub set_to: i64,
}

impl SetStatusResponse {
    pub fn new(set_to: i64) -> Self {
        Self {
            success: true,
            code: "OK".to_string(),
            set_to,
        }
    }
}
