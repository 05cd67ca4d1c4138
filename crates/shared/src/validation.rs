//! Common validation utilities for query-string inputs.
//!
//! Every mutating endpoint receives its arguments as strings, so these helpers
//! turn raw values into typed ones and report failures as `ValidationError`s
//! whose message is shown to the caller verbatim.

use validator::ValidationError;

/// Literal accepted for a true boolean flag.
pub const FLAG_TRUE: &str = "true";

/// Literal accepted for a false boolean flag.
pub const FLAG_FALSE: &str = "false";

/// Returns the value of a required parameter.
///
/// Absent and empty values are both treated as missing.
pub fn require_param<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => {
            let mut err = ValidationError::new("required");
            err.message = Some(format!("Missing required parameter '{}'", name).into());
            Err(err)
        }
    }
}

/// Parses a boolean flag that must literally be `"true"` or `"false"`.
pub fn parse_bool_flag(name: &str, raw: &str) -> Result<bool, ValidationError> {
    match raw {
        FLAG_TRUE => Ok(true),
        FLAG_FALSE => Ok(false),
        _ => {
            let mut err = ValidationError::new("boolean");
            err.message = Some(
                format!("Argument '{}' must be boolean (\"true\" or \"false\")", name).into(),
            );
            Err(err)
        }
    }
}

/// Parses a signed integer argument. The whole value must be numeric.
pub fn parse_integer(name: &str, raw: &str) -> Result<i64, ValidationError> {
    raw.parse::<i64>().map_err(|_| {
        let mut err = ValidationError::new("number");
        err.message = Some(format!("Argument '{}' must be a number", name).into());
        err
    })
}

/// Extracts the human-readable message from a validation error.
pub fn message_of(err: &ValidationError) -> String {
    err.message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string())
}
