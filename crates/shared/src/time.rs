//! Timestamp formatting for the status record.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::fmt::Display;

/// Format of `last_updated`: local wall-clock time, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats a point in time as `YYYY-MM-DD HH:MM:SS` in its own timezone.
pub fn format_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time as a `last_updated` string.
pub fn local_timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Parses a `last_updated` string back into a naive local time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}
