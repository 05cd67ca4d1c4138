//! Document store metrics collection.
//!
//! Provides functions for recording storage-related metrics.

use metrics::histogram;
use std::time::Instant;

/// Record how long a document load or save took.
pub fn record_store_duration(document: &str, operation: &str, duration_secs: f64) {
    histogram!(
        "document_store_duration_seconds",
        "document" => document.to_string(),
        "operation" => operation.to_string()
    )
    .record(duration_secs);
}

/// A helper to time document operations and record metrics.
///
/// Usage:
/// ```ignore
/// let timer = StoreTimer::new("devices.json", "load");
/// let result = store.load().await;
/// timer.record();
/// result
/// ```
pub struct StoreTimer {
    document: String,
    operation: &'static str,
    start: Instant,
}

impl StoreTimer {
    /// Create a new timer for the given document and operation.
    pub fn new(document: impl Into<String>, operation: &'static str) -> Self {
        Self {
            document: document.into(),
            operation,
            start: Instant::now(),
        }
    }

    /// Record the elapsed duration to metrics.
    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_store_duration(&self.document, self.operation, duration);
    }
}
