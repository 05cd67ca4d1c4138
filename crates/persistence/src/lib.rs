//! Persistence layer for the Sleepy backend.
//!
//! This crate contains:
//! - Whole-document storage (JSON files, in-memory)
//! - Seeding of missing documents
//! - Repository implementations for the status record and device collection

pub mod documents;
pub mod metrics;
pub mod repositories;
pub mod store;

pub use documents::{DocumentPaths, Documents};
pub use store::{DocumentStore, JsonFileStore, MemoryStore, StoreError};
