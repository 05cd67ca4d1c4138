//! Domain layer for the Sleepy backend.
//!
//! This crate contains:
//! - Domain models (StatusRecord, Device) and their input validation
//! - Domain error types

pub mod error;
pub mod models;

pub use error::DomainError;
