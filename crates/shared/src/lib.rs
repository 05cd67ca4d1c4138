//! Shared utilities and common types for the Sleepy backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Secret fingerprinting and comparison
//! - Unique ID generation for devices
//! - Local timestamp formatting
//! - Common validation logic for query-string inputs

pub mod crypto;
pub mod id;
pub mod time;
pub mod validation;
