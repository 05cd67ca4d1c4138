//! HTTP route handlers.

pub mod devices;
pub mod health;
pub mod meta;
pub mod query;
pub mod status;
