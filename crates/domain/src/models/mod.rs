//! Domain models for Sleepy.

pub mod device;
pub mod status;

pub use device::Device;
pub use status::StatusRecord;
