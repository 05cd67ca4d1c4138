//! Unique ID generation for registered devices.
//!
//! The device registry never checks new IDs against existing ones, so the
//! generator's collision resistance is the only uniqueness guarantee.

use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;
use uuid::{Uuid, Variant};

/// Default length of short alphanumeric IDs.
pub const DEFAULT_SHORT_ID_LENGTH: usize = 8;

/// Produces opaque identifiers for new devices.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier.
    fn new_id(&self) -> String;
}

/// Selects which generator a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdFormat {
    /// RFC 4122 version 4 UUIDs.
    #[default]
    Uuid,
    /// Random alphanumeric strings.
    Short,
}

/// Random (version 4) UUID generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Random alphanumeric ID generator (`[0-9a-zA-Z]{length}`).
#[derive(Debug, Clone, Copy)]
pub struct ShortIdGenerator {
    length: usize,
}

impl ShortIdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for ShortIdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SHORT_ID_LENGTH)
    }
}

impl IdGenerator for ShortIdGenerator {
    fn new_id(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}

/// Builds the generator for the given format.
pub fn generator_for(format: IdFormat, short_length: usize) -> Box<dyn IdGenerator> {
    match format {
        IdFormat::Uuid => Box::new(UuidGenerator),
        IdFormat::Short => Box::new(ShortIdGenerator::new(short_length)),
    }
}

/// Checks that a string is a hyphenated RFC 4122 UUID (versions 1 to 5).
pub fn is_valid_uuid(value: &str) -> bool {
    if value.len() != 36 {
        return false;
    }
    match Uuid::try_parse(value) {
        Ok(uuid) => {
            (1..=5).contains(&uuid.get_version_num()) && uuid.get_variant() == Variant::RFC4122
        }
        Err(_) => false,
    }
}
