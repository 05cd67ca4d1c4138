//! Cryptographic helpers for shared-secret authentication.

use sha2::{Digest, Sha256};

/// Number of hex characters kept in a secret fingerprint.
const FINGERPRINT_LEN: usize = 8;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Short, non-reversible identifier for a secret, safe to write to logs.
pub fn secret_fingerprint(secret: &str) -> String {
    let mut hash = sha256_hex(secret);
    hash.truncate(FINGERPRINT_LEN);
    hash
}

/// Compares two secrets for exact equality without short-circuiting on the
/// first differing byte.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    let a = provided.as_bytes();
    let b = expected.as_bytes();
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
