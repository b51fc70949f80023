//! Digest Module
//!
//! Maps arbitrary cache keys to fixed-length file names.

use sha2::{Digest, Sha256};

/// Length of a digest in hex characters.
pub const DIGEST_LEN: usize = 64;

/// Computes the lowercase hex SHA-256 digest of a cache key.
///
/// Defined for every string, including the empty one.
pub fn digest(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}
