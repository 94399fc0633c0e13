//! Content-addressed cache keys.
//!
//! The cache is keyed by the combination of target size and a SHA-256 digest
//! of the normalized source bytes, not by where the bytes came from. Two
//! sources with identical bytes and identical target size always produce the
//! identical key, whether they arrived as a file path, a URL, or an in-memory
//! buffer. Renaming or moving a source file therefore never invalidates the
//! cache — only actual content or target-size changes do.

use sha2::{Digest, Sha256};
use std::fmt;

/// Composite cache key: `"{target_size}_{sha256_hex}"`.
///
/// The transparent-placeholder variant is keyed by size alone
/// (`"{size}_empty"`) since its content is deterministic from the size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey(String);

impl ContentKey {
    /// Key for a resize of `bytes` to `target_size`.
    pub fn new(target_size: u32, bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(format!("{target_size}_{digest:x}"))
    }

    /// Key for the transparent placeholder of a given size.
    pub fn transparent(size: u32) -> Self {
        Self(format!("{size}_empty"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
