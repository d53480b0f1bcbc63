//! Content hashing for snapshot change detection.

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::xxh3_128;

/// XXH3-128 digest of a file's text.
///
/// Equal hashes are taken to mean equal text, so the registry can skip the
/// character-level diff when a file is resubmitted unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(u128);

impl ContentHash {
    /// Hashes raw bytes.
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxh3_128(data))
    }

    /// Hashes UTF-8 text.
    pub fn from_text(text: &str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Lowercase hex digest, 32 characters wide.
    pub fn to_hex(self) -> String {
        format!("{:032x}", self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // first 8 hex digits are enough to tell snapshots apart in logs
        write!(f, "ContentHash({}..)", &self.to_hex()[..8])
    }
}
