//! Content digests for duplicate detection

use sha2::{Digest, Sha256};
use std::fmt;

/// SHA-256 fingerprint of a text body, hex encoded
///
/// Byte-identical inputs always produce equal digests.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Compute the digest of `text`'s UTF-8 bytes
    ///
    /// # Examples
    ///
    /// ```
    /// use threadsmith_dedup::ContentDigest;
    ///
    /// assert_eq!(ContentDigest::of("body"), ContentDigest::of("body"));
    /// assert_ne!(ContentDigest::of("body"), ContentDigest::of("Body"));
    /// ```
    pub fn of(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    /// Hex representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
