//! Deduplicator configuration

use serde::{Deserialize, Serialize};

/// Configuration for blank detection and body identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Treat whitespace-only titles and bodies as blank
    #[serde(default)]
    pub blank_whitespace_fields: bool,

    /// Trim surrounding whitespace from the body before hashing
    #[serde(default)]
    pub trim_before_hashing: bool,
}

impl DedupConfig {
    /// Exact configuration: only empty fields are blank, bodies hash byte for byte
    pub fn exact() -> Self {
        Self::default()
    }

    /// Normalized configuration: whitespace-only fields are blank and
    /// surrounding whitespace does not distinguish bodies
    pub fn normalized() -> Self {
        Self {
            blank_whitespace_fields: true,
            trim_before_hashing: true,
        }
    }

    /// Whether a field counts as blank under this configuration
    pub fn is_blank(&self, field: &str) -> bool {
        if self.blank_whitespace_fields {
            field.trim().is_empty()
        } else {
            field.is_empty()
        }
    }

    /// The slice of a body that is hashed
    pub fn hash_input<'a>(&self, body: &'a str) -> &'a str {
        if self.trim_before_hashing {
            body.trim()
        } else {
            body
        }
    }
}
