//! Configuration for the Synthesizer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default audience description injected into prompts
pub const DEFAULT_AUDIENCE: &str = "Members of an online discussion forum who post questions to their peers.";

/// Configuration for the Synthesizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    /// Maximum time for a single generation call (milliseconds)
    pub call_timeout_ms: u64,

    /// Generation calls allowed in flight at once (1 = sequential)
    pub max_concurrency: usize,

    /// Questions produced by category cycling when no count is given
    pub default_target_count: usize,

    /// Prefix for each example line in rendered prompts
    pub example_marker: String,

    /// Who the generated questions should sound like
    pub audience: String,
}

impl SynthesizerConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Whether calls run one at a time
    pub fn is_sequential(&self) -> bool {
        self.max_concurrency <= 1
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.call_timeout_ms == 0 {
            return Err("call_timeout_ms must be greater than 0".to_string());
        }
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }
        if self.default_target_count == 0 {
            return Err("default_target_count must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for SynthesizerConfig {
    /// One call in flight at a time
    fn default() -> Self {
        Self::sequential()
    }
}

impl SynthesizerConfig {
    /// Sequential preset: one outstanding call, combinations in order
    pub fn sequential() -> Self {
        Self {
            call_timeout_ms: 120_000,
            max_concurrency: 1,
            default_target_count: 50,
            example_marker: "- ".to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }

    /// Parallel preset: bounded concurrency for providers that allow it
    pub fn parallel() -> Self {
        Self {
            max_concurrency: 4,
            ..Self::sequential()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
