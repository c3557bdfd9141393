//! Error types for the Synthesizer

use thiserror::Error;
use threadsmith_store::StoreError;

/// Errors that can occur while generating questions or discovering dimensions
#[derive(Error, Debug)]
pub enum SynthesizerError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Generation call exceeded the configured timeout
    #[error("Generation timeout after {0} ms")]
    Timeout(u64),

    /// Response parsed but does not have the expected shape
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Nothing to work on
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File input or output error
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for SynthesizerError {
    fn from(e: serde_json::Error) -> Self {
        SynthesizerError::JsonParse(e.to_string())
    }
}
