//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

/// Trait for text generation providers
///
/// Implemented by the infrastructure layer (threadsmith-llm). A provider is
/// constructed once during process setup and handed to whatever needs it,
/// so tests can substitute a deterministic fake.
pub trait LlmProvider {
    /// Error type for generation failures
    type Error;

    /// Generate a free-form text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate output constrained to a JSON schema (if the backend supports it)
    ///
    /// The returned text is still untrusted: callers check its shape.
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}
