//! Threadsmith LLM Provider Layer
//!
//! Pluggable generator implementations behind a common interface.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from
//! `threadsmith-domain`. The trait is synchronous; async backends run their
//! request on a private current-thread runtime, so callers inside an async
//! context should invoke them from `tokio::task::spawn_blocking`.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama API integration
//! - `OpenAiProvider`: OpenAI-compatible chat completions API
//! - `Provider`: Runtime-selected wrapper over the above
//!
//! # Examples
//!
//! ```
//! use threadsmith_llm::MockProvider;
//! use threadsmith_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod openai;

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use threadsmith_domain::traits::LlmProvider as LlmProviderTrait;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Credentials rejected by the provider
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Run an async provider call to completion on a private runtime
pub(crate) fn block_on<F: Future>(future: F) -> Result<F::Output, LlmError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;
    Ok(runtime.block_on(future))
}

/// Build the HTTP client used by the network providers
///
/// Fails instead of handing back a client without the requested timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))
}

/// Client for the infallible constructors, which use the default timeout
pub(crate) fn default_client(timeout: Duration) -> reqwest::Client {
    build_client(timeout).unwrap_or_else(|e| {
        tracing::warn!("{}; requests will run without a timeout until one is set", e);
        reqwest::Client::new()
    })
}

/// A canned mock reply
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Replies are chosen by exact prompt first, then by the first registered
/// substring the prompt contains, then the default response.
///
/// # Examples
///
/// ```
/// use threadsmith_llm::MockProvider;
/// use threadsmith_domain::traits::LlmProvider;
///
/// // Simple fixed response
/// let provider = MockProvider::new("Fixed response");
/// assert_eq!(provider.generate("any prompt").unwrap(), "Fixed response");
///
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_response_containing("Persona", "response2");
/// assert_eq!(provider.generate("prompt1").unwrap(), "response1");
/// assert_eq!(provider.generate("... Persona ...").unwrap(), "response2");
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    rules: Arc<Mutex<Vec<(String, MockReply)>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            rules: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Sleep for `delay` before answering each call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        lock(&self.responses).insert(prompt.into(), MockReply::Error);
    }

    /// Respond with `response` to any prompt containing `needle`
    pub fn add_response_containing(&mut self, needle: impl Into<String>, response: impl Into<String>) {
        lock(&self.rules).push((needle.into(), MockReply::Text(response.into())));
    }

    /// Fail any prompt containing `needle`
    pub fn add_error_containing(&mut self, needle: impl Into<String>) {
        lock(&self.rules).push((needle.into(), MockReply::Error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        lock(&self.prompts).clear();
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        if let Some(reply) = lock(&self.responses).get(prompt) {
            return reply.clone();
        }
        lock(&self.rules)
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| MockReply::Text(self.default_response.clone()))
    }
}

/// Lock a mutex, recovering the data if a panicking test poisoned it
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        lock(&self.prompts).push(prompt.to_string());

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        match self.reply_for(prompt) {
            MockReply::Text(text) => Ok(text),
            MockReply::Error => Err(LlmError::Other("Mock error".to_string())),
        }
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        // The mock does not enforce the schema; callers validate the shape
        self.generate(prompt)
    }
}

/// A provider chosen at runtime from configuration
#[derive(Debug)]
pub enum Provider {
    /// Deterministic mock
    Mock(MockProvider),
    /// Local Ollama instance
    Ollama(OllamaProvider),
    /// OpenAI-compatible endpoint
    OpenAi(OpenAiProvider),
}

impl Provider {
    /// Model identifier used for logging and metadata
    pub fn model_name(&self) -> &str {
        match self {
            Provider::Mock(_) => "mock",
            Provider::Ollama(p) => p.model(),
            Provider::OpenAi(p) => p.model(),
        }
    }
}

impl LlmProviderTrait for Provider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        match self {
            Provider::Mock(p) => p.generate(prompt),
            Provider::Ollama(p) => LlmProviderTrait::generate(p, prompt),
            Provider::OpenAi(p) => LlmProviderTrait::generate(p, prompt),
        }
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        match self {
            Provider::Mock(p) => p.generate_structured(prompt, schema),
            Provider::Ollama(p) => LlmProviderTrait::generate_structured(p, prompt, schema),
            Provider::OpenAi(p) => LlmProviderTrait::generate_structured(p, prompt, schema),
        }
    }
}
