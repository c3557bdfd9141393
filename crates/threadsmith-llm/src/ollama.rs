//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API.
//!
//! # Features
//!
//! - Async HTTP communication with Ollama API
//! - Configurable endpoint, model and request timeout
//! - Schema-constrained output through the `format` request field
//! - Optional retries with exponential backoff
//!
//! # Examples
//!
//! ```no_run
//! use threadsmith_llm::OllamaProvider;
//!
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.1");
//!
//! // The inherent methods are async; the LlmProvider trait offers a blocking wrapper
//! ```

use crate::{block_on, build_client, default_client, LlmError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use threadsmith_domain::traits::LlmProvider as LlmProviderTrait;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per request (no retry)
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Ollama API provider for local LLM inference
#[derive(Debug)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<serde_json::Value>,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.1", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client: default_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a new Ollama provider against `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the per-request timeout
    ///
    /// # Errors
    ///
    /// `LlmError::Other` if the HTTP client cannot be built with this timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Set the maximum number of attempts (at least one)
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Endpoint base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generate text using Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - Network communication fails
    /// - Response format is invalid
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.send(prompt, None).await
    }

    /// Generate output constrained to a JSON schema
    ///
    /// `schema` must itself be valid JSON; it is passed as Ollama's `format`.
    pub async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, LlmError> {
        let format: serde_json::Value = serde_json::from_str(schema)
            .map_err(|e| LlmError::Other(format!("Invalid output schema: {}", e)))?;
        self.send(prompt, Some(format)).await
    }

    async fn send(&self, prompt: &str, format: Option<serde_json::Value>) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            debug!("Ollama request to {} (attempt {})", url, attempts + 1);
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        return response
                            .json::<OllamaGenerateResponse>()
                            .await
                            .map(|r| r.response)
                            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)));
                    } else if response.status() == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let status = response.status();
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Ollama request failed, retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        block_on(OllamaProvider::generate(self, prompt))?
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        block_on(OllamaProvider::generate_structured(self, prompt, schema))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_provider_creation() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llama3.1");
        assert_eq!(provider.endpoint(), "http://localhost:11434");
        assert_eq!(provider.model(), "llama3.1");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_ollama_provider_default_endpoint() {
        let provider = OllamaProvider::default_endpoint("mistral");
        assert_eq!(provider.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), "mistral");
    }

    #[test]
    fn test_ollama_provider_with_max_retries() {
        let provider = OllamaProvider::new(DEFAULT_ENDPOINT, "llama3.1").with_max_retries(5);
        assert_eq!(provider.max_retries, 5);

        let provider = OllamaProvider::new(DEFAULT_ENDPOINT, "llama3.1").with_max_retries(0);
        assert_eq!(provider.max_retries, 1);
    }

    #[test]
    fn test_request_serialization() {
        let plain = OllamaGenerateRequest {
            model: "m",
            prompt: "p",
            stream: false,
            format: None,
        };
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("format").is_none());
        assert_eq!(json["stream"], false);

        let structured = OllamaGenerateRequest {
            model: "m",
            prompt: "p",
            stream: false,
            format: Some(serde_json::json!({"type": "object"})),
        };
        let json = serde_json::to_value(&structured).unwrap();
        assert_eq!(json["format"]["type"], "object");
    }

    #[tokio::test]
    async fn test_invalid_schema_rejected() {
        let provider = OllamaProvider::default_endpoint("llama3.1");
        let result = provider.generate_structured("prompt", "not json").await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    // Integration tests (requires running Ollama)
    #[tokio::test]
    #[ignore] // Only run when Ollama is available
    async fn test_ollama_generate_integration() {
        let provider = OllamaProvider::default_endpoint("llama3.1");
        let result = provider.generate("Say 'hello' and nothing else").await;

        if let Ok(response) = result {
            assert!(!response.is_empty());
        }
    }

    #[tokio::test]
    async fn test_timeout_applies_to_requests() {
        // Accepts the connection but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _silent = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let provider = OllamaProvider::new(format!("http://{}", addr), "llama3.1")
            .with_timeout(Duration::from_millis(100))
            .unwrap();

        let started = std::time::Instant::now();
        let result = provider.generate("test").await;

        assert!(matches!(result, Err(LlmError::Communication(_))));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_ollama_error_handling() {
        // Use invalid endpoint to trigger error
        let provider = OllamaProvider::new("http://localhost:99999", "llama3.1").with_max_retries(1);

        let result = provider.generate("test").await;

        match result {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }
}
