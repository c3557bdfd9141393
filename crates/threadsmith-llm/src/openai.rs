//! OpenAI-compatible chat completions provider
//!
//! Works against any server exposing `POST {base_url}/chat/completions`
//! with bearer authentication. Structured calls send the schema as a
//! `json_schema` response format.

use crate::{block_on, build_client, default_client, LlmError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use threadsmith_domain::traits::LlmProvider as LlmProviderTrait;
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default timeout for requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default number of attempts per request (no retry)
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Name given to the response schema in structured requests
const SCHEMA_NAME: &str = "response";

/// Provider for OpenAI-compatible chat completion APIs
pub struct OpenAiProvider {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider for `model` at `base_url`
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: default_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            max_retries: DEFAULT_MAX_RETRIES,
        }
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

    /// Base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate a free-form completion
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.send(prompt, None).await
    }

    /// Generate a completion constrained to `schema`
    pub async fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, LlmError> {
        let schema: serde_json::Value = serde_json::from_str(schema)
            .map_err(|e| LlmError::Other(format!("Invalid output schema: {}", e)))?;
        self.send(prompt, Some(response_format(schema))).await
    }

    async fn send(&self, prompt: &str, response_format: Option<serde_json::Value>) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            debug!("Chat completion request to {} (attempt {})", url, attempts + 1);
            let sent = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            match sent {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let parsed = response
                            .json::<ChatResponse>()
                            .await
                            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
                        return first_content(parsed);
                    }

                    match status {
                        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                            return Err(LlmError::Authentication(format!("HTTP {}", status)));
                        }
                        reqwest::StatusCode::NOT_FOUND => {
                            return Err(LlmError::ModelNotAvailable(self.model.clone()));
                        }
                        reqwest::StatusCode::TOO_MANY_REQUESTS => {
                            last_error = Some(LlmError::RateLimitExceeded);
                        }
                        _ => {
                            let error_text = response
                                .text()
                                .await
                                .unwrap_or_else(|_| "Unknown error".to_string());
                            last_error = Some(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
                        }
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Chat completion failed, retrying in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

fn response_format(schema: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "type": "json_schema",
        "json_schema": {
            "name": SCHEMA_NAME,
            "schema": schema,
            "strict": true,
        }
    })
}

fn first_content(response: ChatResponse) -> Result<String, LlmError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::InvalidResponse("Response contained no message content".to_string()))
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        block_on(OpenAiProvider::generate(self, prompt))?
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        block_on(OpenAiProvider::generate_structured(self, prompt, schema))?
    }
}
