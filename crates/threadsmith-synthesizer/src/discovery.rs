//! Dimension discovery from deduplicated threads

use crate::error::SynthesizerError;
use crate::parser::{extract_summary, parse_dimension_response};
use crate::prompt::DiscoveryPromptBuilder;
use crate::types::DiscoveryResult;
use std::sync::Arc;
use std::time::Duration;
use threadsmith_domain::traits::LlmProvider;
use threadsmith_domain::{DimensionCategory, ThreadRecord};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Asks the model once for the dimensions behind a set of threads
pub struct DimensionDiscoverer<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    call_timeout: Duration,
    context: Option<String>,
}

impl<L> DimensionDiscoverer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a discoverer with a timeout for its single call
    pub fn new(llm_provider: L, call_timeout: Duration) -> Self {
        Self {
            llm_provider: Arc::new(llm_provider),
            call_timeout,
            context: None,
        }
    }

    /// Describe the community the threads come from
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Build the discovery prompt for `threads`
    pub fn prompt(&self, threads: &[ThreadRecord]) -> String {
        let builder = DiscoveryPromptBuilder::new(threads);
        match &self.context {
            Some(context) => builder.with_context(context).build(),
            None => builder.build(),
        }
    }

    /// Run discovery
    ///
    /// # Errors
    ///
    /// Fails when there are no threads or the generation call itself fails.
    /// A response whose JSON section cannot be parsed is not an error: the
    /// result then carries the raw response and a `parse_error`.
    pub async fn discover(&self, threads: &[ThreadRecord]) -> Result<DiscoveryResult, SynthesizerError> {
        if threads.is_empty() {
            return Err(SynthesizerError::EmptyInput("no threads to analyze".to_string()));
        }

        let prompt = self.prompt(threads);
        info!(
            "Discovering dimensions across {} threads ({} chars of prompt)",
            threads.len(),
            prompt.len()
        );

        let llm = Arc::clone(&self.llm_provider);
        let call = tokio::task::spawn_blocking(move || {
            llm.generate(&prompt)
                .map_err(|e| SynthesizerError::Llm(e.to_string()))
        });

        let raw_response = timeout(self.call_timeout, call)
            .await
            .map_err(|_| SynthesizerError::Timeout(self.call_timeout.as_millis() as u64))?
            .map_err(|e| SynthesizerError::Llm(format!("Task join error: {}", e)))??;

        debug!("Discovery response length: {} chars", raw_response.len());

        let (categories, parse_error) = match parse_dimension_response(&raw_response) {
            Ok(categories) => {
                info!("Discovered {} categories", categories.len());
                (Some(categories), None)
            }
            Err(e) => {
                warn!("Could not parse dimensions from response: {}", e);
                (None, Some(e.to_string()))
            }
        };

        let unverified_examples = categories
            .as_deref()
            .map(|categories| unverified_examples(categories, threads))
            .unwrap_or_default();
        if !unverified_examples.is_empty() {
            warn!(
                "{} example(s) do not appear verbatim in any thread",
                unverified_examples.len()
            );
        }

        Ok(DiscoveryResult {
            summary: extract_summary(&raw_response),
            raw_response,
            categories,
            parse_error,
            unverified_examples,
            threads_analyzed: threads.len(),
        })
    }
}

/// Examples that are not a substring of any thread body
pub fn unverified_examples(categories: &[DimensionCategory], threads: &[ThreadRecord]) -> Vec<String> {
    categories
        .iter()
        .flat_map(|c| &c.dimensions)
        .flat_map(|d| &d.examples)
        .filter(|example| !threads.iter().any(|t| t.body.contains(example.as_str())))
        .cloned()
        .collect()
}
