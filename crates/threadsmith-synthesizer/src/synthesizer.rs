//! Core Synthesizer implementation

use crate::config::SynthesizerConfig;
use crate::error::SynthesizerError;
use crate::parser::{parse_question_response, QUESTION_SCHEMA};
use crate::prompt::PromptTemplate;
use crate::types::{GenerationFailure, SynthesisReport};
use std::sync::Arc;
use std::time::{Duration, Instant};
use threadsmith_domain::traits::LlmProvider;
use threadsmith_domain::{Combination, GeneratedQuestion};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;
use tracing::{debug, info, warn};

type Outcome = (usize, Combination, Result<String, SynthesizerError>);

/// The Synthesizer turns combinations into generated questions
///
/// Each combination gets exactly one structured generation call. Failures
/// are recorded in the report and never stop the run.
pub struct Synthesizer<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    template: PromptTemplate,
    config: SynthesizerConfig,
    /// One permit per provider call allowed in flight
    limiter: Arc<Semaphore>,
}

impl<L> Synthesizer<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new Synthesizer
    ///
    /// # Errors
    ///
    /// `SynthesizerError::Config` if the configuration does not validate.
    pub fn new(llm_provider: L, template: PromptTemplate, config: SynthesizerConfig) -> Result<Self, SynthesizerError> {
        config.validate().map_err(SynthesizerError::Config)?;
        let limiter = Arc::new(Semaphore::new(config.max_concurrency));
        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            template,
            config,
            limiter,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &SynthesizerConfig {
        &self.config
    }

    /// Render the prompt for one combination
    pub fn render(&self, combination: &Combination) -> String {
        self.template
            .render(combination, &self.config.audience, &self.config.example_marker)
    }

    /// Generate the question text for one combination
    pub async fn generate_question(&self, combination: &Combination) -> Result<String, SynthesizerError> {
        let prompt = self.render(combination);
        debug!("Prompt length: {} chars", prompt.len());
        let permit = acquire(&self.limiter).await?;
        request_question(Arc::clone(&self.llm_provider), prompt, self.config.call_timeout(), permit).await
    }

    /// Generate a question for one combination, or `None` if the call failed
    pub async fn synthesize(&self, combination: Combination) -> Option<GeneratedQuestion> {
        match self.generate_question(&combination).await {
            Ok(question) => Some(GeneratedQuestion::from_combination(question, combination)),
            Err(e) => {
                warn!("Failed to generate question {}: {}", combination.index + 1, e);
                None
            }
        }
    }

    /// Generate one question per combination
    ///
    /// The batch lists questions in the order the combinations were given,
    /// whether the calls ran sequentially or in parallel.
    pub async fn synthesize_all(&self, combinations: Vec<Combination>) -> SynthesisReport {
        let start_time = Instant::now();
        let attempted = combinations.len();

        info!(
            "Generating {} questions ({} call(s) in flight)",
            attempted, self.config.max_concurrency
        );

        let mut outcomes = if self.config.is_sequential() {
            self.run_sequential(combinations).await
        } else {
            self.run_parallel(combinations).await
        };
        outcomes.sort_by_key(|(position, _, _)| *position);

        let mut report = SynthesisReport {
            attempted,
            ..SynthesisReport::default()
        };

        for (_, combination, outcome) in outcomes {
            match outcome {
                Ok(question) => report
                    .batch
                    .push(GeneratedQuestion::from_combination(question, combination)),
                Err(e) => {
                    warn!("Failed to generate question {}: {}", combination.index + 1, e);
                    report.failures.push(GenerationFailure {
                        index: combination.index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        report.processing_time_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Synthesis complete: {} generated, {} failed, {} attempted",
            report.generated(),
            report.failed(),
            report.attempted
        );
        report
    }

    async fn run_sequential(&self, combinations: Vec<Combination>) -> Vec<Outcome> {
        let total = combinations.len();
        let mut outcomes = Vec::with_capacity(total);

        for (position, combination) in combinations.into_iter().enumerate() {
            info!(
                "Generating question {}/{} ({})",
                position + 1,
                total,
                combination.dimension_names().join(", ")
            );
            let outcome = self.generate_question(&combination).await;
            outcomes.push((position, combination, outcome));
        }
        outcomes
    }

    async fn run_parallel(&self, combinations: Vec<Combination>) -> Vec<Outcome> {
        let total = combinations.len();
        let mut handles = Vec::with_capacity(total);

        for (position, combination) in combinations.into_iter().enumerate() {
            let prompt = self.render(&combination);
            let llm = Arc::clone(&self.llm_provider);
            let limiter = Arc::clone(&self.limiter);
            let limit = self.config.call_timeout();

            let handle = tokio::spawn(async move {
                let permit = acquire(&limiter).await?;
                info!("Generating question {}/{}", position + 1, total);
                request_question(llm, prompt, limit, permit).await
            });
            handles.push((position, combination, handle));
        }

        let mut outcomes = Vec::with_capacity(total);
        for (position, combination, handle) in handles {
            let outcome = handle
                .await
                .unwrap_or_else(|e| Err(SynthesizerError::Llm(format!("Task join error: {}", e))));
            outcomes.push((position, combination, outcome));
        }
        outcomes
    }
}

async fn acquire(limiter: &Arc<Semaphore>) -> Result<OwnedSemaphorePermit, SynthesizerError> {
    Arc::clone(limiter)
        .acquire_owned()
        .await
        .map_err(|e| SynthesizerError::Llm(format!("Failed to acquire permit: {}", e)))
}

/// Make one structured call and check the response shape
///
/// The provider is synchronous, so the call runs on the blocking pool. On
/// timeout the caller stops waiting, but the permit stays with the blocking
/// call and is only released once the provider returns.
async fn request_question<L>(
    llm: Arc<L>,
    prompt: String,
    limit: Duration,
    permit: OwnedSemaphorePermit,
) -> Result<String, SynthesizerError>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let call = tokio::task::spawn_blocking(move || {
        let response = llm
            .generate_structured(&prompt, QUESTION_SCHEMA)
            .map_err(|e| SynthesizerError::Llm(e.to_string()));
        drop(permit);
        response
    });

    let response = timeout(limit, call)
        .await
        .map_err(|_| SynthesizerError::Timeout(limit.as_millis() as u64))?
        .map_err(|e| SynthesizerError::Llm(format!("Task join error: {}", e)))??;

    debug!("LLM response length: {} chars", response.len());
    parse_question_response(&response)
}
