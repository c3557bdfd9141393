//! Threadsmith Synthesizer
//!
//! Generates forum questions from dimension combinations using an LLM, and
//! discovers those dimensions from deduplicated threads in the first place.
//!
//! # Architecture
//!
//! ```text
//! Threads → DimensionDiscoverer → LLM → Dimensions
//! Dimensions → combine / cycle → Synthesizer → LLM → QuestionBatch
//! ```
//!
//! # Key Features
//!
//! - **One call per combination**: no retries, failures are recorded and skipped
//! - **Schema-checked output**: every response must be `{"question": "..."}`
//! - **Per-call timeout**: a hung provider becomes a failure, not a hang
//! - **Bounded parallelism**: optional, with deterministic output order
//!
//! # Example Usage
//!
//! ```no_run
//! use threadsmith_synthesizer::{PromptTemplate, Synthesizer, SynthesizerConfig};
//! use threadsmith_domain::{combine, Dimension, DimensionCategory};
//! use threadsmith_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"question": "How do I get started?"}"#);
//! let synthesizer = Synthesizer::new(llm, PromptTemplate::combination_default(), SynthesizerConfig::default())?;
//!
//! let categories = vec![
//!     DimensionCategory::new("Intent", vec![Dimension::new("Setup", "Getting going", vec![])]),
//! ];
//! let report = synthesizer.synthesize_all(combine(&categories)).await;
//!
//! println!("Generated: {}", report.generated());
//! println!("Failed: {}", report.failed());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod discovery;
mod error;
mod parser;
mod prompt;
mod synthesizer;
mod types;

#[cfg(test)]
mod tests;

pub use config::{SynthesizerConfig, DEFAULT_AUDIENCE};
pub use discovery::{unverified_examples, DimensionDiscoverer};
pub use error::SynthesizerError;
pub use parser::{extract_json, extract_summary, parse_dimension_response, parse_question_response, QUESTION_SCHEMA};
pub use prompt::{DiscoveryPromptBuilder, PromptTemplate};
pub use synthesizer::Synthesizer;
pub use types::{DiscoveryResult, GenerationFailure, SynthesisReport};
