//! Result types for synthesis and discovery

use threadsmith_domain::{DimensionCategory, QuestionBatch};

/// A combination that produced no question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    /// Index of the combination that failed
    pub index: usize,

    /// Why it failed
    pub reason: String,
}

/// Outcome of a synthesis run
#[derive(Debug, Clone, Default)]
pub struct SynthesisReport {
    /// Successfully generated questions, in combination order
    pub batch: QuestionBatch,

    /// Failed combinations, in combination order
    pub failures: Vec<GenerationFailure>,

    /// Number of combinations attempted
    pub attempted: usize,

    /// Wall-clock time of the run
    pub processing_time_ms: u64,
}

impl SynthesisReport {
    /// Number of questions generated
    pub fn generated(&self) -> usize {
        self.batch.total_generated()
    }

    /// Number of combinations that failed
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Outcome of dimension discovery
#[derive(Debug, Clone)]
pub struct DiscoveryResult {
    /// The model's full response
    pub raw_response: String,

    /// Parsed categories, when the JSON section was usable
    pub categories: Option<Vec<DimensionCategory>>,

    /// Why the JSON section could not be used
    pub parse_error: Option<String>,

    /// Examples that are not verbatim quotes from any thread
    pub unverified_examples: Vec<String>,

    /// Summary section, when present
    pub summary: Option<String>,

    /// Number of threads included in the prompt
    pub threads_analyzed: usize,
}
