//! Command implementations.

pub mod cycle;
pub mod dedup;
pub mod discover;
pub mod flatten;
pub mod generate;
pub mod profile;

pub use self::cycle::{execute_cycle, preview_cycle};
pub use self::dedup::execute_dedup;
pub use self::discover::execute_discover;
pub use self::flatten::execute_flatten;
pub use self::generate::{execute_generate, preview_generate};
pub use self::profile::execute_profile;

use crate::config::Config;
use crate::error::Result;
use std::path::Path;
use threadsmith_domain::Combination;
use threadsmith_store::read_text;
use threadsmith_synthesizer::{PromptTemplate, SynthesizerConfig};

/// Load a template file, or fall back to a built-in one.
pub(crate) fn load_template(path: Option<&Path>, fallback: PromptTemplate) -> Result<PromptTemplate> {
    match path {
        Some(path) => Ok(PromptTemplate::new(read_text(path)?)),
        None => Ok(fallback),
    }
}

/// Synthesizer settings with a command-line concurrency override applied.
pub(crate) fn synthesizer_config(config: &Config, concurrency: Option<usize>) -> SynthesizerConfig {
    let mut synthesizer = config.synthesizer.clone();
    if let Some(concurrency) = concurrency {
        synthesizer.max_concurrency = concurrency;
    }
    synthesizer
}

/// Render every prompt without calling the model.
pub(crate) fn render_all(
    template: &PromptTemplate,
    combinations: &[Combination],
    config: &SynthesizerConfig,
) -> Vec<String> {
    combinations
        .iter()
        .map(|c| template.render(c, &config.audience, &config.example_marker))
        .collect()
}
