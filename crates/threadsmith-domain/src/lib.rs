//! Threadsmith Domain Layer
//!
//! This crate contains the data model and the pure algorithms of the question
//! synthesis pipeline. It has ZERO external dependencies and defines the
//! records, value objects, and trait interfaces that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Thread record**: A forum thread reduced to its title and body
//! - **Dimension**: A named axis of variation with a description and examples
//! - **Category**: An ordered group of dimensions (e.g. "Intent", "Persona")
//! - **Combination**: One dimension picked from every category
//! - **Generated question**: The generator's output for one combination
//!
//! ## Pipeline
//!
//! ```text
//! rows → dedup → (dimension discovery) → combine/cycle → synthesize → flatten
//! ```
//!
//! The deduplication, synthesis and file-format stages live in other crates;
//! this crate only owns the model, the combinator and the flattener.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod combination;
pub mod dimension;
pub mod flatten;
pub mod question;
pub mod thread;
pub mod traits;

// Re-exports for convenience
pub use combination::{
    combination_count, combine, cycle, cycle_combinations, iter_combinations, Combination, Combinations, Selection,
    CYCLED_CATEGORY_KEY,
};
pub use dimension::{category_key, column_label, Dimension, DimensionCategory, PromptCategory};
pub use flatten::{flatten, Column, FieldPath, FlatTable, MULTI_VALUE_DELIMITER};
pub use question::{GeneratedQuestion, QuestionBatch};
pub use thread::{DedupResult, RawThreadRow, ThreadRecord};
