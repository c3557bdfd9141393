//! Threadsmith Storage Layer
//!
//! File formats for every stage of the pipeline.
//!
//! # Formats
//!
//! - Thread CSV export (input to deduplication)
//! - Intermediate threads JSON (`{"threads": [...], "metadata": {...}}`)
//! - Dimension JSON and prompt-category JSON (ordered categories)
//! - Question JSON in combination or category-cycling layout
//! - Flattened CSV tables
//!
//! Readers fail with [`StoreError::Input`] and writers with
//! [`StoreError::OutputWrite`]; both are fatal to a run.
//!
//! # Examples
//!
//! ```no_run
//! use threadsmith_store::{read_thread_rows, write_threads};
//! use threadsmith_dedup::deduplicate;
//!
//! let rows = read_thread_rows("threads.csv").unwrap();
//! let result = deduplicate(rows);
//! write_threads("threads.json", &result).unwrap();
//! ```

#![warn(missing_docs)]

pub mod dimensions;
pub mod error;
pub mod files;
pub mod questions;
pub mod table;
pub mod threads;

pub use dimensions::{
    apply_key_aliases, parse_dimension_categories, parse_prompt_categories, read_dimensions,
    read_prompt_categories, write_dimensions,
};
pub use error::StoreError;
pub use files::{read_json, read_text, write_json, write_text};
pub use questions::{parse_questions, questions_document, read_questions, write_questions, QuestionLayout};
pub use table::{write_csv, write_table};
pub use threads::{parse_thread_rows, read_thread_rows, read_threads, write_threads};
