//! Threadsmith Deduplicator
//!
//! Reduces a raw thread export to unique threads.
//!
//! The Deduplicator provides:
//! - Blank-row filtering (missing title or body)
//! - Exact duplicate detection by content digest of the body
//! - Order-preserving retention of first occurrences
//! - Accounting of seen, removed and skipped rows
//!
//! # Examples
//!
//! ```
//! use threadsmith_dedup::{Deduplicator, DedupConfig};
//! use threadsmith_domain::RawThreadRow;
//!
//! let rows = vec![
//!     RawThreadRow::new("T1", "B1"),
//!     RawThreadRow::new("T2", "B1"),
//!     RawThreadRow::new("", "B2"),
//! ];
//!
//! let result = Deduplicator::new(DedupConfig::default()).deduplicate(rows);
//! assert_eq!(result.records.len(), 1);
//! assert_eq!(result.duplicates_removed, 1);
//! assert_eq!(result.total_seen, 2);
//! ```

#![warn(missing_docs)]

mod config;
mod deduplicator;
mod digest;

pub use config::DedupConfig;
pub use deduplicator::{deduplicate, Deduplicator, RowOutcome};
pub use digest::ContentDigest;
