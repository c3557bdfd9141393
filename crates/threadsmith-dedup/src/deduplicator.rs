//! Thread deduplication logic

use crate::{ContentDigest, DedupConfig};
use std::collections::HashSet;
use threadsmith_domain::{DedupResult, RawThreadRow, ThreadRecord};
use tracing::{debug, info};

/// What happened to a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// First occurrence of its body, kept
    Retained,

    /// Body already seen, dropped
    Duplicate,

    /// Missing title or body, dropped before the duplicate check
    Skipped,
}

/// The Deduplicator drops blank rows and repeated bodies
///
/// Rows can be fed one at a time with [`Deduplicator::observe`] and the
/// result collected with [`Deduplicator::finish`], or a whole sequence can
/// be processed with [`Deduplicator::deduplicate`].
#[derive(Debug, Default)]
pub struct Deduplicator {
    config: DedupConfig,
    seen: HashSet<ContentDigest>,
    result: DedupResult,
}

impl Deduplicator {
    /// Create a new Deduplicator with the given configuration
    pub fn new(config: DedupConfig) -> Self {
        Self {
            config,
            seen: HashSet::new(),
            result: DedupResult::default(),
        }
    }

    /// Create a Deduplicator with the exact (default) configuration
    pub fn default_config() -> Self {
        Self::new(DedupConfig::default())
    }

    /// Feed one row
    pub fn observe(&mut self, row: RawThreadRow) -> RowOutcome {
        let (title, body) = match (row.title, row.body) {
            (Some(title), Some(body))
                if !self.config.is_blank(&title) && !self.config.is_blank(&body) =>
            {
                (title, body)
            }
            _ => {
                self.result.skipped += 1;
                return RowOutcome::Skipped;
            }
        };

        self.result.total_seen += 1;

        let digest = ContentDigest::of(self.config.hash_input(&body));
        if !self.seen.insert(digest) {
            self.result.duplicates_removed += 1;
            debug!("Dropping duplicate body for thread '{}'", title);
            return RowOutcome::Duplicate;
        }

        self.result.records.push(ThreadRecord { title, body });
        RowOutcome::Retained
    }

    /// Finish the pass and return the accumulated result
    pub fn finish(self) -> DedupResult {
        let result = self.result;
        info!(
            "Deduplication complete: {} seen, {} duplicates removed, {} unique, {} blank rows skipped",
            result.total_seen,
            result.duplicates_removed,
            result.records.len(),
            result.skipped
        );
        result
    }

    /// Process a full sequence of rows
    pub fn deduplicate<I>(mut self, rows: I) -> DedupResult
    where
        I: IntoIterator<Item = RawThreadRow>,
    {
        for row in rows {
            self.observe(row);
        }
        self.finish()
    }
}

/// Deduplicate rows with the exact configuration
pub fn deduplicate<I>(rows: I) -> DedupResult
where
    I: IntoIterator<Item = RawThreadRow>,
{
    Deduplicator::default_config().deduplicate(rows)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn field() -> impl Strategy<Value = Option<String>> {
        // Small alphabet so duplicates and blanks actually occur
        prop::option::weighted(0.9, "[ab]{0,2}")
    }

    fn rows_strategy() -> impl Strategy<Value = Vec<RawThreadRow>> {
        prop::collection::vec((field(), field()), 0..40)
            .prop_map(|pairs| {
                pairs
                    .into_iter()
                    .map(|(title, body)| RawThreadRow { title, body })
                    .collect()
            })
    }

    proptest! {
        /// Property: seen rows are either retained or removed as duplicates
        #[test]
        fn test_accounting_invariant(rows in rows_strategy()) {
            let result = deduplicate(rows.clone());
            prop_assert!(result.is_consistent());
            prop_assert_eq!(result.total_seen + result.skipped, rows.len());
        }

        /// Property: deduplicating the output again removes nothing
        #[test]
        fn test_idempotent(rows in rows_strategy()) {
            let first = deduplicate(rows);
            let second = deduplicate(first.records.clone().into_iter().map(RawThreadRow::from));
            prop_assert_eq!(second.duplicates_removed, 0);
            prop_assert_eq!(second.records, first.records);
        }

        /// Property: blank rows never surface and retained bodies are unique
        #[test]
        fn test_no_blank_or_repeated_bodies(rows in rows_strategy()) {
            let result = deduplicate(rows);
            let mut bodies = HashSet::new();
            for record in &result.records {
                prop_assert!(!record.title.is_empty() && !record.body.is_empty());
                prop_assert!(bodies.insert(record.body.clone()));
            }
        }
    }
}
