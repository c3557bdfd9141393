//! Thread records - the input unit of the deduplication stage

/// A raw row as read from a thread export
///
/// Either field may be missing (short CSV rows, absent columns). Rows are
/// turned into [`ThreadRecord`]s only when both fields are non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawThreadRow {
    /// Thread title, if the row carried one
    pub title: Option<String>,

    /// Thread body, if the row carried one
    pub body: Option<String>,
}

impl RawThreadRow {
    /// Create a row with both fields present
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }
}

impl From<ThreadRecord> for RawThreadRow {
    fn from(record: ThreadRecord) -> Self {
        Self {
            title: Some(record.title),
            body: Some(record.body),
        }
    }
}

/// A forum thread with a non-empty title and body
///
/// Identity for deduplication is the body alone; two threads with different
/// titles and identical bodies are duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadRecord {
    /// Thread title
    pub title: String,

    /// Thread body
    pub body: String,
}

impl ThreadRecord {
    /// Create a record, returning `None` when either field is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use threadsmith_domain::ThreadRecord;
    ///
    /// assert!(ThreadRecord::new("Title", "Body").is_some());
    /// assert!(ThreadRecord::new("", "Body").is_none());
    /// assert!(ThreadRecord::new("Title", "").is_none());
    /// ```
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Option<Self> {
        let title = title.into();
        let body = body.into();
        if title.is_empty() || body.is_empty() {
            return None;
        }
        Some(Self { title, body })
    }
}

/// Outcome of a deduplication pass
///
/// `total_seen` counts rows that entered the duplicate check, i.e. rows whose
/// title and body were both non-empty. Blank rows are tallied in `skipped`
/// and take no part in the invariant
/// `total_seen == records.len() + duplicates_removed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupResult {
    /// First occurrences, in input order
    pub records: Vec<ThreadRecord>,

    /// Rows that reached the duplicate check
    pub total_seen: usize,

    /// Rows dropped because their body was already seen
    pub duplicates_removed: usize,

    /// Rows dropped before the check for a missing title or body
    pub skipped: usize,
}

impl DedupResult {
    /// Number of unique threads retained
    pub fn unique_count(&self) -> usize {
        self.records.len()
    }

    /// Check the accounting invariant
    pub fn is_consistent(&self) -> bool {
        self.total_seen == self.records.len() + self.duplicates_removed
    }
}
