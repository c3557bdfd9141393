//! Thread exports: raw CSV in, deduplicated JSON out

use crate::files::{read_json, write_json};
use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use threadsmith_domain::{DedupResult, RawThreadRow, ThreadRecord};
use tracing::debug;

/// Accepted headers for the title column, in preference order
pub const TITLE_HEADERS: &[&str] = &["thread_title", "title"];

/// Accepted headers for the body column, in preference order
pub const BODY_HEADERS: &[&str] = &["thread_body", "body"];

/// Read raw rows from a CSV thread export
///
/// # Errors
///
/// `StoreError::Input` when the file cannot be opened, is not valid CSV, or
/// lacks a title or body header.
pub fn read_thread_rows(path: impl AsRef<Path>) -> Result<Vec<RawThreadRow>, StoreError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StoreError::input(path, e))?;
    let rows = parse_thread_rows(file).map_err(|e| e.in_file(path))?;
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse raw rows from any CSV source
///
/// Rows shorter than the header yield `None` for the missing cells.
pub fn parse_thread_rows<R: Read>(source: R) -> Result<Vec<RawThreadRow>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| StoreError::Parse(format!("unreadable header row: {}", e)))?
        .clone();

    let title_idx = find_column(&headers, TITLE_HEADERS)?;
    let body_idx = find_column(&headers, BODY_HEADERS)?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| StoreError::Parse(format!("row {}: {}", line + 1, e)))?;
        rows.push(RawThreadRow {
            title: record.get(title_idx).map(str::to_string),
            body: record.get(body_idx).map(str::to_string),
        });
    }
    Ok(rows)
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Result<usize, StoreError> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
        .collect();

    candidates
        .iter()
        .find_map(|candidate| normalized.iter().position(|h| h == candidate))
        .ok_or_else(|| StoreError::Parse(format!("missing column, expected one of: {}", candidates.join(", "))))
}

/// One thread in the intermediate JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThreadEntry {
    thread_title: String,
    thread_body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThreadsMetadata {
    total_unique_threads: usize,
    duplicates_removed: usize,
}

/// The intermediate deduplicated threads document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ThreadsDocument {
    threads: Vec<ThreadEntry>,
    metadata: ThreadsMetadata,
}

impl From<&DedupResult> for ThreadsDocument {
    fn from(result: &DedupResult) -> Self {
        Self {
            threads: result
                .records
                .iter()
                .map(|r| ThreadEntry {
                    thread_title: r.title.clone(),
                    thread_body: r.body.clone(),
                })
                .collect(),
            metadata: ThreadsMetadata {
                total_unique_threads: result.records.len(),
                duplicates_removed: result.duplicates_removed,
            },
        }
    }
}

/// Write a deduplication result as the intermediate threads JSON
pub fn write_threads(path: impl AsRef<Path>, result: &DedupResult) -> Result<(), StoreError> {
    write_json(path, &ThreadsDocument::from(result))
}

/// Read the threads back from the intermediate JSON
///
/// # Errors
///
/// `StoreError::Input` when the document is malformed or a thread has an
/// empty title or body.
pub fn read_threads(path: impl AsRef<Path>) -> Result<Vec<ThreadRecord>, StoreError> {
    let path = path.as_ref();
    let document: ThreadsDocument = read_json(path)?;

    document
        .threads
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            ThreadRecord::new(entry.thread_title, entry.thread_body)
                .ok_or_else(|| StoreError::input(path, format!("thread {} has an empty title or body", i + 1)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefers_thread_columns() {
        let csv = "id,title,thread_title,thread_body\n1,ignored,T1,B1\n";
        let rows = parse_thread_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows, vec![RawThreadRow::new("T1", "B1")]);
    }

    #[test]
    fn test_parse_plain_columns() {
        let csv = "Title,Body\nT1,\"multi\nline, body\"\n";
        let rows = parse_thread_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].body.as_deref(), Some("multi\nline, body"));
    }

    #[test]
    fn test_short_rows_have_missing_cells() {
        let csv = "thread_title,thread_body\nonly title\n";
        let rows = parse_thread_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].title.as_deref(), Some("only title"));
        assert_eq!(rows[0].body, None);
    }

    #[test]
    fn test_missing_body_header() {
        let csv = "thread_title,content\nT,B\n";
        let err = parse_thread_rows(csv.as_bytes()).unwrap_err();
        assert!(err.is_input());
        assert!(err.to_string().contains("thread_body"));
    }

    #[test]
    fn test_document_shape() {
        let result = DedupResult {
            records: vec![ThreadRecord::new("T1", "B1").unwrap()],
            total_seen: 2,
            duplicates_removed: 1,
            skipped: 0,
        };
        let value = serde_json::to_value(ThreadsDocument::from(&result)).unwrap();
        assert_eq!(value["threads"][0]["thread_title"], "T1");
        assert_eq!(value["threads"][0]["thread_body"], "B1");
        assert_eq!(value["metadata"]["total_unique_threads"], 1);
        assert_eq!(value["metadata"]["duplicates_removed"], 1);
    }
}
