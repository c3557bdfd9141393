//! Storage errors

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading or writing pipeline files
#[derive(Error, Debug)]
pub enum StoreError {
    /// An input file is missing, unreadable or has the wrong shape
    #[error("Invalid input {}: {reason}", .path.display())]
    Input {
        /// Offending file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// A destination could not be written
    #[error("Failed to write {}: {reason}", .path.display())]
    OutputWrite {
        /// Destination file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// In-memory document text is malformed
    #[error("Malformed document: {0}")]
    Parse(String),
}

impl StoreError {
    /// Build an input error for `path`
    pub fn input(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::Input {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Build an output error for `path`
    pub fn output_write(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::OutputWrite {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Attribute a parse error to the file it came from
    pub(crate) fn in_file(self, path: impl AsRef<Path>) -> Self {
        match self {
            Self::Parse(reason) => Self::input(path, reason),
            other => other,
        }
    }

    /// Whether the error is fatal input trouble
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input { .. } | Self::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path() {
        let err = StoreError::input("data/threads.csv", "missing header");
        assert_eq!(err.to_string(), "Invalid input data/threads.csv: missing header");

        let err = StoreError::output_write("out.json", "permission denied");
        assert!(err.to_string().contains("out.json"));
        assert!(!err.is_input());
    }

    #[test]
    fn test_parse_attributed_to_file() {
        let err = StoreError::Parse("expected object".into()).in_file("dims.json");
        assert!(matches!(err, StoreError::Input { .. }));
        assert!(err.is_input());
    }
}
