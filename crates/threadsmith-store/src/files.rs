//! Whole-file JSON and text helpers

use crate::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Read a file to a string
pub fn read_text(path: impl AsRef<Path>) -> Result<String, StoreError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| StoreError::input(path, e))
}

/// Write `contents` to `path`, creating parent directories as needed
pub fn write_text(path: impl AsRef<Path>, contents: &str) -> Result<(), StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::output_write(path, e))?;
    }
    fs::write(path, contents).map_err(|e| StoreError::output_write(path, e))
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, StoreError> {
    let path = path.as_ref();
    let text = read_text(path)?;
    serde_json::from_str(&text).map_err(|e| StoreError::input(path, e))
}

/// Serialize `value` as pretty-printed JSON (two-space indent, non-ASCII kept as is)
pub fn write_json<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<(), StoreError> {
    let path = path.as_ref();
    let mut text = serde_json::to_string_pretty(value).map_err(|e| StoreError::output_write(path, e))?;
    text.push('\n');
    write_text(path, &text)
}
