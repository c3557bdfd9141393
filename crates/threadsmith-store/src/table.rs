//! CSV export of flattened tables

use crate::StoreError;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use threadsmith_domain::FlatTable;

/// Write a table to any destination, header row first
///
/// Cells containing the delimiter, quotes or newlines are quoted.
pub fn write_table<W: Write>(destination: W, table: &FlatTable) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(destination);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a table to a CSV file
pub fn write_csv(path: impl AsRef<Path>, table: &FlatTable) -> Result<(), StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::output_write(path, e))?;
    }
    let file = File::create(path).map_err(|e| StoreError::output_write(path, e))?;
    write_table(file, table).map_err(|e| StoreError::output_write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoting() {
        let table = FlatTable {
            headers: vec!["question".into(), "examples".into()],
            rows: vec![vec!["Why, though?".into(), "line one\nline two | b".into()]],
        };
        let mut out = Vec::new();
        write_table(&mut out, &table).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "question,examples\n\"Why, though?\",\"line one\nline two | b\"\n");
    }

    #[test]
    fn test_empty_table_has_header() {
        let table = FlatTable {
            headers: vec!["Question".into(), "Intent_Dimension".into()],
            rows: vec![],
        };
        let mut out = Vec::new();
        write_table(&mut out, &table).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Question,Intent_Dimension\n");
    }
}
