//! Dedup command implementation.

use crate::cli::DedupArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use threadsmith_dedup::{DedupConfig, Deduplicator};
use threadsmith_domain::DedupResult;
use threadsmith_store::{read_thread_rows, write_threads};
use tracing::info;

/// Execute the dedup command.
///
/// The whole input is read before anything is written, so an unreadable
/// CSV never leaves a partial output behind.
pub fn execute_dedup(args: DedupArgs, config: &Config, formatter: &Formatter) -> Result<DedupResult> {
    let rows = read_thread_rows(&args.input)?;
    info!("Read {} rows from {}", rows.len(), args.input.display());

    let dedup_config = if args.normalize {
        DedupConfig::normalized()
    } else {
        config.dedup.clone()
    };
    let result = Deduplicator::new(dedup_config).deduplicate(rows);

    write_threads(&args.output, &result)?;

    println!("{}", formatter.dedup_summary(&result)?);
    formatter.status(formatter.success(&format!(
        "Wrote {} unique threads to {}",
        result.records.len(),
        args.output.display()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn args(dir: &Path, normalize: bool) -> DedupArgs {
        DedupArgs {
            input: dir.join("threads.csv"),
            output: dir.join("out").join("threads.json"),
            normalize,
        }
    }

    #[test]
    fn test_dedup_writes_unique_threads() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("threads.csv"),
            "thread_title,thread_body\nT1,B1\nT2,B1\n,B2\nT3,\"B3, with comma\"\n",
        )
        .unwrap();

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_dedup(args(dir.path(), false), &Config::default(), &formatter).unwrap();

        assert_eq!(result.records.len(), 2);
        assert_eq!(result.duplicates_removed, 1);
        assert_eq!(result.skipped, 1);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("out").join("threads.json")).unwrap()).unwrap();
        assert_eq!(written["threads"][1]["thread_body"], "B3, with comma");
        assert_eq!(written["metadata"]["total_unique_threads"], 2);
        assert_eq!(written["metadata"]["duplicates_removed"], 1);
    }

    #[test]
    fn test_normalize_flag() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("threads.csv"),
            "title,body\nT1,body\nT2,\"  body  \"\n\"  \",other\n",
        )
        .unwrap();

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_dedup(args(dir.path(), true), &Config::default(), &formatter).unwrap();

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.duplicates_removed, 1);
        assert_eq!(result.skipped, 1);
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempdir().unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let err = execute_dedup(args(dir.path(), false), &Config::default(), &formatter).unwrap_err();
        assert!(matches!(err, crate::CliError::Store(ref e) if e.is_input()));
        assert!(!dir.path().join("out").exists());
    }
}
