//! Discover command implementation.

use crate::cli::DiscoverArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use threadsmith_domain::traits::LlmProvider;
use threadsmith_store::{apply_key_aliases, read_threads, write_dimensions, write_text};
use threadsmith_synthesizer::{DimensionDiscoverer, DiscoveryResult};
use tracing::info;

/// Execute the discover command.
///
/// The raw response is always saved. The dimension file is written only
/// when the response contained a usable JSON section.
pub async fn execute_discover<L>(
    args: DiscoverArgs,
    config: &Config,
    llm: L,
    formatter: &Formatter,
) -> Result<DiscoveryResult>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let mut threads = read_threads(&args.input)?;
    if let Some(limit) = args.limit {
        threads.truncate(limit);
    }
    info!("Loaded {} threads from {}", threads.len(), args.input.display());

    let mut discoverer = DimensionDiscoverer::new(llm, config.synthesizer.call_timeout());
    if let Some(context) = &args.context {
        discoverer = discoverer.with_context(context.clone());
    }

    let mut result = discoverer.discover(&threads).await?;

    let raw_path = args.raw.clone().unwrap_or_else(|| args.output.with_extension("md"));
    write_text(&raw_path, &result.raw_response)?;
    formatter.status(formatter.info(&format!("Saved raw response to {}", raw_path.display())));

    match result.categories.as_mut() {
        Some(categories) => {
            apply_key_aliases(categories, &config.categories);
            write_dimensions(&args.output, categories)?;
            println!("{}", formatter.discovery_summary(&result)?);
            formatter.status(formatter.success(&format!(
                "Wrote {} categories to {}",
                categories_len(&result),
                args.output.display()
            )));
        }
        None => {
            println!("{}", formatter.discovery_summary(&result)?);
            eprintln!(
                "{}",
                formatter.warning(&format!(
                    "No dimension file written: {}",
                    result.parse_error.as_deref().unwrap_or("no JSON section in response")
                ))
            );
        }
    }

    if !result.unverified_examples.is_empty() {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "{} example(s) are not verbatim quotes from the threads",
                result.unverified_examples.len()
            ))
        );
    }

    Ok(result)
}

fn categories_len(result: &DiscoveryResult) -> usize {
    result.categories.as_ref().map_or(0, Vec::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::path::Path;
    use tempfile::tempdir;
    use threadsmith_domain::{DedupResult, ThreadRecord};
    use threadsmith_llm::MockProvider;
    use threadsmith_store::{read_dimensions, write_threads};

    const RESPONSE: &str = r#"Here is what I found.

```json
{
  "Intent & Task Type": [
    {"dimension": "Troubleshooting", "description": "Fixing a fault", "examples": ["my sink leaks"]}
  ],
  "Domain": [
    {"dimension": "Plumbing", "description": "Pipes and drains", "examples": ["sink"]}
  ]
}
```

<summary>Two categories.</summary>"#;

    fn write_input(dir: &Path) {
        let result = DedupResult {
            records: vec![
                ThreadRecord::new("Leak", "Help, my sink leaks every night").unwrap(),
                ThreadRecord::new("Paint", "Which primer for bathroom walls?").unwrap(),
            ],
            total_seen: 2,
            duplicates_removed: 0,
            skipped: 0,
        };
        write_threads(dir.join("threads.json"), &result).unwrap();
    }

    fn args(dir: &Path) -> DiscoverArgs {
        DiscoverArgs {
            input: dir.join("threads.json"),
            output: dir.join("dimensions.json"),
            raw: None,
            context: Some("A home improvement forum.".into()),
            limit: None,
        }
    }

    #[tokio::test]
    async fn test_discover_writes_dimensions_and_raw() {
        let dir = tempdir().unwrap();
        write_input(dir.path());

        let mut config = Config::default();
        config.categories.insert("Intent & Task Type".into(), "intent".into());

        let llm = MockProvider::new(RESPONSE);
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_discover(args(dir.path()), &config, llm.clone(), &formatter)
            .await
            .unwrap();

        assert_eq!(llm.call_count(), 1);
        assert!(llm.prompts()[0].contains("1. Help, my sink leaks every night"));
        assert!(llm.prompts()[0].contains("A home improvement forum."));

        let categories = result.categories.unwrap();
        assert_eq!(categories[0].key, "intent");
        assert_eq!(categories[1].key, "domain");
        assert!(result.unverified_examples.is_empty());

        let written = read_dimensions(dir.path().join("dimensions.json")).unwrap();
        let names: Vec<&str> = written.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Intent & Task Type", "Domain"]);

        let raw = std::fs::read_to_string(dir.path().join("dimensions.md")).unwrap();
        assert_eq!(raw, RESPONSE);
    }

    #[tokio::test]
    async fn test_unparseable_response_saves_raw_only() {
        let dir = tempdir().unwrap();
        write_input(dir.path());

        let mut discover_args = args(dir.path());
        discover_args.raw = Some(dir.path().join("results.md"));

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_discover(discover_args, &Config::default(), MockProvider::new("no json here"), &formatter)
            .await
            .unwrap();

        assert!(result.categories.is_none());
        assert!(result.parse_error.is_some());
        assert!(dir.path().join("results.md").exists());
        assert!(!dir.path().join("dimensions.json").exists());
    }

    #[tokio::test]
    async fn test_call_failure_is_fatal() {
        let dir = tempdir().unwrap();
        write_input(dir.path());

        let mut llm = MockProvider::default();
        llm.add_error_containing("<conversations>");

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let err = execute_discover(args(dir.path()), &Config::default(), llm, &formatter)
            .await
            .unwrap_err();

        assert!(matches!(err, crate::CliError::Synthesizer(_)));
        assert!(!dir.path().join("dimensions.md").exists());
    }

    #[tokio::test]
    async fn test_limit_truncates_threads() {
        let dir = tempdir().unwrap();
        write_input(dir.path());

        let mut discover_args = args(dir.path());
        discover_args.limit = Some(1);

        let llm = MockProvider::new(RESPONSE);
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_discover(discover_args, &Config::default(), llm.clone(), &formatter)
            .await
            .unwrap();

        assert_eq!(result.threads_analyzed, 1);
        assert!(!llm.prompts()[0].contains("primer"));
    }
}
