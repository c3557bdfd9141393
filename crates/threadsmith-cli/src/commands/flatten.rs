//! Flatten command implementation.

use crate::cli::{FlattenArgs, LayoutArg};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use threadsmith_domain::{flatten, Column, FlatTable};
use threadsmith_store::{apply_key_aliases, read_dimensions, read_questions, write_csv};

/// Execute the flatten command.
///
/// The column schema always comes from explicit keys or a dimension file,
/// never from the questions themselves.
pub fn execute_flatten(args: FlattenArgs, config: &Config, formatter: &Formatter) -> Result<FlatTable> {
    let columns = match args.layout {
        LayoutArg::Category => Column::category_schema(),
        LayoutArg::Dimensions => Column::dimension_schema(&dimension_keys(&args, config)?),
    };

    let batch = read_questions(&args.input)?;
    let table = flatten(&batch, &columns);
    write_csv(&args.output, &table)?;

    println!("{}", formatter.table_summary(&table)?);
    formatter.status(formatter.success(&format!("Wrote {} rows to {}", table.len(), args.output.display())));
    Ok(table)
}

fn dimension_keys(args: &FlattenArgs, config: &Config) -> Result<Vec<String>> {
    if !args.columns.is_empty() {
        return Ok(args.columns.clone());
    }

    match &args.dimensions {
        Some(path) => {
            let mut categories = read_dimensions(path)?;
            apply_key_aliases(&mut categories, &config.categories);
            Ok(categories.into_iter().map(|c| c.key).collect())
        }
        None => Err(CliError::InvalidInput(
            "the dimensions layout needs --columns or --dimensions".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    const QUESTIONS: &str = r#"{
  "questions": [
    {
      "question": "Why does my sink drip?",
      "intent_dimension": {"dimension": "Troubleshooting", "description": "Fix", "examples": []},
      "domain_dimension": {"dimension": "Plumbing", "description": "Pipes", "examples": []}
    },
    {
      "question": "Which breaker, \"A\" or B?",
      "intent_dimension": {"dimension": "Planning", "description": "Plan", "examples": []}
    }
  ],
  "total_generated": 2
}"#;

    fn args(dir: &Path) -> FlattenArgs {
        fs::write(dir.join("questions.json"), QUESTIONS).unwrap();
        FlattenArgs {
            input: dir.join("questions.json"),
            output: dir.join("questions.csv"),
            layout: LayoutArg::Dimensions,
            columns: Vec::new(),
            dimensions: None,
        }
    }

    #[test]
    fn test_explicit_columns() {
        let dir = tempdir().unwrap();
        let mut flatten_args = args(dir.path());
        flatten_args.columns = vec!["intent".into(), "domain".into()];

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        execute_flatten(flatten_args, &Config::default(), &formatter).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("questions.csv")).unwrap(),
            "Question,Intent_Dimension,Domain_Dimension\n\
             Why does my sink drip?,Troubleshooting,Plumbing\n\
             \"Which breaker, \"\"A\"\" or B?\",Planning,\n"
        );
    }

    #[test]
    fn test_columns_from_dimension_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("dimensions.json"),
            r#"{"Intent & Task Type": [], "Domain": []}"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.categories.insert("Intent & Task Type".into(), "intent".into());

        let mut flatten_args = args(dir.path());
        flatten_args.dimensions = Some(dir.path().join("dimensions.json"));

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let table = execute_flatten(flatten_args, &config, &formatter).unwrap();

        assert_eq!(table.headers, vec!["Question", "Intent_Dimension", "Domain_Dimension"]);
        assert_eq!(table.rows[1], vec!["Which breaker, \"A\" or B?", "Planning", ""]);
    }

    #[test]
    fn test_schema_is_required() {
        let dir = tempdir().unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let err = execute_flatten(args(dir.path()), &Config::default(), &formatter).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
        assert!(!dir.path().join("questions.csv").exists());
    }

    #[test]
    fn test_category_layout() {
        let dir = tempdir().unwrap();
        let mut flatten_args = args(dir.path());
        flatten_args.layout = LayoutArg::Category;

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let table = execute_flatten(flatten_args, &Config::default(), &formatter).unwrap();

        assert_eq!(table.headers, vec!["question", "category", "instruction", "examples"]);
        assert_eq!(table.rows[0], vec!["Why does my sink drip?", "", "", ""]);
    }
}
