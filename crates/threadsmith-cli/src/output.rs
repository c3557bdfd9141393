//! Output formatting for the CLI.

use crate::config::{Config, OutputFormat};
use crate::error::Result;
use colored::*;
use serde_json::json;
use threadsmith_domain::{DedupResult, FlatTable};
use threadsmith_synthesizer::{DiscoveryResult, SynthesisReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format the outcome of a dedup pass.
    pub fn dedup_summary(&self, result: &DedupResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "unique_threads": result.records.len(),
                "total_seen": result.total_seen,
                "duplicates_removed": result.duplicates_removed,
                "skipped": result.skipped,
            }))?),
            OutputFormat::Table => Ok(key_value_table([
                ("Unique threads", result.records.len().to_string()),
                ("Rows with title and body", result.total_seen.to_string()),
                ("Duplicates removed", result.duplicates_removed.to_string()),
                ("Blank rows skipped", result.skipped.to_string()),
            ])),
            OutputFormat::Quiet => Ok(result.records.len().to_string()),
        }
    }

    /// Format the outcome of a generation run.
    ///
    /// `combinations` is the size of the full product, `None` when it is too
    /// large to count.
    pub fn synthesis_summary(&self, report: &SynthesisReport, combinations: Option<usize>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let failures: Vec<serde_json::Value> = report
                    .failures
                    .iter()
                    .map(|f| json!({ "index": f.index, "reason": f.reason }))
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "generated": report.generated(),
                    "failed": report.failed(),
                    "attempted": report.attempted,
                    "combinations": combinations,
                    "processing_time_ms": report.processing_time_ms,
                    "failures": failures,
                }))?)
            }
            OutputFormat::Table => {
                let mut output = key_value_table([
                    ("Generated", report.generated().to_string()),
                    ("Failed", report.failed().to_string()),
                    ("Attempted", report.attempted.to_string()),
                    (
                        "Combinations",
                        combinations.map_or_else(|| "too many to count".to_string(), |n| n.to_string()),
                    ),
                    ("Time", format!("{} ms", report.processing_time_ms)),
                ]);

                if !report.failures.is_empty() {
                    let mut builder = Builder::default();
                    builder.push_record(["#", "Reason"]);
                    for failure in &report.failures {
                        builder.push_record([(failure.index + 1).to_string(), failure.reason.clone()]);
                    }
                    output.push('\n');
                    output.push_str(&styled(builder));
                }
                Ok(output)
            }
            OutputFormat::Quiet => Ok(report.generated().to_string()),
        }
    }

    /// Format the outcome of dimension discovery.
    pub fn discovery_summary(&self, result: &DiscoveryResult) -> Result<String> {
        let categories = result.categories.as_deref().unwrap_or_default();

        match self.format {
            OutputFormat::Json => {
                let listed: Vec<serde_json::Value> = categories
                    .iter()
                    .map(|c| {
                        json!({
                            "category": c.name,
                            "key": c.key,
                            "dimensions": c.dimensions.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "threads_analyzed": result.threads_analyzed,
                    "categories": listed,
                    "parse_error": result.parse_error,
                    "unverified_examples": result.unverified_examples.len(),
                }))?)
            }
            OutputFormat::Table => {
                if categories.is_empty() {
                    return Ok(self.colorize("No dimensions found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Category", "Key", "Dimensions"]);
                for category in categories {
                    let names: Vec<&str> = category.dimensions.iter().map(|d| d.name.as_str()).collect();
                    builder.push_record([category.name.clone(), category.key.clone(), names.join(", ")]);
                }
                Ok(styled(builder))
            }
            OutputFormat::Quiet => Ok(categories.len().to_string()),
        }
    }

    /// Format the result of flattening.
    pub fn table_summary(&self, table: &FlatTable) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "rows": table.len(),
                "columns": table.headers,
            }))?),
            OutputFormat::Table => Ok(key_value_table([
                ("Rows", table.len().to_string()),
                ("Columns", table.headers.join(", ")),
            ])),
            OutputFormat::Quiet => Ok(table.len().to_string()),
        }
    }

    /// Format rendered prompts for a dry run.
    pub fn prompts(&self, prompts: &[String]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(prompts)?),
            OutputFormat::Table => {
                let total = prompts.len();
                let sections: Vec<String> = prompts
                    .iter()
                    .enumerate()
                    .map(|(i, prompt)| {
                        format!("{}\n{}", self.colorize(&format!("--- Prompt {}/{} ---", i + 1, total), "cyan"), prompt)
                    })
                    .collect();
                Ok(sections.join("\n\n"))
            }
            OutputFormat::Quiet => Ok(prompts.len().to_string()),
        }
    }

    /// Format the configured profiles.
    pub fn profiles(&self, config: &Config) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "active_profile": config.active_profile,
                "profiles": config.profiles,
            }))?),
            OutputFormat::Table => {
                if config.profiles.is_empty() {
                    return Ok(self.info("No profiles configured"));
                }

                let mut builder = Builder::default();
                builder.push_record(["", "Name", "Provider", "Model", "Endpoint"]);
                for (name, profile) in &config.profiles {
                    let marker = if name == &config.active_profile { "*" } else { "" };
                    builder.push_record([
                        marker.to_string(),
                        name.clone(),
                        format!("{:?}", profile.provider).to_lowercase(),
                        profile.model.clone(),
                        profile.endpoint.clone(),
                    ]);
                }
                Ok(styled(builder))
            }
            OutputFormat::Quiet => {
                let names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
                Ok(names.join("\n"))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Print a status line unless the output is meant for machines.
    pub fn status(&self, line: String) {
        if self.format == OutputFormat::Table {
            println!("{}", line);
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn key_value_table<const N: usize>(rows: [(&str, String); N]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value"]);
    for (name, value) in rows {
        builder.push_record([name.to_string(), value]);
    }
    styled(builder)
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
