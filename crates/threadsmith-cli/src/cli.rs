//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Threadsmith - turn forum threads into synthetic benchmark questions.
#[derive(Debug, Parser)]
#[command(name = "threadsmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "THREADSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (counts only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Drop blank and duplicate threads from a CSV export
    Dedup(DedupArgs),

    /// Ask the model which dimensions the threads vary along
    Discover(DiscoverArgs),

    /// Generate one question per combination of dimensions
    Generate(GenerateArgs),

    /// Generate questions by cycling through prompt categories
    Cycle(CycleArgs),

    /// Flatten a question file into a CSV table
    Flatten(FlattenArgs),

    /// Manage generator profiles
    Profile(ProfileArgs),
}

/// Arguments for the dedup command.
#[derive(Debug, Parser)]
pub struct DedupArgs {
    /// Thread CSV with title and body columns
    #[arg(short, long)]
    pub input: PathBuf,

    /// Destination threads JSON
    #[arg(short, long)]
    pub output: PathBuf,

    /// Treat whitespace-only fields as blank and ignore surrounding whitespace
    #[arg(long)]
    pub normalize: bool,
}

/// Arguments for the discover command.
#[derive(Debug, Parser)]
pub struct DiscoverArgs {
    /// Threads JSON written by `dedup`
    #[arg(short, long)]
    pub input: PathBuf,

    /// Destination dimension JSON
    #[arg(short, long)]
    pub output: PathBuf,

    /// Where to save the raw model response (defaults to the output path with `.md`)
    #[arg(long)]
    pub raw: Option<PathBuf>,

    /// Describe the community the threads come from
    #[arg(long)]
    pub context: Option<String>,

    /// Analyze only the first N threads
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the generate command.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    /// Dimension JSON
    #[arg(short, long)]
    pub dimensions: PathBuf,

    /// Destination question JSON
    #[arg(short, long)]
    pub output: PathBuf,

    /// Also write a flattened CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Generate for only the first N combinations
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Prompt template file replacing the built-in one
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Generation calls in flight at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Print the prompts without calling the model
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the cycle command.
#[derive(Debug, Parser)]
pub struct CycleArgs {
    /// Prompt category JSON
    #[arg(long)]
    pub categories: PathBuf,

    /// Destination question JSON
    #[arg(short, long)]
    pub output: PathBuf,

    /// Number of questions (defaults to `synthesizer.default_target_count`)
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Also write a flattened CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Prompt template file replacing the built-in one
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Generation calls in flight at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Print the prompts without calling the model
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the flatten command.
#[derive(Debug, Parser)]
pub struct FlattenArgs {
    /// Question JSON
    #[arg(short, long)]
    pub input: PathBuf,

    /// Destination CSV
    #[arg(short, long)]
    pub output: PathBuf,

    /// Column schema to write
    #[arg(long, value_enum, default_value = "dimensions")]
    pub layout: LayoutArg,

    /// Category keys, in column order
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Dimension JSON to take the category keys from
    #[arg(short, long)]
    pub dimensions: Option<PathBuf>,
}

/// Column schema options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LayoutArg {
    /// One `<Key>_Dimension` column per category
    Dimensions,
    /// Category name, dimension, instruction and examples columns
    Category,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
