//! Threadsmith CLI library.
//!
//! Configuration, command execution and output formatting for the
//! `threadsmith` binary. Commands that talk to a model are generic over
//! the provider, so they run unchanged against a mock in tests.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
