//! Threadsmith CLI - synthetic benchmark questions from forum threads.

use clap::Parser;
use threadsmith_cli::commands;
use threadsmith_cli::{Cli, Command, Config, Formatter};
use threadsmith_llm::Provider;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; stdout carries command results.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> threadsmith_cli::Result<()> {
    // Load or create config
    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let mut config = if config_path.exists() {
        Config::load_from(&config_path)?
    } else {
        let cfg = Config::default();
        if let Err(e) = cfg.save_to(&config_path) {
            tracing::debug!("Could not write default config to {}: {}", config_path.display(), e);
        }
        cfg
    };

    // Override profile for this invocation only
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Dedup(args) => {
            commands::execute_dedup(args, &config, &formatter)?;
        }
        Command::Flatten(args) => {
            commands::execute_flatten(args, &config, &formatter)?;
        }
        Command::Profile(args) => {
            commands::execute_profile(args, &mut config, &config_path, &formatter)?;
        }
        Command::Generate(args) if args.dry_run => {
            commands::preview_generate(&args, &config, &formatter)?;
        }
        Command::Cycle(args) if args.dry_run => {
            commands::preview_cycle(&args, &config, &formatter)?;
        }
        Command::Generate(args) => {
            commands::execute_generate(args, &config, provider(&config)?, &formatter).await?;
        }
        Command::Cycle(args) => {
            commands::execute_cycle(args, &config, provider(&config)?, &formatter).await?;
        }
        Command::Discover(args) => {
            commands::execute_discover(args, &config, provider(&config)?, &formatter).await?;
        }
    }

    Ok(())
}

/// Build the generator for the active profile, once per run.
fn provider(config: &Config) -> threadsmith_cli::Result<Provider> {
    let llm = config.get_active_profile()?.build_provider()?;
    tracing::info!("Using profile '{}' ({})", config.active_profile, llm.model_name());
    Ok(llm)
}
