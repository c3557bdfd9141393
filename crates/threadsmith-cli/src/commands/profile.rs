//! Profile command implementation.

use crate::cli::{ProfileAction, ProfileArgs};
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the profile command.
pub fn execute_profile(
    args: ProfileArgs,
    config: &mut Config,
    config_path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ProfileAction::List => list_profiles(config, formatter),
        ProfileAction::Show => show_active_profile(config, formatter),
        ProfileAction::Switch { name } => switch_profile(config, config_path, name, formatter),
    }
}

/// List all profiles.
fn list_profiles(config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.profiles(config)?);
    Ok(())
}

/// Show the active profile.
fn show_active_profile(config: &Config, formatter: &Formatter) -> Result<()> {
    let profile = config.get_active_profile()?;

    match formatter.format() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(profile)?),
        OutputFormat::Quiet => println!("{}", config.active_profile),
        OutputFormat::Table => {
            println!("Active profile: {}", formatter.success(&config.active_profile));
            println!("  Provider: {:?}", profile.provider);
            println!("  Endpoint: {}", profile.endpoint);
            println!("  Model: {}", profile.model);
            println!("  Timeout: {}s", profile.timeout_secs);
            if let Some(variable) = &profile.api_key_env {
                println!("  API key from: ${}", variable);
            }
        }
    }

    Ok(())
}

/// Switch to a different profile and persist the choice.
fn switch_profile(config: &mut Config, config_path: &Path, name: String, formatter: &Formatter) -> Result<()> {
    config.switch_profile(name.clone())?;
    config.save_to(config_path)?;
    formatter.status(formatter.success(&format!("Switched to profile '{}'", name)));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_switch_profile_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        let formatter = Formatter::new(OutputFormat::Table, false);

        switch_profile(&mut config, &path, "openai".to_string(), &formatter).unwrap();
        assert_eq!(config.active_profile, "openai");

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.active_profile, "openai");
    }

    #[test]
    fn test_switch_to_missing_profile() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = switch_profile(&mut config, &path, "nope".to_string(), &formatter);
        assert!(result.is_err());
        assert_eq!(config.active_profile, "default");
        assert!(!path.exists());
    }

    #[test]
    fn test_show_missing_active_profile() {
        let mut config = Config::default();
        config.active_profile = "gone".into();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        assert!(show_active_profile(&config, &formatter).is_err());
    }
}
