//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use threadsmith_dedup::DedupConfig;
use threadsmith_llm::{ollama, openai, OllamaProvider, OpenAiProvider, Provider};
use threadsmith_synthesizer::SynthesizerConfig;

/// Environment variable holding the OpenAI key when a profile names none.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available generator profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Question generation settings
    #[serde(default)]
    pub synthesizer: SynthesizerConfig,

    /// Thread deduplication settings
    #[serde(default)]
    pub dedup: DedupConfig,

    /// Short keys for long category names
    #[serde(default)]
    pub categories: HashMap<String, String>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Which backend a profile talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible chat completions API
    OpenAi,
}

/// Generator profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Backend kind
    pub provider: ProviderKind,

    /// Base URL of the backend
    pub endpoint: String,

    /// Model name
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".threadsmith").join("config.toml"))
    }

    /// Load configuration from `path`, or the defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check settings that serde cannot.
    pub fn validate(&self) -> Result<()> {
        self.synthesizer
            .validate()
            .map_err(|e| CliError::Config(format!("[synthesizer] {}", e)))
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }
}

impl Profile {
    /// A local Ollama profile.
    pub fn ollama(model: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::Ollama,
            endpoint: ollama::DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            api_key_env: None,
        }
    }

    /// An OpenAI profile reading its key from [`DEFAULT_API_KEY_ENV`].
    pub fn openai(model: impl Into<String>) -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            endpoint: openai::DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            api_key_env: Some(DEFAULT_API_KEY_ENV.to_string()),
        }
    }

    /// Name of the variable the API key is read from.
    pub fn key_variable(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    /// Construct the generator this profile describes.
    pub fn build_provider(&self) -> Result<Provider> {
        let timeout = Duration::from_secs(self.timeout_secs);

        match self.provider {
            ProviderKind::Ollama => Ok(Provider::Ollama(
                OllamaProvider::new(&self.endpoint, &self.model)
                    .with_timeout(timeout)
                    .map_err(|e| CliError::Config(e.to_string()))?
                    .with_max_retries(self.max_retries),
            )),
            ProviderKind::OpenAi => {
                let variable = self.key_variable();
                let api_key = std::env::var(variable)
                    .map_err(|_| CliError::Config(format!("Environment variable {} is not set", variable)))?;
                Ok(Provider::OpenAi(
                    OpenAiProvider::new(&self.endpoint, &self.model, api_key)
                        .with_timeout(timeout)
                        .map_err(|e| CliError::Config(e.to_string()))?
                        .with_max_retries(self.max_retries),
                ))
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert("default".to_string(), Profile::ollama("llama3.1"));
        profiles.insert("openai".to_string(), Profile::openai("gpt-4o-mini"));

        Self {
            active_profile: "default".to_string(),
            profiles,
            synthesizer: SynthesizerConfig::default(),
            dedup: DedupConfig::default(),
            categories: HashMap::new(),
            settings: Settings::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_timeout_secs() -> u64 {
    ollama::DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    ollama::DEFAULT_MAX_RETRIES
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.active_profile, "default");
        assert!(config.profiles.contains_key("default"));
        assert_eq!(config.synthesizer, SynthesizerConfig::sequential());
        assert_eq!(config.get_active_profile().unwrap().provider, ProviderKind::Ollama);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.categories.insert("Intent & Task Type".into(), "intent".into());
        config.synthesizer.max_concurrency = 3;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
active_profile = "local"

[profiles.local]
provider = "ollama"
endpoint = "http://gpu-box:11434"
model = "qwen2.5"

[synthesizer]
max_concurrency = 8

[categories]
"Intent & Task Type" = "intent"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        let profile = config.get_active_profile().unwrap();
        assert_eq!(profile.endpoint, "http://gpu-box:11434");
        assert_eq!(profile.timeout_secs, 120);
        assert_eq!(profile.max_retries, 1);
        assert_eq!(config.synthesizer.max_concurrency, 8);
        assert_eq!(config.synthesizer.default_target_count, 50);
        assert_eq!(config.categories["Intent & Task Type"], "intent");
        assert!(config.settings.color);
    }

    #[test]
    fn test_invalid_synthesizer_settings_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[synthesizer]\nmax_concurrency = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("max_concurrency"));
    }

    #[test]
    fn test_switch_profile() {
        let mut config = Config::default();
        config.switch_profile("openai".into()).unwrap();
        assert_eq!(config.active_profile, "openai");
        assert!(config.switch_profile("missing".into()).is_err());
        assert_eq!(config.active_profile, "openai");
    }

    #[test]
    fn test_build_ollama_provider() {
        let mut profile = Profile::ollama("llama3.1");
        profile.endpoint = "http://localhost:9999/".into();
        match profile.build_provider().unwrap() {
            Provider::Ollama(p) => {
                assert_eq!(p.model(), "llama3.1");
                assert_eq!(p.endpoint(), "http://localhost:9999");
            }
            other => panic!("unexpected provider {:?}", other),
        }
    }

    #[test]
    fn test_openai_requires_key_variable() {
        let mut profile = Profile::openai("gpt-4o-mini");
        profile.api_key_env = Some("THREADSMITH_TEST_UNSET_KEY".into());
        let err = profile.build_provider().unwrap_err();
        assert!(err.to_string().contains("THREADSMITH_TEST_UNSET_KEY"));
    }
}
