use anyhow::{anyhow, Context, Result};
use jsonc_parser::{parse_to_serde_value, ParseOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Base URL of the transcription service.
    #[serde(default = "default_service_url")]
    pub service_url: String,

    /// Address the transcription result is mailed to. Can be overridden
    /// per invocation with --email.
    #[serde(default)]
    pub email: Option<String>,

    /// Whisper model the service should run. Overridden with --model.
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Request timeout in seconds for the upload.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_service_url() -> String {
    "http://localhost:8700".to_string()
}

fn default_model_name() -> String {
    "small".to_string()
}

fn default_timeout_secs() -> u64 {
    // Uploads can be tens of megabytes even over a local link.
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            email: None,
            model_name: default_model_name(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Loads the config from the platform config directory, creating a
    /// default file on first run.
    pub fn load() -> Result<Self> {
        let config_dir = directories::ProjectDirs::from("", "", "transcribe-client")
            .context("Failed to get config directory")?
            .config_dir()
            .to_path_buf();

        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        let config_path = config_dir.join("config.jsonc");

        let config = if config_path.exists() {
            Self::read_from_disk(&config_path)?
        } else {
            let default_config = Config::default();
            Self::write_config_file(&config_path, &default_config)?;
            tracing::info!("Created default config at: {:?}", config_path);
            default_config
        };

        tracing::debug!("Loaded config from: {:?}", config_path);
        Ok(config)
    }

    fn read_from_disk(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {:?}", path))?;
        Self::parse(&content)
    }

    fn write_config_file(path: &Path, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config).context("Failed to serialize config")?;
        fs::write(path, json).with_context(|| format!("Failed to write config file at {:?}", path))
    }

    fn parse(content: &str) -> Result<Self> {
        let value = parse_to_serde_value(content, &ParseOptions::default())
            .context("Failed to parse config as JSONC")?
            .ok_or_else(|| anyhow!("Config file did not contain a JSON value"))?;
        serde_json::from_value(value).context("Failed to deserialize config")
    }

    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "transcribe-client")
            .map(|dirs| dirs.config_dir().join("config.jsonc"))
    }
}
