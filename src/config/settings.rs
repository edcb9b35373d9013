//! Configuration settings for the Tempo server.

use crate::error::{ConfigError, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub advisory: AdvisoryConfig,
    pub scheduling: SchedulingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            // Current directory
            PathBuf::from("config.toml"),
            PathBuf::from("tempo.toml"),
            // User config directory
            dirs::config_dir()
                .map(|p| p.join("tempo/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.advisory.base_url.is_empty() {
            return Err(ConfigError::MissingField("advisory.base_url".to_string()).into());
        }
        if self.advisory.model.is_empty() {
            return Err(ConfigError::MissingField("advisory.model".to_string()).into());
        }
        if self.advisory.timeout_secs == 0 {
            return Err(ConfigError::Invalid("advisory.timeout_secs must be > 0".to_string()).into());
        }

        let start = parse_hhmm(&self.scheduling.working_hours_start)
            .map_err(|e| ConfigError::Invalid(format!("scheduling.working_hours_start: {e}")))?;
        let end = parse_hhmm(&self.scheduling.working_hours_end)
            .map_err(|e| ConfigError::Invalid(format!("scheduling.working_hours_end: {e}")))?;
        if start >= end {
            return Err(ConfigError::Invalid(
                "scheduling working hours start must precede end".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

/// Parse an `HH:MM` clock string.
pub fn parse_hhmm(s: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| format!("expected HH:MM, got {s:?}"))
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// HTTP port.
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            http_port: 8080,
        }
    }
}

/// Advisory (text-completion) provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Base URL for the completion API (OpenAI-compatible).
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// API key (loaded from TEMPO_API_KEY if not set).
    pub api_key: Option<String>,
    /// Request timeout in seconds. Bounds every advisory call.
    pub timeout_secs: u64,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            timeout_secs: 30,
            max_tokens: 512,
        }
    }
}

/// Scheduling defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    /// Default start of the reschedule suggestion window (HH:MM).
    pub working_hours_start: String,
    /// Default end of the reschedule suggestion window (HH:MM).
    pub working_hours_end: String,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            working_hours_start: "09:00".to_string(),
            working_hours_end: "18:00".to_string(),
        }
    }
}
