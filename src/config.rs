//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base address of the auth service
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Base address of the timeline service
    #[serde(default = "default_timeline_url")]
    pub timeline_url: String,

    /// Transport timeout; unset leaves the HTTP client's own behaviour
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_auth_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_timeline_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            timeline_url: default_timeline_url(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// Transport timeout, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Durable client state configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("comics-timeline").to_string_lossy().to_string())
        .unwrap_or_else(|| "./comics_timeline_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~/` expanded
    pub fn data_path(&self) -> PathBuf {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.data_dir)),
            None => PathBuf::from(&self.data_dir),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("comics-timeline").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = lookup("COMICS_TIMELINE_AUTH_URL") {
            self.api.auth_url = url;
        }
        if let Some(url) = lookup("COMICS_TIMELINE_API_URL") {
            self.api.timeline_url = url;
        }
        if let Some(secs) = lookup("COMICS_TIMELINE_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse() {
                self.api.request_timeout_secs = Some(s);
            }
        }

        // Storage overrides
        if let Some(data_dir) = lookup("COMICS_TIMELINE_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        // Logging overrides
        if let Some(level) = lookup("COMICS_TIMELINE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("COMICS_TIMELINE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Comics Timeline Configuration
#
# Environment variables override these settings:
# - COMICS_TIMELINE_AUTH_URL
# - COMICS_TIMELINE_API_URL
# - COMICS_TIMELINE_TIMEOUT_SECS
# - COMICS_TIMELINE_DATA_DIR
# - COMICS_TIMELINE_LOG_LEVEL
# - COMICS_TIMELINE_LOG_FORMAT

[api]
# Auth service (login, registration, profile)
auth_url = "http://localhost:8001"

# Timeline service (eras, sub-eras)
timeline_url = "http://localhost:8000"

# Request timeout in seconds (unset: no client-side timeout)
# request_timeout_secs = 30

[storage]
# Directory holding the persisted credential and theme preference
data_dir = "~/.local/share/comics-timeline"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
