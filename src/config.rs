//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mirror: MirrorConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub insight: InsightConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local mirror configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    /// SQLite file holding the on-device snapshot
    #[serde(default = "default_mirror_path")]
    pub path: String,
}

fn default_mirror_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("nutritrack").join("mirror.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./nutritrack_data/mirror.db".to_string())
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            path: default_mirror_path(),
        }
    }
}

/// Remote day-log store configuration
///
/// Leaving `base_url` unset runs the tracker in local-only mode.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_store_timeout")]
    pub request_timeout_ms: u64,
}

fn default_store_timeout() -> u64 {
    10_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            request_timeout_ms: default_store_timeout(),
        }
    }
}

/// Text-generation service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InsightConfig {
    #[serde(default = "default_insight_url")]
    pub base_url: String,

    /// Without a key the insight client answers with a fixed notice
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_insight_model")]
    pub model: String,

    #[serde(default = "default_insight_timeout")]
    pub request_timeout_ms: u64,
}

fn default_insight_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_insight_model() -> String {
    "gemini-pro".to_string()
}

fn default_insight_timeout() -> u64 {
    30_000
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            base_url: default_insight_url(),
            api_key: None,
            model: default_insight_model(),
            request_timeout_ms: default_insight_timeout(),
        }
    }
}

/// Session behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// How long a "saved"/"error" status stays visible before reverting to idle
    #[serde(default = "default_status_display")]
    pub status_display_ms: u64,

    /// Default dashboard window: today minus this many days, through today
    #[serde(default = "default_range_days")]
    pub default_range_days: i64,
}

fn default_status_display() -> u64 {
    3000
}

fn default_range_days() -> i64 {
    10
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            status_display_ms: default_status_display(),
            default_range_days: default_range_days(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
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
    "info".to_string()
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

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
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
            dirs::config_dir().map(|p| p.join("nutritrack").join("config.toml")),
            Some(PathBuf::from("/etc/nutritrack/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup (the process environment in practice)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("NUTRITRACK_MIRROR_PATH") {
            self.mirror.path = path;
        }

        if let Some(url) = lookup("NUTRITRACK_STORE_URL") {
            self.store.base_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(key) = lookup("NUTRITRACK_STORE_API_KEY") {
            self.store.api_key = Some(key).filter(|k| !k.is_empty());
        }

        if let Some(url) = lookup("NUTRITRACK_INSIGHT_URL") {
            self.insight.base_url = url;
        }
        if let Some(key) = lookup("NUTRITRACK_INSIGHT_API_KEY") {
            self.insight.api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(model) = lookup("NUTRITRACK_INSIGHT_MODEL") {
            self.insight.model = model;
        }

        if let Some(host) = lookup("NUTRITRACK_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = lookup("NUTRITRACK_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Some(level) = lookup("NUTRITRACK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("NUTRITRACK_LOG_FORMAT") {
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
    r#"# NutriTrack Configuration
#
# Environment variables override these settings:
# - NUTRITRACK_MIRROR_PATH
# - NUTRITRACK_STORE_URL
# - NUTRITRACK_STORE_API_KEY
# - NUTRITRACK_INSIGHT_URL
# - NUTRITRACK_INSIGHT_API_KEY
# - NUTRITRACK_INSIGHT_MODEL
# - NUTRITRACK_API_HOST
# - NUTRITRACK_API_PORT
# - NUTRITRACK_LOG_LEVEL
# - NUTRITRACK_LOG_FORMAT

[mirror]
# SQLite file holding the local copy of settings and logs
path = "~/.local/share/nutritrack/mirror.db"

[store]
# Remote document store. Leave unset to run local-only.
# base_url = "https://docs.example.com/nutritrack"
# api_key = ""

# Request timeout in milliseconds
request_timeout_ms = 10000

[insight]
# Text-generation service used for dashboard summaries
base_url = "https://generativelanguage.googleapis.com"
model = "gemini-pro"
# api_key = ""
request_timeout_ms = 30000

[tracker]
# How long "saved"/"error" sync status stays visible (ms)
status_display_ms = 3000

# Default dashboard window in days (ending today)
default_range_days = 10

[api]
host = "127.0.0.1"
port = 8090

# Allowed CORS origins (empty = permissive)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
