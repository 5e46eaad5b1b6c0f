//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ApiClientConfig;
use crate::playback::DEFAULT_TICK_INTERVAL_MS;
use crate::render::RenderOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Stats API connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Settings for [`ApiClient`](crate::api::ApiClient)
    pub fn client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_secs * 1000,
        }
    }
}

/// Playback and rendering settings
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    #[serde(default)]
    pub autoplay: bool,

    #[serde(default = "default_marker_history")]
    pub marker_history: usize,

    #[serde(default = "default_chart_width")]
    pub chart_width: usize,
}

fn default_tick_interval() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_marker_history() -> usize {
    10
}

fn default_chart_width() -> usize {
    60
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            autoplay: false,
            marker_history: default_marker_history(),
            chart_width: default_chart_width(),
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            width: self.chart_width,
            marker_history: self.marker_history,
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

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate(path)?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> LoadedConfig {
        let mut config = Config::default();
        let warnings = config.apply_env_overrides();
        LoadedConfig {
            config,
            source: None,
            warnings,
        }
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<LoadedConfig, ConfigError> {
        let mut config = Self::load(path)?;
        let warnings = config.apply_env_overrides();
        Ok(LoadedConfig {
            config,
            source: Some(path.to_path_buf()),
            warnings,
        })
    }

    /// Default config file locations, in search order
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("swarm-insights").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from default locations or environment
    pub fn load_default() -> LoadedConfig {
        Self::load_first(&Self::default_paths())
    }

    /// Load the first usable file in `paths`, else defaults
    ///
    /// Files that exist but fail to load are skipped and kept as warnings.
    pub fn load_first(paths: &[PathBuf]) -> LoadedConfig {
        let mut skipped = Vec::new();
        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(mut loaded) => {
                    skipped.append(&mut loaded.warnings);
                    loaded.warnings = skipped;
                    return loaded;
                }
                Err(e) => skipped.push(e),
            }
        }

        let mut loaded = Self::from_env();
        skipped.append(&mut loaded.warnings);
        loaded.warnings = skipped;
        loaded
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        if self.playback.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                error: "playback.tick_interval_ms must be at least 1".to_string(),
            });
        }
        if !is_log_format(&self.logging.format) {
            return Err(ConfigError::Invalid {
                path: path.to_path_buf(),
                error: format!("unknown logging.format {:?}", self.logging.format),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) -> Vec<ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides looked up by variable name, returning the ones ignored
    fn apply_overrides<F>(&mut self, var: F) -> Vec<ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ignored = Vec::new();

        // API overrides
        if let Some(url) = var("SWARM_API_URL") {
            self.api.base_url = url;
        }

        // Playback overrides
        if let Some(interval) = var("SWARM_TICK_INTERVAL_MS") {
            match interval.parse::<u64>() {
                Ok(ms) if ms > 0 => self.playback.tick_interval_ms = ms,
                _ => ignored.push(ConfigError::Env {
                    var: "SWARM_TICK_INTERVAL_MS",
                    value: interval,
                }),
            }
        }

        // Logging overrides
        if let Some(level) = var("SWARM_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SWARM_LOG_FORMAT") {
            if is_log_format(&format) {
                self.logging.format = format;
            } else {
                ignored.push(ConfigError::Env {
                    var: "SWARM_LOG_FORMAT",
                    value: format,
                });
            }
        }

        ignored
    }
}

fn is_log_format(format: &str) -> bool {
    matches!(format, "pretty" | "json")
}

/// A resolved configuration and the problems skipped while resolving it
///
/// Config is loaded before logging exists, so the warnings are held here
/// until [`report`](Self::report) runs after `telemetry::init`.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the settings came from, `None` for built-in defaults
    pub source: Option<PathBuf>,
    pub warnings: Vec<ConfigError>,
}

impl LoadedConfig {
    /// Log where the config came from and everything that was ignored
    pub fn report(&self) {
        for warning in &self.warnings {
            tracing::warn!(error = %warning, "Ignored configuration");
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::debug!("Using default config with environment overrides"),
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

    #[error("Invalid config file {path:?}: {error}")]
    Invalid { path: PathBuf, error: String },

    #[error("Ignoring invalid {var}={value:?}")]
    Env { var: &'static str, value: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Swarm Insights Configuration
#
# Environment variables override these settings:
# - SWARM_API_URL
# - SWARM_TICK_INTERVAL_MS
# - SWARM_LOG_LEVEL
# - SWARM_LOG_FORMAT

[api]
# Base URL of the stats API
base_url = "http://localhost:8000"

# Request timeout in seconds
request_timeout_secs = 30

[playback]
# Time between revealed check-ins (ms)
tick_interval_ms = 100

# Start playing as soon as the check-ins are loaded
autoplay = false

# Number of recent check-ins listed under the map
marker_history = 10

# Width of the activity chart and progress bar (characters)
chart_width = 60

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
