//! Configuration module for CloudPilot.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::{CloudPilotError, Result};

/// Environment variable that overrides `tagging.api_key`.
pub const API_KEY_ENV: &str = "CLOUDPILOT_API_KEY";

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/cloudpilot.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Upload simulation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Interval between simulated progress ticks in milliseconds.
    #[serde(default = "default_progress_interval")]
    pub progress_interval_ms: u64,
    /// Progress added on each tick.
    #[serde(default = "default_progress_step")]
    pub progress_step: u8,
    /// Simulated progress never goes beyond this value.
    #[serde(default = "default_progress_cap")]
    pub progress_cap: u8,
    /// Progress shown while the file is being tagged.
    #[serde(default = "default_tagging_progress")]
    pub tagging_progress: u8,
    /// Delay before a completed upload leaves the active set, in milliseconds.
    #[serde(default = "default_completed_clear_delay")]
    pub completed_clear_delay_ms: u64,
}

fn default_progress_interval() -> u64 {
    200
}

fn default_progress_step() -> u8 {
    10
}

fn default_progress_cap() -> u8 {
    90
}

fn default_tagging_progress() -> u8 {
    95
}

fn default_completed_clear_delay() -> u64 {
    3000
}

impl UploadConfig {
    /// Tick period of the progress simulation.
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms)
    }

    /// Delay before completed uploads are cleared.
    pub fn completed_clear_delay(&self) -> Duration {
        Duration::from_millis(self.completed_clear_delay_ms)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            progress_interval_ms: default_progress_interval(),
            progress_step: default_progress_step(),
            progress_cap: default_progress_cap(),
            tagging_progress: default_tagging_progress(),
            completed_clear_delay_ms: default_completed_clear_delay(),
        }
    }
}

/// Tag generation service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TaggingConfig {
    /// Base URL of the generative language API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// API key (can be set via CLOUDPILOT_API_KEY).
    #[serde(default)]
    pub api_key: String,
    /// Number of content characters included in the prompt for non-media files.
    #[serde(default = "default_content_preview_chars")]
    pub content_preview_chars: usize,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Total request timeout in seconds.
    #[serde(default = "default_total_timeout")]
    pub total_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_content_preview_chars() -> usize {
    1024
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_total_timeout() -> u64 {
    120
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: String::new(),
            content_preview_chars: default_content_preview_chars(),
            connect_timeout_secs: default_connect_timeout(),
            total_timeout_secs: default_total_timeout(),
        }
    }
}

/// Browser session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Timezone for displaying dates (e.g., "Asia/Tokyo", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Start the session with the sample file tree.
    #[serde(default = "default_seed_mock_data")]
    pub seed_mock_data: bool,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_seed_mock_data() -> bool {
    true
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            seed_mock_data: default_seed_mock_data(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Upload simulation configuration.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Tag generation configuration.
    #[serde(default)]
    pub tagging: TaggingConfig,
    /// Browser session configuration.
    #[serde(default)]
    pub browser: BrowserConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(CloudPilotError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CloudPilotError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CLOUDPILOT_API_KEY`: Override the tagging API key
    pub fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            if !api_key.is_empty() {
                self.tagging.api_key = api_key;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        let upload = &self.upload;
        if upload.progress_interval_ms == 0 {
            return Err(CloudPilotError::Config(
                "upload.progress_interval_ms must be greater than 0".to_string(),
            ));
        }
        if upload.progress_step == 0 {
            return Err(CloudPilotError::Config(
                "upload.progress_step must be greater than 0".to_string(),
            ));
        }
        if upload.progress_cap >= 100 {
            return Err(CloudPilotError::Config(
                "upload.progress_cap must be below 100".to_string(),
            ));
        }
        if upload.tagging_progress < upload.progress_cap || upload.tagging_progress >= 100 {
            return Err(CloudPilotError::Config(format!(
                "upload.tagging_progress must be between {} and 99",
                upload.progress_cap
            )));
        }

        let base_url = url::Url::parse(&self.tagging.base_url)
            .map_err(|e| CloudPilotError::Config(format!("invalid tagging.base_url: {e}")))?;
        match base_url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(CloudPilotError::Config(format!(
                    "unsupported tagging.base_url scheme: {scheme}"
                )));
            }
        }

        Ok(())
    }
}
