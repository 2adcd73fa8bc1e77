//! Configuration data model and validation

use crate::error::{AppError, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
///
/// Built once at startup and never mutated while probing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Region map (JSON) to read endpoints from
    #[serde(default = "default_map_file")]
    pub map_file: PathBuf,

    /// Number of connect attempts per endpoint
    #[serde(default = "default_sample_count")]
    pub sample_count: u32,

    /// Per-attempt connect timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Only probe the first few regions of the map
    #[serde(default)]
    pub test_mode: bool,

    /// Markdown report path; generated from the start time when unset
    #[serde(default)]
    pub output_file: Option<PathBuf>,

    /// Optional JSON summary path
    #[serde(default)]
    pub json_output: Option<PathBuf>,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            map_file: default_map_file(),
            sample_count: default_sample_count(),
            timeout_seconds: default_timeout_secs(),
            test_mode: false,
            output_file: None,
            json_output: None,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.map_file.as_os_str().is_empty() {
            return Err(AppError::config("Region map path cannot be empty"));
        }

        if self.sample_count == 0 {
            return Err(AppError::config("Ping count must be greater than 0"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if let Some(ref output) = self.output_file {
            if output.as_os_str().is_empty() {
                return Err(AppError::config("Output file path cannot be empty"));
            }
        }

        Ok(())
    }

    /// Markdown report path for a campaign started at `started_at`
    pub fn report_path(&self, started_at: DateTime<Local>) -> PathBuf {
        match self.output_file {
            Some(ref path) => path.clone(),
            None => PathBuf::from(format!(
                "{}-{}.md",
                crate::defaults::DEFAULT_REPORT_PREFIX,
                started_at.format("%Y%m%d-%H%M%S")
            )),
        }
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(map_file) = std::env::var("MAP_FILE") {
            if !map_file.trim().is_empty() {
                self.map_file = PathBuf::from(map_file.trim());
            }
        }

        if let Ok(count) = std::env::var("PING_COUNT") {
            self.sample_count = count.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PING_COUNT value '{}': {}", count, e)))?;
        }

        if let Ok(timeout) = std::env::var("TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Ok(test_mode) = std::env::var("TEST_MODE") {
            self.test_mode = test_mode.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TEST_MODE value '{}': {}", test_mode, e)))?;
        }

        if let Ok(output) = std::env::var("OUTPUT_FILE") {
            if !output.trim().is_empty() {
                self.output_file = Some(PathBuf::from(output.trim()));
            }
        }

        if let Ok(json_output) = std::env::var("JSON_OUTPUT") {
            if !json_output.trim().is_empty() {
                self.json_output = Some(PathBuf::from(json_output.trim()));
            }
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_map_file() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_MAP_FILE)
}

fn default_sample_count() -> u32 {
    crate::defaults::DEFAULT_SAMPLE_COUNT
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
