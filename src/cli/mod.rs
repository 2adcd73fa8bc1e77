//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

/// TCP Ping Tester - TCP connect latency and loss across regions and carriers
///
/// Probes every region of a region map for China Unicom (联通), China Mobile
/// (移动) and China Telecom (电信), over IPv4 and then IPv6, prints one table
/// per region and saves a markdown report.
#[derive(Parser, Debug, Clone)]
#[command(name = "tcp-ping")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n  MAP_FILE, PING_COUNT, TIMEOUT_SECONDS, TEST_MODE, OUTPUT_FILE, JSON_OUTPUT, ENABLE_COLOR\n  (also read from a .env file; command-line flags take precedence)")]
pub struct Cli {
    /// Connect attempts per endpoint, at least 1 [default: 10]
    #[arg(short, long, value_parser = parse_count)]
    pub count: Option<u32>,

    /// Connect timeout in seconds, greater than 0 [default: 5]
    #[arg(short, long, value_parser = parse_duration)]
    pub timeout: Option<u64>,

    /// Region map JSON file [default: map.json]
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Only probe the first 3 regions
    #[arg(long)]
    pub test: bool,

    /// Markdown report path [default: tcp-ping-results-<timestamp>.md]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Also write all results as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(ref file) = self.file {
            if file.as_os_str().is_empty() {
                return Err("Region map path cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            supports_color()
        }
    }
}

/// Parse the per-endpoint sample count
fn parse_count(s: &str) -> Result<u32, String> {
    if s.starts_with('+') {
        return Err(format!("Invalid count: {}", s));
    }

    s.parse::<u32>()
        .map_err(|_| format!("Invalid count: {}", s))
        .and_then(|count| {
            if count == 0 {
                Err("Count must be greater than 0".to_string())
            } else {
                Ok(count)
            }
        })
}

/// Parse duration from seconds string
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
