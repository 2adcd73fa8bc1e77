//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::Config,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    ///
    /// Defaults, then `.env` and environment variables, then CLI flags.
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file()?;
        config.merge_from_env()?;

        self.finish(config)
    }

    /// Apply CLI flags on top of `config` and validate the result
    fn finish(&self, mut config: Config) -> Result<Config> {
        self.apply_cli_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(count) = self.cli.count {
            config.sample_count = count;
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }

        if let Some(ref file) = self.cli.file {
            config.map_file = file.clone();
        }

        if self.cli.test {
            config.test_mode = true;
        }

        if let Some(ref output) = self.cli.output {
            config.output_file = Some(output.clone());
        }

        if let Some(ref json) = self.cli.json {
            config.json_output = Some(json.clone());
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color {
            config.enable_color = false;
        }

        // CLI-only flags
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Region Map: {}", config.map_file.display()));
    summary.push(format!("Ping Count: {}", config.sample_count));
    summary.push(format!("Timeout: {}s", config.timeout_seconds));
    summary.push(format!("Test Mode: {}", config.test_mode));
    if let Some(ref output) = config.output_file {
        summary.push(format!("Report File: {}", output.display()));
    }
    if let Some(ref json) = config.json_output {
        summary.push(format!("JSON Output: {}", json.display()));
    }
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_without_flags() {
        let cli = Cli::parse_from(["tcp-ping"]);
        let config = ConfigParser::new(cli).finish(Config::default()).unwrap();

        assert_eq!(config.sample_count, crate::defaults::DEFAULT_SAMPLE_COUNT);
        assert_eq!(config.timeout_seconds, crate::defaults::DEFAULT_TIMEOUT.as_secs());
        assert_eq!(config.map_file, PathBuf::from("map.json"));
        assert!(!config.test_mode);
        assert!(config.output_file.is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "tcp-ping", "-c", "3", "-t", "2", "-f", "regions.json", "--test",
            "-o", "out.md", "--json", "out.json", "--no-color", "--verbose",
        ]);
        let config = ConfigParser::new(cli).finish(Config::default()).unwrap();

        assert_eq!(config.sample_count, 3);
        assert_eq!(config.timeout_seconds, 2);
        assert_eq!(config.map_file, PathBuf::from("regions.json"));
        assert!(config.test_mode);
        assert_eq!(config.output_file, Some(PathBuf::from("out.md")));
        assert_eq!(config.json_output, Some(PathBuf::from("out.json")));
        assert!(!config.enable_color);
        assert!(config.verbose);
        assert!(!config.debug);
    }

    #[test]
    fn test_zero_count_from_env_rejected() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("PING_COUNT", "0");
        let result = ConfigParser::new(Cli::parse_from(["tcp-ping"])).parse();
        std::env::remove_var("PING_COUNT");

        assert_eq!(result.unwrap_err().category(), "CONFIG");
    }

    #[test]
    fn test_cli_overrides_env_vars() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("PING_COUNT", "8");
        std::env::set_var("TEST_MODE", "true");

        let cli = Cli::parse_from(["tcp-ping", "--count", "12"]);
        let config = ConfigParser::new(cli).parse();

        std::env::remove_var("PING_COUNT");
        std::env::remove_var("TEST_MODE");

        let config = config.unwrap();
        assert_eq!(config.sample_count, 12);
        assert!(config.test_mode);
    }

    #[test]
    fn test_invalid_env_var_is_config_error() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("TIMEOUT_SECONDS", "soon");
        let result = ConfigParser::new(Cli::parse_from(["tcp-ping"])).parse();
        std::env::remove_var("TIMEOUT_SECONDS");

        assert_eq!(result.unwrap_err().category(), "CONFIG");
    }

    #[test]
    fn test_config_summary() {
        let config = Config {
            json_output: Some(PathBuf::from("r.json")),
            ..Default::default()
        };
        let summary = display_config_summary(&config);

        assert!(summary.contains("Region Map: map.json"));
        assert!(summary.contains("Ping Count: 10"));
        assert!(summary.contains("Timeout: 5s"));
        assert!(summary.contains("JSON Output: r.json"));
        assert!(!summary.contains("Report File"));
    }
}
