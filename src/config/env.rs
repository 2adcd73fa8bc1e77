//! Environment variable handling and .env file management

use crate::error::{ErrorContext, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    ///
    /// Returns whether a file was loaded. Variables already present in the
    /// process environment are not overwritten.
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(Path::new(".env"))
    }

    /// Load a specific env file if it exists
    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        dotenv::from_path(path).with_context(|| format!("Failed to load {}", path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_env_file() {
        let dir = TempDir::new().unwrap();
        assert!(!EnvManager::load_env_file_from(&dir.path().join(".env")).unwrap());
    }

    #[test]
    fn test_load_env_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "TCP_PING_ENV_TEST_MARKER=loaded\n").unwrap();

        assert!(EnvManager::load_env_file_from(&path).unwrap());
        assert_eq!(std::env::var("TCP_PING_ENV_TEST_MARKER").unwrap(), "loaded");
    }

    #[test]
    fn test_malformed_env_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "TCP_PING_BROKEN='unterminated\n").unwrap();

        let error = EnvManager::load_env_file_from(&path).unwrap_err();
        assert_eq!(error.category(), "CONFIG");
        assert!(error.to_string().contains(".env"));
    }
}
