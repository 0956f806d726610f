//! Console configuration
//!
//! Values are layered: built-in defaults, then `config.yaml` in the config
//! directory, then `FERP_*` environment variables. Command-line flags are
//! applied last by the CLI.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default backend address
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Errors loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL
    pub api_url: String,

    /// Rows per list page
    pub page_size: u32,

    /// How long cached responses stay fresh
    pub cache_ttl_secs: u64,

    /// Quiet period before a search fires
    pub debounce_ms: u64,

    /// Upper bound on autocomplete candidates fetched up front
    pub candidate_limit: u32,

    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 10,
            cache_ttl_secs: 300,
            debounce_ms: 300,
            candidate_limit: 1000,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Directory holding `config.yaml` and the saved session
    ///
    /// `FERP_CONFIG_DIR` overrides the platform default.
    pub fn config_dir() -> Option<PathBuf> {
        if let Some(dir) = std::env::var_os("FERP_CONFIG_DIR").filter(|d| !d.is_empty()) {
            return Some(PathBuf::from(dir));
        }
        ProjectDirs::from("com", "fabric-erp", "ferp").map(|d| d.config_dir().to_path_buf())
    }

    /// Load configuration from all sources
    ///
    /// Callers that must keep working with a broken file fall back to
    /// [`Config::from_env`] and report the error once logging is up.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::config_dir().map(|d| d.join("config.yaml")) {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Defaults with only the environment layered on top
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Load a single config file on top of the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("FERP_API_URL") {
            if !url.trim().is_empty() {
                self.api_url = url;
            }
        }
        if let Ok(level) = std::env::var("FERP_LOG") {
            if !level.trim().is_empty() {
                self.log_level = level;
            }
        }
    }

    /// Location of the persisted session
    pub fn session_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("session.yaml"))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.candidate_limit, 1000);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "api_url: https://erp.example\npage_size: 25\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, "https://erp.example");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.debounce_ms, 300);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "page_size: [").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_empty_file_is_default() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "").unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
