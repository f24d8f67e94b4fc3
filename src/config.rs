// Client configuration

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "TASKSTORE_BASE_URL";
/// Environment variable overriding `token`
pub const ENV_TOKEN: &str = "TASKSTORE_TOKEN";

/// Connection settings for the task backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL the `/tasks` resource hangs off
    pub base_url: String,
    /// Bearer token attached to every request, if set
    pub token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Default config file location: `<config_dir>/taskstore/config.yml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskstore").join("config.yml"))
    }

    /// Load from a YAML file; a missing file yields the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = ?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config =
            serde_yaml::from_str(&content).wrap_err_with(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = ?path, base_url = %config.base_url, "Loaded config");
        Ok(config)
    }

    /// Load from `path` if given, else from [`Config::default_path`]
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) => Self::load(path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Apply explicit overrides (environment or command line); `None` keeps the current value
    pub fn with_overrides(mut self, base_url: Option<String>, token: Option<String>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(token) = token {
            self.token = Some(token);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.token, None);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path().join("nope.yml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_load_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "base_url: https://tasks.example.com/api\ntoken: secret\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "https://tasks.example.com/api");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        fs::write(&path, "timeout_secs: [not, a, number]\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::default().with_overrides(Some("http://other".to_string()), None);
        assert_eq!(config.base_url, "http://other");
        assert_eq!(config.token, None);

        let config = config.with_overrides(None, Some("t".to_string()));
        assert_eq!(config.base_url, "http://other");
        assert_eq!(config.token.as_deref(), Some("t"));
    }
}
