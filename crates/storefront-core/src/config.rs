//! Configuration management for storefront.
//!
//! Loads configuration from ${STOREFRONT_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// Embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for storefront configuration and state directories.
    //!
    //! STOREFRONT_HOME resolution order:
    //! 1. STOREFRONT_HOME environment variable (if set)
    //! 2. ~/.config/storefront (default)

    use std::path::PathBuf;

    /// Returns the storefront home directory.
    pub fn storefront_home() -> PathBuf {
        if let Ok(home) = std::env::var("STOREFRONT_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".storefront"),
            |h| h.join(".config").join("storefront"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        storefront_home().join("config.toml")
    }

    /// Directory holding the persisted session blob.
    pub fn state_dir() -> PathBuf {
        storefront_home().join("state")
    }

    /// Directory for log files.
    pub fn logs_dir() -> PathBuf {
        storefront_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the catalog/auth API
    pub base_url: String,

    /// Items per page for the unfiltered listing
    pub page_size: u32,

    /// Per-request timeout in seconds (0 disables)
    pub request_timeout_secs: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            page_size: Self::DEFAULT_PAGE_SIZE,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub const DEFAULT_BASE_URL: &str = "https://dummyjson.com";
    pub const DEFAULT_PAGE_SIZE: u32 = 10;
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;

    /// Environment variable that overrides `base_url`.
    pub const BASE_URL_ENV: &str = "STOREFRONT_BASE_URL";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        fs::write(path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Resolves the API base URL with precedence: env > config > default.
    ///
    /// # Errors
    /// Returns an error if the chosen URL is not a valid absolute URL.
    pub fn effective_base_url(&self) -> Result<url::Url> {
        let env_url = std::env::var(Self::BASE_URL_ENV).ok();
        let chosen = [env_url.as_deref(), Some(self.base_url.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(Self::DEFAULT_BASE_URL);

        url::Url::parse(chosen).with_context(|| format!("Invalid API base URL: {chosen}"))
    }

    pub fn page_size(&self) -> u32 {
        if self.page_size == 0 {
            Self::DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.base_url, Config::DEFAULT_BASE_URL);
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_size = 25\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.page_size(), 25);
        assert_eq!(config.base_url, Config::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_zero_values_fall_back() {
        let config = Config {
            page_size: 0,
            request_timeout_secs: 0,
            ..Config::default()
        };

        assert_eq!(config.page_size(), Config::DEFAULT_PAGE_SIZE);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "page_size = \"many\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_init_writes_template_once() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Config::init(&path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("base_url ="));
        assert!(contents.contains("page_size = 10"));

        let err = Config::init(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let parsed: Config = toml::from_str(default_config_template()).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.base_url, defaults.base_url);
        assert_eq!(parsed.page_size, defaults.page_size);
        assert_eq!(parsed.request_timeout_secs, defaults.request_timeout_secs);
    }

    #[test]
    fn test_config_base_url_used_when_valid() {
        // STOREFRONT_BASE_URL is not set under `cargo test` unless the caller exports it.
        if std::env::var(Config::BASE_URL_ENV).is_ok() {
            return;
        }
        let config = Config {
            base_url: "http://127.0.0.1:9/api".to_string(),
            ..Config::default()
        };
        let url = config.effective_base_url().unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9/api");

        let broken = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(broken.effective_base_url().is_err());
    }
}
