//! Application configuration management.
//!
//! This module handles loading the application configuration, which holds
//! an optional API base URL and request timeout.
//!
//! Configuration is read from `~/.config/pokedex/config.json` when present.
//! The `POKEDEX_API_URL` environment variable overrides the base URL.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_BASE_URL, REQUEST_TIMEOUT_SECS};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "pokedex";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "POKEDEX_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            Self::parse(&contents).with_context(|| format!("Invalid config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Effective base URL: environment, then config file, then the public API.
    pub fn base_url(&self) -> String {
        self.resolve_base_url(std::env::var(API_URL_ENV).ok())
    }

    fn resolve_base_url(&self, env_override: Option<String>) -> String {
        env_override
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(REQUEST_TIMEOUT_SECS))
    }

    /// Directory for log files. Created on demand by the caller.
    pub fn log_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.resolve_base_url(None), DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(REQUEST_TIMEOUT_SECS));
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::parse(r#"{"request_timeout_secs": 5}"#).unwrap();
        assert_eq!(config.base_url, None);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));

        let config = Config::parse("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Config::parse("not json").is_err());
    }

    #[test]
    fn test_base_url_precedence() {
        let config = Config {
            base_url: Some("http://localhost:8000/api/v2".to_string()),
            request_timeout_secs: None,
        };
        assert_eq!(config.resolve_base_url(None), "http://localhost:8000/api/v2");
        assert_eq!(
            config.resolve_base_url(Some("http://mirror.test/api/v2".to_string())),
            "http://mirror.test/api/v2"
        );
        // Blank override is ignored
        assert_eq!(config.resolve_base_url(Some("  ".to_string())), "http://localhost:8000/api/v2");
    }
}
