//! Client configuration.
//!
//! Layered, lowest priority first: compiled defaults, the JSON file at
//! `<config_dir>/task-comments/config.json`, environment variables
//! (`COMMENTS_API_URL`, `COMMENTS_LOG_FILE`, `COMMENTS_TIMEOUT_SECS`), then
//! command-line overrides applied by the caller. A missing file is not an
//! error.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// On-disk shape; every field optional so the file can override a subset.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub log_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_file: std::env::temp_dir().join("comments-tui.log"),
        }
    }
}

impl ClientConfig {
    /// Default location of the config file, if a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("task-comments").join("config.json"))
    }

    /// Load defaults, then the config file, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = Self::default_path() {
            config.merge_file(&path)?;
        }
        config.merge_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Overlay values from a JSON file. Missing files are skipped.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            return Ok(());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(url) = file.api_base_url {
            self.api_base_url = url;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(log_file) = file.log_file {
            self.log_file = log_file;
        }
        Ok(())
    }

    /// Overlay values from environment variables, read through `lookup`.
    pub fn merge_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("COMMENTS_API_URL").filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(path) = lookup("COMMENTS_LOG_FILE").filter(|v| !v.is_empty()) {
            self.log_file = PathBuf::from(path);
        }
        if let Some(secs) = lookup("COMMENTS_TIMEOUT_SECS").filter(|v| !v.is_empty()) {
            self.request_timeout_secs = secs.parse().map_err(|_| ConfigError::InvalidValue {
                name: "COMMENTS_TIMEOUT_SECS",
                value: secs,
            })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
