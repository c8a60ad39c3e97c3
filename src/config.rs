//! Hub configuration.
//!
//! Resolution order: built-in defaults, then an optional TOML file, then
//! environment variables (`APP_NAME`, `TOOLS_CONFIG_PATH`, `API_BASE_URL`,
//! `API_TIMEOUT`). An API base URL takes precedence over a file path.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogSource, FileSource, HttpSource, SourceError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
    #[error("Could not build catalog source: {0}")]
    Source(#[from] SourceError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    File { path: PathBuf },
    Http { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub app_name: String,
    pub request_timeout_secs: u64,
    pub popular_tags_limit: usize,
    // Must stay last: TOML tables follow plain values.
    pub source: SourceConfig,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self::v0()
    }
}

impl HubConfig {
    pub fn v0() -> Self {
        Self {
            app_name: "Tool Hub".into(),
            request_timeout_secs: 30,
            popular_tags_limit: 20,
            source: SourceConfig::File {
                path: PathBuf::from("config/tools.json"),
            },
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Defaults or the given file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::v0(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("APP_NAME") {
            self.app_name = name;
        }
        if let Some(path) = lookup("TOOLS_CONFIG_PATH") {
            self.source = SourceConfig::File { path: path.into() };
        }
        if let Some(base) = lookup("API_BASE_URL") {
            self.source = SourceConfig::Http {
                url: format!("{}/api/tools", base.trim_end_matches('/')),
            };
        }
        if let Some(raw) = lookup("API_TIMEOUT") {
            self.request_timeout_secs =
                raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "API_TIMEOUT".into(),
                    value: raw.clone(),
                })?;
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn build_source(&self) -> Result<Box<dyn CatalogSource>, ConfigError> {
        Ok(match &self.source {
            SourceConfig::File { path } => Box::new(FileSource::new(path.clone())),
            SourceConfig::Http { url } => {
                Box::new(HttpSource::new(url.clone(), self.request_timeout())?)
            }
        })
    }
}
