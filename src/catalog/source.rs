use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::ToolRecord;

/// Everything that can go wrong while reading a catalog.
///
/// All variants are reported to callers as "source unavailable"; the variant
/// only exists for diagnostics.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unexpected catalog shape: {0}")]
    Shape(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    /// Picks the format from a path or URL suffix. Unknown suffixes are JSON.
    pub fn from_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        let trimmed = lower.split(['?', '#']).next().unwrap_or_default();
        if trimmed.ends_with(".yaml") || trimmed.ends_with(".yml") {
            CatalogFormat::Yaml
        } else {
            CatalogFormat::Json
        }
    }
}

/// Undecoded catalog bytes as returned by a source.
#[derive(Debug, Clone)]
pub struct RawCatalog {
    pub bytes: Vec<u8>,
    pub format: CatalogFormat,
}

/// A place tool records come from.
///
/// Implementations:
/// - `FileSource`: local JSON or YAML file
/// - `HttpSource`: JSON or YAML served over HTTP
/// - `StaticSource`: in-memory bytes
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Human-readable origin, used in logs and snapshots.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<RawCatalog, SourceError>;
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn fetch(&self) -> Result<RawCatalog, SourceError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        let format = CatalogFormat::from_name(&self.path.to_string_lossy());
        Ok(RawCatalog { bytes, format })
    }
}

pub struct HttpSource {
    url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<RawCatalog, SourceError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?.to_vec();
        Ok(RawCatalog {
            bytes,
            format: CatalogFormat::from_name(&self.url),
        })
    }
}

/// Serves fixed bytes. Useful for embedding a catalog and for tests.
pub struct StaticSource {
    bytes: Vec<u8>,
    format: CatalogFormat,
}

impl StaticSource {
    pub fn new(bytes: impl Into<Vec<u8>>, format: CatalogFormat) -> Self {
        Self {
            bytes: bytes.into(),
            format,
        }
    }

    pub fn json(text: impl Into<String>) -> Self {
        Self::new(text.into().into_bytes(), CatalogFormat::Json)
    }

    pub fn from_records(records: &[ToolRecord]) -> Result<Self, SourceError> {
        let bytes = serde_json::to_vec(records)?;
        Ok(Self::new(bytes, CatalogFormat::Json))
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    fn describe(&self) -> String {
        "static".to_string()
    }

    async fn fetch(&self) -> Result<RawCatalog, SourceError> {
        Ok(RawCatalog {
            bytes: self.bytes.clone(),
            format: self.format,
        })
    }
}
