use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::time::Duration;
use url::Url;

use crate::config::Config;
use crate::error::LoadError;

/// Where content documents come from. One fetch per document per page
/// lifecycle; implementations never retry.
#[async_trait]
pub trait Source: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch(&self, path: &str) -> Result<String, LoadError>;
}

/// Documents read from a directory on disk.
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Source for FileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.root.display())
    }

    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        let full = self.root.join(path.trim_start_matches("./"));
        tokio::fs::read_to_string(&full).await.map_err(|source| LoadError::Io {
            path: full.display().to_string(),
            source,
        })
    }
}

/// Documents fetched over HTTP, relative to a base URL.
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: &str, timeout_secs: u64) -> Result<Self, LoadError> {
        // Url::join replaces the last segment unless the base ends in '/'.
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = Url::parse(&normalized).map_err(|_| LoadError::InvalidLocation {
            base: base.to_string(),
            path: String::new(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LoadError::Transport {
                path: base.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { client, base })
    }

    pub fn resolve(&self, path: &str) -> Result<Url, LoadError> {
        self.base
            .join(path.trim_start_matches("./"))
            .map_err(|_| LoadError::InvalidLocation {
                base: self.base.to_string(),
                path: path.to_string(),
            })
    }
}

#[async_trait]
impl Source for HttpSource {
    fn describe(&self) -> String {
        self.base.to_string()
    }

    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        let url = self.resolve(path)?;
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| LoadError::Transport {
                path: url.to_string(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Http {
                path: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(|e| LoadError::Transport {
            path: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// In-memory documents keyed by path. Used for built-in samples and tests.
#[derive(Default)]
pub struct MemorySource {
    docs: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, body: impl Into<String>) -> Self {
        self.docs.insert(path.to_string(), body.into());
        self
    }
}

#[async_trait]
impl Source for MemorySource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn fetch(&self, path: &str) -> Result<String, LoadError> {
        self.docs
            .get(path.trim_start_matches("./"))
            .cloned()
            .ok_or_else(|| LoadError::Io {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such document"),
            })
    }
}

pub fn source_from_config(cfg: &Config) -> Result<Box<dyn Source>, LoadError> {
    match &cfg.base_url {
        Some(base) => Ok(Box::new(HttpSource::new(base, cfg.fetch_timeout_secs)?)),
        None => Ok(Box::new(FileSource::new(cfg.data_dir.clone()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_resolve_relative_path() {
        let src = HttpSource::new("https://club.example.org/site", 5).unwrap();
        let url = src.resolve("./data/events.json").unwrap();
        assert_eq!(url.as_str(), "https://club.example.org/site/data/events.json");
    }

    #[test]
    fn test_http_rejects_bad_base() {
        assert!(matches!(
            HttpSource::new("not a url", 5),
            Err(LoadError::InvalidLocation { .. })
        ));
    }

    #[tokio::test]
    async fn test_memory_source_missing_is_io_error() {
        let src = MemorySource::new().with("a.json", "{}");
        assert_eq!(src.fetch("./a.json").await.unwrap(), "{}");
        assert!(matches!(src.fetch("b.json").await, Err(LoadError::Io { .. })));
    }

    #[tokio::test]
    async fn test_file_source_reads_from_root() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("x.json"), r#"{"x": []}"#).unwrap();
        let src = FileSource::new(dir.path());
        assert_eq!(src.fetch("x.json").await.unwrap(), r#"{"x": []}"#);
        assert!(src.fetch("missing.json").await.is_err());
    }
}
