//! Where the renderer gets its manifest from.
//!
//! The render step takes a [`ManifestSource`] rather than touching the
//! filesystem or network itself, so the transforms stay testable with an
//! in-memory manifest. Every failure here degrades to the placeholder page
//! at the render boundary; nothing propagates further.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::manifest::Manifest;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("manifest request to {url} failed: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    #[error("manifest request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("could not read manifest at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("manifest is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Supplies the manifest the dashboard renders from.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    async fn fetch(&self) -> Result<Manifest, FetchError>;
}

/// Reads the manifest from the local deploy directory.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ManifestSource for FileSource {
    async fn fetch(&self) -> Result<Manifest, FetchError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Read {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Fetches the manifest from a published dashboard over HTTP.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ManifestSource for HttpSource {
    async fn fetch(&self) -> Result<Manifest, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|source| FetchError::Request {
                url: self.url.clone(),
                source,
            })?;
        Ok(serde_json::from_str(&text)?)
    }
}
