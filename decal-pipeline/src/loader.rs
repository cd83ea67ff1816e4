//! Font loading — one fetch, one resource, no retries.
//!
//! Transport lives behind [`FontFetcher`] so the pipeline can run against
//! HTTP, local files, or injected bytes. The loader itself is consumed by
//! `load`, which makes "exactly one fetch attempt per process" a
//! compile-time property rather than a runtime flag.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use decal_text::{FontError, FontResource, FontStyle};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {0}")]
    Status(u16),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Fetch unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Font fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("Font rejected: {0}")]
    Font(#[from] FontError),
}

/// The external resource provider: returns the full font payload or fails.
/// No partial or streamed delivery.
#[async_trait]
pub trait FontFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP transport over reqwest.
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self { http: reqwest::Client::new() }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FontFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        // Fully buffered: the resource is atomic or absent.
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Local-file transport, for development and headless runs.
pub struct FileFetcher;

#[async_trait]
impl FontFetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        Ok(tokio::fs::read(url).await?)
    }
}

/// Injected payload, for tests: succeeds with fixed bytes or always fails.
pub struct InMemoryFetcher {
    payload: Result<Vec<u8>, String>,
}

impl InMemoryFetcher {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { payload: Ok(bytes) }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self { payload: Err(message.into()) }
    }
}

#[async_trait]
impl FontFetcher for InMemoryFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        match &self.payload {
            Ok(bytes) => Ok(bytes.clone()),
            Err(message) => Err(FetchError::Unavailable(message.clone())),
        }
    }
}

/// Declared identity of the font asset being fetched.
#[derive(Clone, Debug)]
pub struct FontSpec {
    pub family: String,
    pub weight: u16,
    pub style: FontStyle,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Roboto".into(),
            weight: 400,
            style: FontStyle::Normal,
        }
    }
}

/// One-shot font loader. Failure is terminal: the caller surfaces it as a
/// persistent loading-error state, it is never retried automatically.
pub struct FontLoader {
    spec: FontSpec,
    fetcher: Arc<dyn FontFetcher>,
}

impl FontLoader {
    pub fn new(spec: FontSpec, fetcher: Arc<dyn FontFetcher>) -> Self {
        Self { spec, fetcher }
    }

    /// Fetch and validate the font. Consumes the loader.
    pub async fn load(self, url: &str) -> Result<FontResource, LoadError> {
        log::info!("Fetching font '{}' from {url}", self.spec.family);
        let bytes = self.fetcher.fetch(url).await?;
        let resource =
            FontResource::from_bytes(self.spec.family, self.spec.weight, self.spec.style, bytes)?;
        Ok(resource)
    }
}

// ===================================================================
// Tests
// ===================================================================
