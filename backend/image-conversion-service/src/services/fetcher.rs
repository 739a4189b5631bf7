//! Source image retrieval
//!
//! The blob store is reached over plain HTTP GET. The trait keeps the conversion
//! pipeline independent from the transport so tests can feed bytes directly.

use crate::config::FetchConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// Anything that can hand back the raw encoded bytes stored at a location
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, location: &Url) -> Result<Bytes>;
}

/// reqwest-backed fetcher with bounded time and size
pub struct HttpImageFetcher {
    http_client: Client,
    max_bytes: usize,
}

impl HttpImageFetcher {
    pub fn from_config(cfg: &FetchConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(cfg.timeout())
            .connect_timeout(cfg.connect_timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        info!(
            timeout_secs = cfg.timeout_secs,
            max_source_bytes = cfg.max_source_bytes,
            "Image fetcher initialized"
        );

        Ok(Self {
            http_client,
            max_bytes: cfg.max_source_bytes,
        })
    }

    fn too_large(&self, size: u64) -> AppError {
        AppError::UpstreamFetch(format!(
            "Source image is {size} bytes, limit is {}",
            self.max_bytes
        ))
    }
}

#[async_trait]
impl ImageSource for HttpImageFetcher {
    async fn fetch(&self, location: &Url) -> Result<Bytes> {
        let response = self
            .http_client
            .get(location.clone())
            .send()
            .await
            .map_err(|e| AppError::UpstreamFetch(format!("Request to {location} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UpstreamFetch(format!(
                "Failed to fetch image: {status}"
            )));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes as u64 {
                return Err(self.too_large(len));
            }
        }

        // Content-Length can be absent or wrong, so the limit is enforced while reading
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large((body.len() + chunk.len()) as u64));
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url = %location, bytes = body.len(), "Fetched source image");
        Ok(Bytes::from(body))
    }
}
