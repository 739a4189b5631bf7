//! Conversion pipeline: fetch -> decode/resize -> encode
//!
//! Stateless. Each call owns its bytes from fetch to response, so any number of
//! conversions can run concurrently.

use crate::error::Result;
use crate::metrics;
use crate::models::{ConversionRequest, ImagePayload, OutputFormat, SizeTier};
use crate::services::fetcher::ImageSource;
use crate::services::processor::{ConvertedImage, ImageProcessor};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Coordinates the blob-store fetch with the blocking image processor
#[derive(Clone)]
pub struct ImageConversionService {
    source: Arc<dyn ImageSource>,
    processor: Arc<ImageProcessor>,
}

impl ImageConversionService {
    pub fn new(source: Arc<dyn ImageSource>, processor: Arc<ImageProcessor>) -> Self {
        Self { source, processor }
    }

    /// Convert the image referenced by a validated request
    pub async fn convert(&self, request: &ConversionRequest) -> Result<ConvertedImage> {
        self.convert_payload(
            ImagePayload::ByLocation(request.source.clone()),
            request.format,
            request.size,
        )
        .await
    }

    /// Convert an image delta. Inline data skips the fetch.
    #[instrument(skip_all, fields(format = %format, size = %size))]
    pub async fn convert_payload(
        &self,
        payload: ImagePayload,
        format: OutputFormat,
        size: SizeTier,
    ) -> Result<ConvertedImage> {
        let start = Instant::now();
        let result = self.run(payload, format, size).await;
        let elapsed = start.elapsed().as_secs_f64();

        let outcome = match &result {
            Ok(converted) => {
                info!(
                    width = converted.width,
                    height = converted.height,
                    bytes = converted.len(),
                    elapsed_ms = (elapsed * 1000.0) as u64,
                    "Image conversion completed"
                );
                "success"
            }
            Err(e) => e.kind(),
        };
        metrics::record_conversion(format.as_str(), size.as_str(), outcome, elapsed);

        result
    }

    async fn run(
        &self,
        payload: ImagePayload,
        format: OutputFormat,
        size: SizeTier,
    ) -> Result<ConvertedImage> {
        let original = match payload {
            ImagePayload::ByLocation(location) => self.source.fetch(&location).await?,
            ImagePayload::ByInlineData(data) => data,
        };
        metrics::IMAGE_SOURCE_BYTES.observe(original.len() as f64);

        self.processor
            .clone()
            .process_async(original, format, size.bounds())
            .await
    }
}
