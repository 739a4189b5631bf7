//! Image processor - resizes and transcodes source images
//!
//! Decodes the original, shrinks it to fit inside a bounding box while keeping the
//! aspect ratio (never enlarging), and encodes it as WebP, JPEG or PNG.
//!
//! Uses `spawn_blocking` for CPU-intensive operations to avoid blocking the async runtime.

use crate::error::{AppError, Result};
use crate::models::{BoundingBox, OutputFormat};
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::sync::Arc;
use tracing::debug;

/// Configuration for encoding
#[derive(Clone, Debug)]
pub struct ProcessorConfig {
    /// JPEG quality (1-100)
    pub jpeg_quality: u8,
    /// Resampling filter used when shrinking
    pub filter: FilterType,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 80,
            filter: FilterType::Lanczos3,
        }
    }
}

/// Result of a conversion
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    /// Encoded image data
    pub data: Bytes,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub original_width: u32,
    pub original_height: u32,
}

impl ConvertedImage {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Image processor
pub struct ImageProcessor {
    config: ProcessorConfig,
}

impl ImageProcessor {
    /// Create a new processor with the given configuration
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    /// Create a processor with default configuration
    pub fn with_defaults() -> Self {
        Self::new(ProcessorConfig::default())
    }

    /// Convert the given image data (blocking version)
    ///
    /// **Note:** This method performs CPU-intensive operations and should not be called
    /// directly from async code. Use `process_async` instead.
    pub fn process(
        &self,
        original_data: &[u8],
        format: OutputFormat,
        bounds: BoundingBox,
    ) -> Result<ConvertedImage> {
        let img = image::load_from_memory(original_data)
            .map_err(|e| AppError::Decode(e.to_string()))?;

        let (orig_w, orig_h) = img.dimensions();
        debug!(
            original_width = orig_w,
            original_height = orig_h,
            target_format = %format,
            "Processing image for conversion"
        );

        let (new_w, new_h) = fit_inside(orig_w, orig_h, bounds);

        let resized = if (new_w, new_h) == (orig_w, orig_h) {
            debug!("Image already within bounds, encoding as-is");
            img
        } else {
            img.resize_exact(new_w, new_h, self.config.filter)
        };

        let data = self.encode(&resized, format)?;

        debug!(
            width = new_w,
            height = new_h,
            size = data.len(),
            "Image converted"
        );

        Ok(ConvertedImage {
            data,
            format,
            width: new_w,
            height: new_h,
            original_width: orig_w,
            original_height: orig_h,
        })
    }

    /// Convert asynchronously using a blocking thread pool
    ///
    /// # Example
    /// ```ignore
    /// let processor = Arc::new(ImageProcessor::with_defaults());
    /// let result = processor
    ///     .process_async(bytes, OutputFormat::Webp, SizeTier::Large.bounds())
    ///     .await?;
    /// ```
    pub async fn process_async(
        self: Arc<Self>,
        original_data: Bytes,
        format: OutputFormat,
        bounds: BoundingBox,
    ) -> Result<ConvertedImage> {
        tokio::task::spawn_blocking(move || self.process(&original_data, format, bounds))
            .await
            .map_err(|e| AppError::Internal(format!("Conversion task panicked: {e}")))?
    }

    fn encode(&self, img: &DynamicImage, format: OutputFormat) -> Result<Bytes> {
        let mut buf = Vec::new();

        let written = match format {
            // JPEG has no alpha channel and no 16-bit support
            OutputFormat::Jpg => {
                let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(
                    &mut buf,
                    self.config.jpeg_quality,
                ))
            }
            // The WebP encoder only takes 8-bit buffers
            OutputFormat::Webp => {
                let eight_bit = if img.color().has_alpha() {
                    DynamicImage::ImageRgba8(img.to_rgba8())
                } else {
                    DynamicImage::ImageRgb8(img.to_rgb8())
                };
                eight_bit.write_with_encoder(WebPEncoder::new_lossless(&mut buf))
            }
            OutputFormat::Png => match img {
                DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                    DynamicImage::ImageRgba16(img.to_rgba16())
                        .write_with_encoder(PngEncoder::new(&mut buf))
                }
                _ => img.write_with_encoder(PngEncoder::new(&mut buf)),
            },
        };
        written.map_err(|e| AppError::Encode(format!("{format}: {e}")))?;

        Ok(Bytes::from(buf))
    }
}

/// Dimensions after a fit-inside resize without enlargement.
///
/// Images already inside the box keep their size. Otherwise the image is scaled by
/// the tighter of the two axis ratios, so one axis lands on the box edge.
pub fn fit_inside(width: u32, height: u32, bounds: BoundingBox) -> (u32, u32) {
    if width <= bounds.width && height <= bounds.height {
        return (width, height);
    }

    let scale_w = bounds.width as f64 / width as f64;
    let scale_h = bounds.height as f64 / height as f64;

    if scale_w <= scale_h {
        let h = (height as f64 * scale_w).round() as u32;
        (bounds.width, h.clamp(1, bounds.height))
    } else {
        let w = (width as f64 * scale_h).round() as u32;
        (w.clamp(1, bounds.width), bounds.height)
    }
}
