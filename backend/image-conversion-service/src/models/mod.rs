/// Data models for image-conversion-service
///
/// This module defines structures for:
/// - Query: raw, untrusted query-string parameters
/// - ConversionRequest: validated parameters for one conversion
/// - ImagePayload: an image delta resolved to a location or inline bytes
///
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use url::Url;
use utoipa::IntoParams;

use crate::error::AppError;

// ========================================
// Output format & size tier
// ========================================

/// Target encoding for the converted image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Webp,
    Jpg,
    Png,
}

impl OutputFormat {
    /// Query-string / file-extension spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Webp => "webp",
            Self::Jpg => "jpg",
            Self::Png => "png",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Webp => "image/webp",
            Self::Jpg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Filename used for attachment downloads
    pub fn download_filename(&self) -> String {
        format!("generated-image.{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "webp" => Ok(Self::Webp),
            "jpg" => Ok(Self::Jpg),
            "png" => Ok(Self::Png),
            _ => Err(AppError::BadRequest("Invalid format".to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounding box a converted image must fit inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub width: u32,
    pub height: u32,
}

/// Named bounding box selected by the `size` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeTier {
    #[default]
    Large,
    Small,
}

impl SizeTier {
    /// Any value other than `large` selects the small tier.
    pub fn parse_lenient(s: &str) -> Self {
        if s == "large" {
            Self::Large
        } else {
            Self::Small
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::Small => "small",
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        match self {
            Self::Large => BoundingBox {
                width: 1024,
                height: 1024,
            },
            Self::Small => BoundingBox {
                width: 512,
                height: 512,
            },
        }
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ========================================
// Request models
// ========================================

/// Query parameters accepted by `GET /api/convert-image`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConvertImageQuery {
    /// Absolute http(s) URL of the stored original image
    pub url: Option<String>,
    /// Target format: `webp` (default), `jpg` or `png`
    pub format: Option<String>,
    /// `large` (default, 1024x1024 box); any other value selects 512x512
    pub size: Option<String>,
    /// Exactly `true` returns the image as an attachment
    pub download: Option<String>,
}

/// Validated conversion parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub source: Url,
    pub format: OutputFormat,
    pub size: SizeTier,
    pub download: bool,
}

impl TryFrom<ConvertImageQuery> for ConversionRequest {
    type Error = AppError;

    fn try_from(query: ConvertImageQuery) -> Result<Self, Self::Error> {
        let raw_url = query
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| AppError::BadRequest("Missing blob URL".to_string()))?;

        let format = match query.format.as_deref() {
            None | Some("") => OutputFormat::default(),
            Some(f) => f.parse()?,
        };

        let source = parse_source_url(&raw_url)?;

        let size = match query.size.as_deref() {
            None | Some("") => SizeTier::default(),
            Some(s) => SizeTier::parse_lenient(s),
        };

        Ok(Self {
            source,
            format,
            size,
            download: query.download.as_deref() == Some("true"),
        })
    }
}

fn parse_source_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw).map_err(|_| AppError::BadRequest("Invalid blob URL".to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(AppError::BadRequest("Invalid blob URL".to_string())),
    }
}

// ========================================
// Image payload
// ========================================

/// An image delta as produced by the generation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    /// Already uploaded to the blob store
    ByLocation(Url),
    /// Raw encoded bytes carried in the payload itself
    ByInlineData(Bytes),
}

impl ImagePayload {
    /// Resolve a loosely typed delta: `{"url": "..."}` or a base64 string.
    pub fn from_stream_value(value: &serde_json::Value) -> Result<Self, AppError> {
        match value {
            serde_json::Value::Object(map) => match map.get("url") {
                Some(serde_json::Value::String(raw)) => {
                    Ok(Self::ByLocation(parse_source_url(raw)?))
                }
                _ => Err(AppError::BadRequest(
                    "Image payload object has no url".to_string(),
                )),
            },
            serde_json::Value::String(encoded) => BASE64
                .decode(encoded.trim())
                .map(|data| Self::ByInlineData(Bytes::from(data)))
                .map_err(|e| AppError::BadRequest(format!("Invalid inline image data: {e}"))),
            _ => Err(AppError::BadRequest(
                "Unsupported image payload".to_string(),
            )),
        }
    }
}
