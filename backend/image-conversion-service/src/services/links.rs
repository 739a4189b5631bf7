//! Query strings for the conversion endpoint
//!
//! Inline previews and download buttons both point at `/api/convert-image`; this
//! builds those paths so callers never hand-assemble them.

use crate::models::{OutputFormat, SizeTier};

pub const CONVERT_IMAGE_PATH: &str = "/api/convert-image";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionLink {
    source: String,
    format: OutputFormat,
    size: SizeTier,
    download: bool,
}

impl ConversionLink {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            format: OutputFormat::default(),
            size: SizeTier::default(),
            download: false,
        }
    }

    /// Inline WebP preview. Any query string already on the blob URL is dropped.
    pub fn preview(source: &str) -> Self {
        let bare = source.split('?').next().unwrap_or(source);
        Self::new(bare)
            .format(OutputFormat::Webp)
            .size(SizeTier::Large)
    }

    /// Attachment download in the chosen format
    pub fn download(source: &str, format: OutputFormat) -> Self {
        Self::new(source).format(format).attachment(true)
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn size(mut self, size: SizeTier) -> Self {
        self.size = size;
        self
    }

    pub fn attachment(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    pub fn to_path(&self) -> String {
        let mut path = format!(
            "{CONVERT_IMAGE_PATH}?url={}&format={}&size={}",
            urlencoding::encode(&self.source),
            self.format,
            self.size
        );
        if self.download {
            path.push_str("&download=true");
        }
        path
    }
}
