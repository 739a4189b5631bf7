//! Image conversion services
//!
//! - Fetcher for retrieving source bytes from the blob store
//! - Processor for resizing and encoding
//! - Conversion service coordinating the two
//! - Link builder for callers of the endpoint

pub mod conversion;
pub mod fetcher;
pub mod links;
pub mod processor;

pub use conversion::ImageConversionService;
pub use fetcher::{HttpImageFetcher, ImageSource};
pub use links::ConversionLink;
pub use processor::{fit_inside, ConvertedImage, ImageProcessor, ProcessorConfig};
