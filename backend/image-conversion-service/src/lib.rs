//! Image Conversion Service
//!
//! Stateless HTTP service that fetches stored generated images and returns them
//! resized to a size tier and transcoded to WebP, JPEG or PNG.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod services;

// Public re-exports
pub use config::Config;
pub use error::{AppError, Result};
