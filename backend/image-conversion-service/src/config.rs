/// Configuration management for image-conversion-service
///
/// Loads configuration from environment variables with sensible defaults.
/// Built once at startup and shared with handlers through `web::Data`.
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub fetch: FetchConfig,
    pub encoding: EncodingConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

/// Outbound fetch of source images from the blob store
#[derive(Clone, Debug, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_source_bytes: usize,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EncodingConfig {
    pub jpeg_quality: u8,
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid value for {key}: {value:?}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 5,
            max_source_bytes: 25 * 1024 * 1024,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self { jpeg_quality: 80 }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let fetch_defaults = FetchConfig::default();
        let encoding_defaults = EncodingConfig::default();

        let jpeg_quality: u8 = parse_var("IMAGE_JPEG_QUALITY", encoding_defaults.jpeg_quality)?;

        Ok(Config {
            app: AppConfig {
                host: std::env::var("IMAGE_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("IMAGE_SERVICE_PORT", 8080)?,
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            },
            fetch: FetchConfig {
                timeout_secs: parse_var("IMAGE_FETCH_TIMEOUT_SECS", fetch_defaults.timeout_secs)?,
                connect_timeout_secs: parse_var(
                    "IMAGE_FETCH_CONNECT_TIMEOUT_SECS",
                    fetch_defaults.connect_timeout_secs,
                )?,
                max_source_bytes: parse_var(
                    "IMAGE_MAX_SOURCE_BYTES",
                    fetch_defaults.max_source_bytes,
                )?,
            },
            encoding: EncodingConfig {
                jpeg_quality: jpeg_quality.clamp(1, 100),
            },
        })
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError {
        key,
        value: raw.to_string(),
    })
}
