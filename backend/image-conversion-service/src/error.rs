/// Error types for the image conversion service
///
/// Client-side problems carry their message back to the caller. Everything that
/// goes wrong after validation (fetch, decode, encode) is logged with its cause
/// and surfaced as a generic message.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

/// Result type for image-conversion-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Message returned to callers for any server-side failure
pub const GENERIC_FAILURE_MESSAGE: &str = "Image conversion failed";

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request parameters failed validation
    #[error("{0}")]
    BadRequest(String),

    /// Source image could not be retrieved
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetch(String),

    /// Source bytes are not a decodable image
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Resized image could not be written in the target format
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body: `{ "error": "<message>" }`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    /// Whether the failure is the caller's fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::BadRequest(_))
    }

    /// Metric label for the failure class
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "bad_request",
            AppError::UpstreamFetch(_) => "upstream_fetch",
            AppError::Decode(_) => "decode",
            AppError::Encode(_) => "encode",
            AppError::Internal(_) => "internal",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamFetch(_)
            | AppError::Decode(_)
            | AppError::Encode(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_client_error() {
            self.to_string()
        } else {
            tracing::error!(error = %self, kind = self.kind(), "Image conversion error");
            GENERIC_FAILURE_MESSAGE.to_string()
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { error: message })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::UpstreamFetch(err.to_string())
    }
}
