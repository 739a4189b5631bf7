/// HTTP handlers for image-conversion-service
///
/// - Convert: on-demand resize/transcode of stored images
/// - Health: liveness, readiness and OpenAPI document
pub mod convert;
pub mod health;

use actix_web::web;

use crate::error::AppError;
use crate::metrics::metrics_handler;

pub use convert::convert_image;

/// Register every route. Shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/api/convert-image", web::get().to(convert::convert_image))
    .route("/metrics", web::get().to(metrics_handler))
    .service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health::health))
            .route("/health/ready", web::get().to(health::ready))
            .route("/health/live", web::get().to(health::live))
            .route("/openapi.json", web::get().to(health::openapi_json)),
    );
}
