//! Prometheus metrics for image conversion

use actix_web::HttpResponse;
use prometheus::{Encoder, Histogram, HistogramVec, IntCounterVec, TextEncoder};

lazy_static::lazy_static! {
    pub static ref IMAGE_CONVERSIONS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "image_conversions_total",
        "Image conversions by target format, size tier and outcome",
        &["format", "size", "outcome"]
    ).unwrap();

    pub static ref IMAGE_CONVERSION_DURATION_SECONDS: HistogramVec = prometheus::register_histogram_vec!(
        "image_conversion_duration_seconds",
        "Time spent fetching, resizing and encoding one image",
        &["format"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();

    pub static ref IMAGE_SOURCE_BYTES: Histogram = prometheus::register_histogram!(
        "image_source_bytes",
        "Size of source images before conversion",
        prometheus::exponential_buckets(16_384.0, 4.0, 8).unwrap()
    ).unwrap();

    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = prometheus::register_int_counter_vec!(
        "http_requests_total",
        "Total HTTP requests",
        &["method", "path", "status"]
    ).unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = prometheus::register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latency",
        &["method", "path", "status"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    ).unwrap();
}

pub fn record_conversion(format: &str, size: &str, outcome: &str, elapsed_secs: f64) {
    IMAGE_CONVERSIONS_TOTAL
        .with_label_values(&[format, size, outcome])
        .inc();
    IMAGE_CONVERSION_DURATION_SECONDS
        .with_label_values(&[format])
        .observe(elapsed_secs);
}

/// `GET /metrics`
pub async fn metrics_handler() -> HttpResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
