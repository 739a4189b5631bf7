use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use async_trait::async_trait;
use bytes::Bytes;
use image::{GenericImageView, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use image_conversion_service::config::FetchConfig;
use image_conversion_service::handlers;
use image_conversion_service::services::{
    HttpImageFetcher, ImageConversionService, ImageProcessor, ImageSource,
};
use image_conversion_service::{AppError, Result};

/// Blob store stand-in that serves one fixed image for every location
struct FixedSource(Option<Bytes>);

#[async_trait]
impl ImageSource for FixedSource {
    async fn fetch(&self, _location: &Url) -> Result<Bytes> {
        self.0
            .clone()
            .ok_or_else(|| AppError::UpstreamFetch("Failed to fetch image: 404 Not Found".into()))
    }
}

fn png_bytes(width: u32, height: u32) -> Bytes {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 77]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    Bytes::from(buf.into_inner())
}

fn conversion_with(source: Arc<dyn ImageSource>) -> web::Data<ImageConversionService> {
    web::Data::new(ImageConversionService::new(
        source,
        Arc::new(ImageProcessor::with_defaults()),
    ))
}

macro_rules! app_with_source {
    ($source:expr) => {
        test::init_service(
            App::new()
                .app_data(conversion_with($source))
                .configure(handlers::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_missing_url_returns_400() {
    let app = app_with_source!(Arc::new(FixedSource(Some(png_bytes(10, 10)))));

    let req = test::TestRequest::get()
        .uri("/api/convert-image?format=png")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing blob URL");
}

#[actix_web::test]
async fn test_invalid_format_returns_400() {
    let app = app_with_source!(Arc::new(FixedSource(Some(png_bytes(10, 10)))));

    for format in ["gif", "bmp", "jpeg", "WEBP"] {
        let uri = format!("/api/convert-image?url=https%3A%2F%2Fstore%2Fimg&format={format}");
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "format={format}");

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid format");
    }
}

#[actix_web::test]
async fn test_inline_response_defaults() {
    let app = app_with_source!(Arc::new(FixedSource(Some(png_bytes(3000, 1500)))));

    let req = test::TestRequest::get()
        .uri("/api/convert-image?url=https%3A%2F%2Fstore%2Fimg123")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers().clone();
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "image/webp");
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "public, max-age=3600");
    assert_eq!(headers.get(header::VARY).unwrap(), "format,size");
    assert!(headers.get(header::CONTENT_DISPOSITION).is_none());

    let body = test::read_body(resp).await;
    assert_eq!(image::guess_format(&body).unwrap(), ImageFormat::WebP);
    let decoded = image::load_from_memory(&body).unwrap();
    assert_eq!(decoded.dimensions(), (1024, 512));
}

#[actix_web::test]
async fn test_download_other_than_true_is_inline() {
    let app = app_with_source!(Arc::new(FixedSource(Some(png_bytes(40, 40)))));

    for value in ["false", "TRUE", "1", ""] {
        let uri = format!(
            "/api/convert-image?url=https%3A%2F%2Fstore%2Fimg&format=jpg&download={value}"
        );
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::CONTENT_DISPOSITION).is_none());
        assert_eq!(resp.headers().get(header::VARY).unwrap(), "format,size");
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/jpeg");
    }
}

#[actix_web::test]
async fn test_small_source_is_not_enlarged() {
    let app = app_with_source!(Arc::new(FixedSource(Some(png_bytes(300, 120)))));

    for size in ["large", "small", "bogus"] {
        let uri = format!("/api/convert-image?url=https%3A%2F%2Fstore%2Fimg&format=png&size={size}");
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        let decoded = image::load_from_memory(&body).unwrap();
        assert_eq!(decoded.dimensions(), (300, 120), "size={size}");
    }
}

#[actix_web::test]
async fn test_unrecognized_size_uses_small_box() {
    let app = app_with_source!(Arc::new(FixedSource(Some(png_bytes(1200, 1600)))));

    let req = test::TestRequest::get()
        .uri("/api/convert-image?url=https%3A%2F%2Fstore%2Fimg&format=png&size=medium")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let (w, h) = image::load_from_memory(&body).unwrap().dimensions();
    assert_eq!((w, h), (384, 512));
}

#[actix_web::test]
async fn test_fetch_failure_returns_generic_500() {
    let app = app_with_source!(Arc::new(FixedSource(None)));

    let req = test::TestRequest::get()
        .uri("/api/convert-image?url=https%3A%2F%2Fstore%2Fmissing")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({"error": "Image conversion failed"}));
}

#[actix_web::test]
async fn test_corrupt_source_returns_generic_500() {
    let app = app_with_source!(Arc::new(FixedSource(Some(Bytes::from_static(b"<html>not an image</html>")))));

    let req = test::TestRequest::get()
        .uri("/api/convert-image?url=https%3A%2F%2Fstore%2Fimg")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Image conversion failed");
}

#[actix_web::test]
async fn test_end_to_end_png_download_via_blob_store() {
    let store = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img123"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(png_bytes(2000, 1000).to_vec()),
        )
        .mount(&store)
        .await;

    let fetcher = HttpImageFetcher::from_config(&FetchConfig::default()).unwrap();
    let app = app_with_source!(Arc::new(fetcher));

    let source = format!("{}/img123", store.uri());
    let uri = format!(
        "/api/convert-image?url={}&format=png&size=small&download=true",
        urlencoding::encode(&source)
    );
    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let headers = resp.headers().clone();
    assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "image/png");
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).unwrap(),
        "attachment; filename=\"generated-image.png\""
    );
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "public, max-age=3600");
    assert!(headers.get(header::VARY).is_none());

    let body = test::read_body(resp).await;
    let decoded = image::load_from_memory_with_format(&body, ImageFormat::Png).unwrap();
    let (w, h) = decoded.dimensions();
    assert!(w <= 512 && h <= 512);
    assert_eq!((w, h), (512, 256));
}

#[actix_web::test]
async fn test_upstream_404_via_blob_store() {
    let store = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("NoSuchKey: img123 secret-bucket"))
        .mount(&store)
        .await;

    let fetcher = HttpImageFetcher::from_config(&FetchConfig::default()).unwrap();
    let app = app_with_source!(Arc::new(fetcher));

    let uri = format!(
        "/api/convert-image?url={}",
        urlencoding::encode(&format!("{}/img123", store.uri()))
    );
    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = test::read_body(resp).await;
    let text = std::str::from_utf8(&body).unwrap();
    assert!(!text.contains("NoSuchKey"));
    assert!(!text.contains("404"));
}

#[actix_web::test]
async fn test_health_and_openapi() {
    let app = app_with_source!(Arc::new(FixedSource(None)));

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");

    let req = test::TestRequest::get().uri("/api/v1/openapi.json").to_request();
    let doc: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert!(doc["paths"]["/api/convert-image"]["get"].is_object());
}
