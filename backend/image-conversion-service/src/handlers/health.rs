use actix_web::HttpResponse;
use utoipa::OpenApi;

use crate::openapi::ApiDoc;

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}

pub async fn ready() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn live() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .json(ApiDoc::openapi())
}
