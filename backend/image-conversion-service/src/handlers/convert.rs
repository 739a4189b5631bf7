/// Image conversion handler - `GET /api/convert-image`
use actix_web::http::header;
use actix_web::{web, HttpResponse};

use crate::error::{ErrorBody, Result};
use crate::models::{ConversionRequest, ConvertImageQuery};
use crate::services::{ConvertedImage, ImageConversionService};

pub const CACHE_CONTROL_VALUE: &str = "public, max-age=3600";
pub const VARY_VALUE: &str = "format,size";

/// Fetch, resize and transcode a stored image
#[utoipa::path(
    get,
    path = "/api/convert-image",
    tag = "images",
    params(ConvertImageQuery),
    responses(
        (status = 200, description = "Converted image bytes (image/webp, image/jpeg or image/png)", content_type = "image/webp"),
        (status = 400, description = "Missing or invalid url / format", body = ErrorBody),
        (status = 500, description = "Fetch, decode or encode failure", body = ErrorBody)
    )
)]
pub async fn convert_image(
    service: web::Data<ImageConversionService>,
    query: web::Query<ConvertImageQuery>,
) -> Result<HttpResponse> {
    let request = ConversionRequest::try_from(query.into_inner())?;
    let converted = service.convert(&request).await?;

    Ok(image_response(&request, converted))
}

fn image_response(request: &ConversionRequest, converted: ConvertedImage) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    builder
        .insert_header((header::CONTENT_TYPE, converted.content_type()))
        .insert_header((header::CACHE_CONTROL, CACHE_CONTROL_VALUE));

    if request.download {
        builder.insert_header((
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                request.format.download_filename()
            ),
        ));
    } else {
        builder.insert_header((header::VARY, VARY_VALUE));
    }

    builder.body(converted.data)
}
