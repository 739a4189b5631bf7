/// OpenAPI documentation for the image conversion service
use utoipa::OpenApi;

use crate::error::ErrorBody;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Image Conversion Service API",
        version = "1.0.0",
        description = "On-demand resize and transcode of generated images. Fetches the stored original, fits it inside a size tier without enlarging it, and returns WebP, JPEG or PNG with HTTP caching headers.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    paths(crate::handlers::convert::convert_image),
    components(schemas(ErrorBody)),
    tags(
        (name = "images", description = "Image format and size conversion"),
    ),
)]
pub struct ApiDoc;

