//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use imgsqueeze_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Imgsqueeze API",
        version = "1.0.0",
        description = "Image compression service. Upload images as multipart forms to resize and re-encode them as WebP, JPEG, PNG or GIF, one at a time or in batches."
    ),
    paths(
        handlers::health::health_check,
        handlers::formats::list_formats,
        handlers::compress::compress_image,
        handlers::batch::compress_batch,
    ),
    components(schemas(
        error::ErrorResponse,
        models::HealthResponse,
        models::FormatsResponse,
        models::BatchResponse,
        models::BatchSummary,
        models::BatchItemResult,
        models::TargetFormat,
        models::OutputFormat,
    )),
    tags(
        (name = "service", description = "Health and capability endpoints"),
        (name = "compression", description = "Single and batch image compression")
    )
)]
pub struct ApiDoc;
