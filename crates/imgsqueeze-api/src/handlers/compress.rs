use std::sync::Arc;

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::Response,
};
use chrono::Utc;
use imgsqueeze_core::models::CompressionSettings;
use imgsqueeze_core::AppError;
use imgsqueeze_processing::{single_output_name, AnimationDetector, CompressionResult};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::constants::{HEADER_COMPRESSED_SIZE, HEADER_COMPRESSION_RATIO, HEADER_ORIGINAL_SIZE};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_upload, UploadMode};

/// Compress a single image
///
/// Accepts a multipart form with a `file` part and an optional `settings`
/// JSON text part. Responds with the encoded image as an attachment; sizes and
/// the compression ratio are reported in `X-*` headers.
#[utoipa::path(
    post,
    path = "/api/compress",
    tag = "compression",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Compressed image bytes", content_type = "image/*"),
        (status = 400, description = "Missing, oversized or unsupported file", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Compression failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "compress_image"))]
pub async fn compress_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(rejection = %rejection, "Request is not a multipart upload");
        AppError::NoFile
    })?;

    let upload = extract_upload(multipart, &state.validator, UploadMode::Single).await?;
    let file = upload
        .files
        .into_iter()
        .next()
        .ok_or(AppError::NoFile)?;

    let settings = CompressionSettings::normalize(upload.settings.as_deref()).settings;
    let output_name = single_output_name(&settings, Utc::now().timestamp_millis());

    tracing::info!(
        original_name = %file.original_name,
        size = file.size(),
        content_type = %file.content_type,
        settings = ?settings,
        "Processing upload"
    );

    let engine = state.engine.clone();
    let result = tokio::task::spawn_blocking(move || {
        let animated = AnimationDetector::is_animated(&file.data, &file.original_name);
        engine.compress(&file.data, &settings, animated, output_name)
    })
    .await
    .map_err(|e| AppError::CompressionFailed(format!("Compression task failed: {}", e)))??;

    tracing::info!(
        output_name = %result.output_name,
        original_size = result.original_size,
        compressed_size = result.compressed_size,
        compression_ratio = result.compression_ratio,
        path = ?result.path,
        "Compression completed"
    );

    build_image_response(result)
}

fn build_image_response(result: CompressionResult) -> Result<Response, HttpAppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.format.mime_type())
        .header(header::CONTENT_LENGTH, result.compressed_size)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&result.output_name),
        )
        .header(HEADER_ORIGINAL_SIZE, result.original_size)
        .header(HEADER_COMPRESSED_SIZE, result.compressed_size)
        .header(HEADER_COMPRESSION_RATIO, result.compression_ratio.to_string())
        .body(Body::from(result.data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)).into())
}

/// `attachment` disposition. Non-ASCII names get an RFC 5987 `filename*`
/// next to a sanitised ASCII `filename`.
pub fn content_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.is_ascii() {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            utf8_percent_encode(name, NON_ALPHANUMERIC)
        )
    }
}
