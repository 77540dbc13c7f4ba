use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use imgsqueeze_core::models::{BatchResponse, CompressionSettings};
use imgsqueeze_core::AppError;
use imgsqueeze_processing::BatchAggregator;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{extract_upload, UploadMode};

/// Compress several images with shared settings
///
/// Files are processed in upload order. A file that fails is reported in its
/// result entry and does not change the response status.
#[utoipa::path(
    post,
    path = "/api/compress/batch",
    tag = "compression",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Per-file results and summary", body = BatchResponse),
        (status = 400, description = "Missing, oversized or unsupported files", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Batch could not be processed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "compress_batch"))]
pub async fn compress_batch(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<BatchResponse>, HttpAppError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(rejection = %rejection, "Request is not a multipart upload");
        AppError::NoFiles
    })?;

    let mode = UploadMode::Batch {
        max_files: state.config.max_batch_files(),
    };
    let upload = extract_upload(multipart, &state.validator, mode).await?;
    let settings = CompressionSettings::normalize(upload.settings.as_deref()).settings;
    let files = upload.files;

    let engine = state.engine.clone();
    let response = tokio::task::spawn_blocking(move || {
        BatchAggregator::new(&engine).run(&files, &settings)
    })
    .await
    .map_err(|e| AppError::BatchCompressionFailed(format!("Batch task failed: {}", e)))?;

    Ok(Json(response))
}
