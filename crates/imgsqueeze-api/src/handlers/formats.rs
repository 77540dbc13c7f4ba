use std::sync::Arc;

use axum::{extract::State, Json};
use imgsqueeze_core::models::FormatsResponse;

use crate::state::AppState;

/// Accepted input formats and available output options.
///
/// Depends only on configuration, so repeated calls return the same document.
#[utoipa::path(
    get,
    path = "/api/formats",
    tag = "service",
    responses(
        (status = 200, description = "Capability descriptor", body = FormatsResponse)
    )
)]
pub async fn list_formats(State(state): State<Arc<AppState>>) -> Json<FormatsResponse> {
    Json(FormatsResponse::new(
        state.config.max_file_size_bytes(),
        state.config.allowed_extensions(),
    ))
}
