use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use imgsqueeze_core::models::HealthResponse;

use crate::state::AppState;

/// Service liveness and feature summary
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "service",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse::new(
        state.config.max_file_size_bytes(),
        Utc::now(),
    ))
}
