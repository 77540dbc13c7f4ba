//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Anything convertible into
//! [`AppError`] renders as the same JSON shape with the status and code the
//! variant declares through [`ErrorMetadata`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use imgsqueeze_core::{AppError, ErrorMetadata, LogLevel};
use imgsqueeze_processing::{CompressionError, ValidationError};
use serde::Serialize;
use utoipa::ToSchema;

const PRODUCTION_DETAIL: &str = "Please try again later";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Short human-readable title
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Requested path, for unknown API routes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: both the trait and `AppError` live in other crates)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        let app_error = match &err {
            ValidationError::FileTooLarge { max, .. } => AppError::FileTooLarge { max_bytes: *max },
            ValidationError::UnsupportedType { .. } => {
                AppError::UnsupportedFileType(err.to_string())
            }
        };
        HttpAppError(app_error)
    }
}

impl From<CompressionError> for HttpAppError {
    fn from(err: CompressionError) -> Self {
        HttpAppError(AppError::CompressionFailed(err.to_string()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, code, "Request failed");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| {
            let env = env.to_lowercase();
            env == "production" || env == "prod"
        })
        .unwrap_or(false)
}

/// Render the JSON body for an error. Sensitive details are replaced in
/// production; the Rust variant name is only exposed outside production.
pub fn build_error_body(error: &AppError, is_production: bool) -> ErrorResponse {
    let message = if is_production && error.is_sensitive() {
        Some(PRODUCTION_DETAIL.to_string())
    } else {
        error.detail()
    };

    ErrorResponse {
        error: error.client_message(),
        message,
        code: error.error_code().to_string(),
        path: error.path().map(str::to_string),
        error_type: (!is_production).then(|| error.error_type().to_string()),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = build_error_body(app_error, is_production_env());
        (status, Json(body)).into_response()
    }
}
