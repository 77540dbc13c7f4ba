//! Responses for requests no API handler claims

use axum::{
    http::{StatusCode, Uri},
    routing::MethodRouter,
};
use imgsqueeze_core::AppError;

use crate::error::HttpAppError;

/// Unknown path under `/api/`
pub async fn api_not_found(uri: Uri) -> HttpAppError {
    HttpAppError(AppError::NotFound {
        path: uri.path().to_string(),
    })
}

/// Bare `OPTIONS` on an API route
pub async fn options_ok() -> StatusCode {
    StatusCode::OK
}

/// Attach the `OPTIONS` answer and a JSON 405 for every other method.
pub fn with_method_fallback<S>(router: MethodRouter<S>, allowed: &'static str) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .options(options_ok)
        .fallback(move || async move { HttpAppError(AppError::MethodNotAllowed { allowed }) })
}
