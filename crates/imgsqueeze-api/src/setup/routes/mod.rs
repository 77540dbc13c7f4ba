use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, Request},
    routing::{any, get, post},
    Json, Router,
};
use imgsqueeze_core::Config;
use imgsqueeze_infra::{get_request_id, request_id_middleware, REQUEST_ID_HEADER};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::constants::{
    HEADER_COMPRESSED_SIZE, HEADER_COMPRESSION_RATIO, HEADER_ORIGINAL_SIZE,
    MULTIPART_OVERHEAD_BYTES,
};
use crate::handlers::{batch, compress, fallback, formats, health};
use crate::state::AppState;

/// Build the full application router.
///
/// Layers, outermost first: request id, trace, CORS, concurrency limit.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %get_request_id(request).unwrap_or_default(),
        )
    });

    // Misses get the index page with a 404 status (a bare 404 when the
    // index is absent), whatever the method.
    let index = Path::new(config.static_dir()).join(config.index_file());
    let static_files = ServeDir::new(config.static_dir())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(ServeFile::new(index));

    let http_concurrency_limit = config.http_concurrency_limit();
    tracing::info!(http_concurrency_limit, "HTTP concurrency limit layer enabled");

    let app = api_routes(config)
        .with_state(state)
        .route("/api/openapi.json", get(|| async { Json(crate::api_doc::get_openapi_spec()) }))
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .fallback_service(static_files)
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(request_id_middleware));

    Ok(app)
}

fn api_routes(config: &Config) -> Router<Arc<AppState>> {
    let max_file = config.max_file_size_bytes();
    let single_limit = max_file.saturating_add(MULTIPART_OVERHEAD_BYTES);
    let batch_limit = max_file
        .saturating_mul(config.max_batch_files())
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route(
            "/api/health",
            fallback::with_method_fallback(get(health::health_check), "GET"),
        )
        .route(
            "/api/formats",
            fallback::with_method_fallback(get(formats::list_formats), "GET"),
        )
        .route(
            "/api/compress",
            fallback::with_method_fallback(post(compress::compress_image), "POST")
                .layer(DefaultBodyLimit::max(single_limit)),
        )
        .route(
            "/api/compress/batch",
            fallback::with_method_fallback(post(batch::compress_batch), "POST")
                .layer(DefaultBodyLimit::max(batch_limit)),
        )
        .route("/api/", any(fallback::api_not_found))
        .route("/api/{*path}", any(fallback::api_not_found))
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let mut exposed = vec![
        HEADER_ORIGINAL_SIZE,
        HEADER_COMPRESSED_SIZE,
        HEADER_COMPRESSION_RATIO,
    ];
    exposed.push(HeaderName::try_from(REQUEST_ID_HEADER)?);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers(exposed);

    let cors = if config.allows_any_origin() {
        cors.allow_origin(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        cors.allow_origin(origins)
    };

    Ok(cors)
}
