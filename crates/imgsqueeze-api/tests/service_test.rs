//! Health, capability, documentation and routing tests.
//!
//! Run with: `cargo test -p imgsqueeze-api --test service_test`

mod helpers;

use axum::http::Method;
use helpers::{setup_test_app, INDEX_HTML};
use serde_json::Value;

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.client().get("/api/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], "1.0.0");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    assert_eq!(body["features"]["maxFileSize"], "50MB");
    assert_eq!(body["features"]["animated"], true);
    assert_eq!(body["features"]["batchProcessing"], true);
}

#[tokio::test]
async fn test_formats_is_stable() {
    let app = setup_test_app();

    let first: Value = app.client().get("/api/formats").await.json();
    let second: Value = app.client().get("/api/formats").await.json();

    assert_eq!(first, second);
    assert_eq!(
        first["input"]["formats"],
        serde_json::json!(["jpeg", "jpg", "png", "gif", "webp", "bmp", "tiff"])
    );
    assert_eq!(first["input"]["maxSize"], "50MB");
    assert_eq!(first["input"]["animated"], serde_json::json!(["gif", "webp"]));
    assert_eq!(
        first["output"]["formats"],
        serde_json::json!(["webp", "jpg", "png", "gif"])
    );
    assert_eq!(
        first["output"]["quality"],
        serde_json::json!({ "min": 10, "max": 100, "default": 85 })
    );
    assert_eq!(first["output"]["features"]["keepRatio"], true);
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let app = setup_test_app();

    let response = app.client().get("/api/does-not-exist").await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["path"], "/api/does-not-exist");

    let response = app.client().post("/api/compress/extra/segments").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let app = setup_test_app();

    let response = app.client().get("/api/compress").await;
    assert_eq!(response.status_code(), 405);
    let body: Value = response.json();
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");

    let response = app.client().delete("/api/health").await;
    assert_eq!(response.status_code(), 405);
}

#[tokio::test]
async fn test_options_is_empty_200() {
    let app = setup_test_app();

    let response = app
        .client()
        .method(Method::OPTIONS, "/api/compress")
        .await;

    assert_eq!(response.status_code(), 200);
    assert!(response.as_bytes().is_empty());
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let app = setup_test_app();

    let response = app
        .client()
        .method(Method::OPTIONS, "/api/compress")
        .add_header("Origin", "https://example.com")
        .add_header("Access-Control-Request-Method", "POST")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("access-control-allow-origin"), "*");
}

#[tokio::test]
async fn test_request_id_header_is_set() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/api/health")
        .add_header("X-Request-ID", "req-42")
        .await;

    assert_eq!(response.header("x-request-id"), "req-42");
}

#[tokio::test]
async fn test_static_files_and_index_fallback() {
    let app = setup_test_app();

    let response = app.client().get("/app.js").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "console.log('ok');");

    let response = app.client().get("/").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), INDEX_HTML);

    let response = app.client().get("/some/client/route").await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.text(), INDEX_HTML);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app();

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["paths"]["/api/compress"].is_object());
    assert!(body["paths"]["/api/compress/batch"].is_object());
}
