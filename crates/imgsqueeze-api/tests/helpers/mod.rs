//! Test helpers: build the real router against a temporary static directory.
//!
//! Run from workspace root: `cargo test -p imgsqueeze-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use imgsqueeze_api::setup::routes;
use imgsqueeze_api::state::AppState;
use imgsqueeze_core::{CompressorConfig, Config};
use std::sync::Arc;
use tempfile::TempDir;

pub const INDEX_HTML: &str = "<!doctype html><title>imgsqueeze</title>";

/// Test application: server plus the directory it serves static files from.
pub struct TestApp {
    pub server: TestServer,
    pub _static_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {})
}

/// Build an app after letting the caller adjust the default configuration.
pub fn setup_test_app_with(configure: impl FnOnce(&mut CompressorConfig)) -> TestApp {
    let static_dir = tempfile::tempdir().expect("Failed to create static dir");
    std::fs::write(static_dir.path().join("index.html"), INDEX_HTML)
        .expect("Failed to write index.html");
    std::fs::write(static_dir.path().join("app.js"), "console.log('ok');")
        .expect("Failed to write app.js");

    let mut inner = CompressorConfig::default();
    inner.static_dir = static_dir.path().to_string_lossy().into_owned();
    configure(&mut inner);

    let config = Config(Box::new(inner));
    let state = Arc::new(AppState::new(config.clone()));
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        _static_dir: static_dir,
    }
}

/// A file part with explicit name and MIME type.
pub fn image_part(data: Vec<u8>, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(data)
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string())
}

/// Single-upload form, optionally with a settings payload.
pub fn single_form(part: Part, settings: Option<serde_json::Value>) -> MultipartForm {
    let form = MultipartForm::new().add_part("file", part);
    match settings {
        Some(settings) => form.add_text("settings", settings.to_string()),
        None => form,
    }
}
