use std::sync::Arc;

use imgsqueeze_core::Config;
use imgsqueeze_processing::{CompressionEngine, UploadValidator};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: Arc<CompressionEngine>,
    pub validator: UploadValidator,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let validator = UploadValidator::new(
            config.max_file_size_bytes(),
            config.allowed_extensions().to_vec(),
        );
        Self {
            config,
            engine: Arc::new(CompressionEngine::default()),
            validator,
        }
    }
}
