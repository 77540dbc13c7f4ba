//! Startup configuration checks

use anyhow::Result;
use imgsqueeze_core::Config;
use std::path::Path;

/// Fail on invalid limits; warn on settings that are legal but worth noticing.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.is_production() && config.allows_any_origin() {
        tracing::warn!(
            "CORS allows all origins (*) in production; set CORS_ORIGINS to restrict callers"
        );
    }

    let static_dir = Path::new(config.static_dir());
    if !static_dir.is_dir() {
        tracing::warn!(
            static_dir = %static_dir.display(),
            "Static directory not found; only the API will be served"
        );
    } else if !static_dir.join(config.index_file()).is_file() {
        tracing::warn!(
            static_dir = %static_dir.display(),
            index_file = %config.index_file(),
            "Index file not found in static directory"
        );
    }

    Ok(())
}
