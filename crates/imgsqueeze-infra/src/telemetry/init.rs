use imgsqueeze_core::LogFormat;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "imgsqueeze=debug,tower_http=debug";

/// Initialize tracing with an env filter and either human or JSON output
pub fn init_telemetry(
    log_format: LogFormat,
    environment: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (text_layer, json_layer) = match log_format {
        LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(text_layer)
        .with(json_layer)
        .try_init()?;

    tracing::info!(
        log_format = ?log_format,
        environment = %environment,
        "Tracing initialized"
    );
    Ok(())
}
