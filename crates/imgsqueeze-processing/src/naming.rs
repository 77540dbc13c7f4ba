//! Output file naming

use imgsqueeze_core::models::CompressionSettings;

/// Name for a single-file response: the caller's `outputName`, else
/// `compressed_<millis>.<ext>`.
pub fn single_output_name(settings: &CompressionSettings, timestamp_ms: i64) -> String {
    match &settings.output_name {
        Some(name) => name.clone(),
        None => format!(
            "compressed_{}.{}",
            timestamp_ms,
            settings.format.file_extension()
        ),
    }
}

/// Name for the `index`-th (zero based) file of a batch.
pub fn batch_output_name(
    index: usize,
    original_name: &str,
    settings: &CompressionSettings,
    timestamp_ms: i64,
) -> String {
    let extension = settings.format.file_extension();
    if settings.keep_original_name {
        format!("{}.{}", strip_extension(original_name), extension)
    } else {
        format!("compressed_{}_{}.{}", index + 1, timestamp_ms, extension)
    }
}

/// Drop a trailing `.ext` segment, or a bare trailing dot. Dots inside directories do not count.
fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if !name[dot + 1..].contains('/') => &name[..dot],
        _ => name,
    }
}
