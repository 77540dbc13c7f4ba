//! Source format sniffing

use image::ImageFormat;
use imgsqueeze_core::models::SourceFormat;

/// Detect the container format from magic bytes. Unrecognized data is `Unknown`.
pub fn detect_source(data: &[u8]) -> SourceFormat {
    match image::guess_format(data) {
        Ok(ImageFormat::Png) => SourceFormat::Png,
        Ok(ImageFormat::Jpeg) => SourceFormat::Jpeg,
        Ok(ImageFormat::Gif) => SourceFormat::Gif,
        Ok(ImageFormat::WebP) => SourceFormat::WebP,
        Ok(ImageFormat::Bmp) => SourceFormat::Bmp,
        Ok(ImageFormat::Tiff) => SourceFormat::Tiff,
        _ => SourceFormat::Unknown,
    }
}
