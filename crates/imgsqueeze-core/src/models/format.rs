//! Requested, detected, and resolved image formats.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Output format as requested by the caller.
///
/// `jpg` and `jpeg` encode identically but are kept apart so generated file
/// names keep the caller's spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[default]
    Webp,
    Jpg,
    Jpeg,
    Png,
    Gif,
    Auto,
}

impl TargetFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "webp" => Some(TargetFormat::Webp),
            "jpg" => Some(TargetFormat::Jpg),
            "jpeg" => Some(TargetFormat::Jpeg),
            "png" => Some(TargetFormat::Png),
            "gif" => Some(TargetFormat::Gif),
            "auto" => Some(TargetFormat::Auto),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetFormat::Webp => "webp",
            TargetFormat::Jpg => "jpg",
            TargetFormat::Jpeg => "jpeg",
            TargetFormat::Png => "png",
            TargetFormat::Gif => "gif",
            TargetFormat::Auto => "auto",
        }
    }

    /// Targets for which an animated source may keep its frames.
    pub fn allows_animation(self) -> bool {
        matches!(
            self,
            TargetFormat::Webp | TargetFormat::Gif | TargetFormat::Auto
        )
    }

    /// Extension used when naming output before the source has been inspected.
    pub fn file_extension(self) -> &'static str {
        match self {
            TargetFormat::Jpg => "jpg",
            TargetFormat::Jpeg => "jpeg",
            other => OutputFormat::resolve(other, SourceFormat::Unknown).extension(),
        }
    }
}

/// Container format sniffed from the uploaded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Png,
    Jpeg,
    Gif,
    WebP,
    Bmp,
    Tiff,
    Unknown,
}

impl SourceFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceFormat::Png => "png",
            SourceFormat::Jpeg => "jpeg",
            SourceFormat::Gif => "gif",
            SourceFormat::WebP => "webp",
            SourceFormat::Bmp => "bmp",
            SourceFormat::Tiff => "tiff",
            SourceFormat::Unknown => "unknown",
        }
    }
}

/// Concrete format the encoder writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    WebP,
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    /// Resolve the requested target against the detected source.
    ///
    /// Total: `auto` always lands on a concrete format.
    pub fn resolve(target: TargetFormat, source: SourceFormat) -> Self {
        match target {
            TargetFormat::Webp => OutputFormat::WebP,
            TargetFormat::Jpg | TargetFormat::Jpeg => OutputFormat::Jpeg,
            TargetFormat::Png => OutputFormat::Png,
            TargetFormat::Gif => OutputFormat::Gif,
            TargetFormat::Auto => Self::best_for(source),
        }
    }

    /// Rule table for `auto`. Every known source compresses best as WebP.
    fn best_for(source: SourceFormat) -> Self {
        match source {
            SourceFormat::Png => OutputFormat::WebP,
            SourceFormat::Jpeg => OutputFormat::WebP,
            SourceFormat::Gif => OutputFormat::WebP,
            SourceFormat::WebP => OutputFormat::WebP,
            _ => OutputFormat::WebP,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::WebP => "image/webp",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Gif => "image/gif",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Gif => "gif",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_format_parse() {
        assert_eq!(TargetFormat::parse("webp"), Some(TargetFormat::Webp));
        assert_eq!(TargetFormat::parse("JPG"), Some(TargetFormat::Jpg));
        assert_eq!(TargetFormat::parse(" jpeg "), Some(TargetFormat::Jpeg));
        assert_eq!(TargetFormat::parse("auto"), Some(TargetFormat::Auto));
        assert_eq!(TargetFormat::parse("avif"), None);
        assert_eq!(TargetFormat::parse(""), None);
    }

    #[test]
    fn test_auto_resolves_to_webp_for_every_source() {
        for source in [
            SourceFormat::Png,
            SourceFormat::Jpeg,
            SourceFormat::Gif,
            SourceFormat::WebP,
            SourceFormat::Bmp,
            SourceFormat::Tiff,
            SourceFormat::Unknown,
        ] {
            assert_eq!(
                OutputFormat::resolve(TargetFormat::Auto, source),
                OutputFormat::WebP,
                "source {:?}",
                source
            );
        }
    }

    #[test]
    fn test_explicit_target_ignores_source() {
        assert_eq!(
            OutputFormat::resolve(TargetFormat::Png, SourceFormat::Jpeg),
            OutputFormat::Png
        );
        assert_eq!(
            OutputFormat::resolve(TargetFormat::Jpg, SourceFormat::Png),
            OutputFormat::Jpeg
        );
        assert_eq!(
            OutputFormat::resolve(TargetFormat::Gif, SourceFormat::WebP),
            OutputFormat::Gif
        );
    }

    #[test]
    fn test_mime_types() {
        assert_eq!(OutputFormat::WebP.mime_type(), "image/webp");
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::Gif.mime_type(), "image/gif");
    }

    #[test]
    fn test_file_extension_keeps_spelling() {
        assert_eq!(TargetFormat::Jpg.file_extension(), "jpg");
        assert_eq!(TargetFormat::Jpeg.file_extension(), "jpeg");
        assert_eq!(TargetFormat::Auto.file_extension(), "webp");
        assert_eq!(TargetFormat::Gif.file_extension(), "gif");
    }

    #[test]
    fn test_allows_animation() {
        assert!(TargetFormat::Webp.allows_animation());
        assert!(TargetFormat::Gif.allows_animation());
        assert!(TargetFormat::Auto.allows_animation());
        assert!(!TargetFormat::Png.allows_animation());
        assert!(!TargetFormat::Jpeg.allows_animation());
    }
}
