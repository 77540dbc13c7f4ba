//! Compression engine
//!
//! Decodes an upload, optionally resizes it, and re-encodes it in the
//! resolved output format. Animated sources can keep their frames as an
//! animated WebP; if that path fails the engine falls back to a still image.

use bytes::Bytes;
use image::codecs::gif::GifDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, Frame};
use imgsqueeze_core::models::{
    compression_ratio, CompressionSettings, OutputFormat, SourceFormat, TargetFormat,
};
use std::io::Cursor;
use std::time::Instant;

use crate::image::{detect_source, AnimationFrame, ImageEncoder, ImageResize, ResizeRequest};

/// Engine tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// libwebp effort for still images (0-6)
    pub webp_method: i32,
    /// libwebp effort for animations (0-6)
    pub animated_webp_method: usize,
    pub animated_quality_cap: u8,
    /// PNG quality below this is palette-reduced first
    pub png_palette_threshold: u8,
    /// oxipng preset (0-6)
    pub png_optimization_preset: u8,
    pub min_frame_delay_ms: i32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            webp_method: 6,
            animated_webp_method: 4,
            animated_quality_cap: 80,
            png_palette_threshold: 90,
            png_optimization_preset: 6,
            min_frame_delay_ms: 20,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Animated processing failed: {0}")]
    Animation(String),
}

/// Which pipeline produced the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionPath {
    Static,
    Animated,
    /// Animation was requested but a still image was produced instead
    StaticFallback { reason: String },
}

#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub data: Bytes,
    pub original_size: u64,
    pub compressed_size: u64,
    pub compression_ratio: f64,
    pub format: OutputFormat,
    pub output_name: String,
    pub path: CompressionPath,
}

/// Stateless compression service, shared across requests.
#[derive(Debug, Clone, Default)]
pub struct CompressionEngine {
    options: EngineOptions,
}

impl CompressionEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Compress one image. `animated` is the detector's verdict for this upload.
    pub fn compress(
        &self,
        data: &[u8],
        settings: &CompressionSettings,
        animated: bool,
        output_name: String,
    ) -> Result<CompressionResult, CompressionError> {
        let started = Instant::now();
        let wants_animation =
            settings.preserve_animation && animated && settings.format.allows_animation();

        tracing::debug!(
            original_size = data.len(),
            format = settings.format.as_str(),
            quality = settings.quality,
            width = ?settings.width,
            height = ?settings.height,
            keep_ratio = settings.keep_ratio,
            animated = wants_animation,
            "Starting compression"
        );

        let (encoded, format, path) = if !wants_animation {
            let (encoded, format) = self.compress_static(data, settings)?;
            (encoded, format, CompressionPath::Static)
        } else if settings.format == TargetFormat::Gif {
            let (encoded, format) = self.compress_static(data, settings)?;
            (
                encoded,
                format,
                CompressionPath::StaticFallback {
                    reason: "animation is only preserved as webp".to_string(),
                },
            )
        } else {
            match self.compress_animated(data, settings) {
                Ok(encoded) => (encoded, OutputFormat::WebP, CompressionPath::Animated),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Animated compression failed, falling back to static"
                    );
                    let (encoded, format) = self.compress_static(data, settings)?;
                    (
                        encoded,
                        format,
                        CompressionPath::StaticFallback {
                            reason: e.to_string(),
                        },
                    )
                }
            }
        };

        let original_size = data.len() as u64;
        let compressed_size = encoded.len() as u64;
        let ratio = compression_ratio(original_size, compressed_size);

        tracing::info!(
            original_size,
            compressed_size,
            compression_ratio = ratio,
            output_format = format.extension(),
            path = ?path,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Compression completed"
        );

        Ok(CompressionResult {
            data: Bytes::from(encoded),
            original_size,
            compressed_size,
            compression_ratio: ratio,
            format,
            output_name,
            path,
        })
    }

    fn compress_static(
        &self,
        data: &[u8],
        settings: &CompressionSettings,
    ) -> Result<(Vec<u8>, OutputFormat), CompressionError> {
        let format = OutputFormat::resolve(settings.format, detect_source(data));

        let img = image::load_from_memory(data)
            .map_err(|e| CompressionError::Decode(e.to_string()))?;
        let img = ImageResize::apply(img, ResizeRequest::from_settings(settings).as_ref());

        let encoded = ImageEncoder::encode(&img, format, settings.quality, &self.options)
            .map_err(|e| CompressionError::Encode(e.to_string()))?;

        Ok((encoded, format))
    }

    fn compress_animated(
        &self,
        data: &[u8],
        settings: &CompressionSettings,
    ) -> Result<Vec<u8>, CompressionError> {
        let mut frames = Self::decode_frames(data)?;

        // Every frame shares the canvas size, so one target fits all
        let target = ResizeRequest::from_settings(settings)
            .zip(frames.first())
            .and_then(|(request, first)| {
                let (width, height) = first.image.dimensions();
                ImageResize::target_dimensions(width, height, &request)
            });
        if let Some((new_width, new_height)) = target {
            for frame in frames.iter_mut() {
                frame.image = ImageResize::resize_frame(&frame.image, new_width, new_height);
            }
        }

        tracing::debug!(frames = frames.len(), "Encoding animated webp");

        ImageEncoder::encode_animated_webp(&frames, settings.quality, &self.options)
            .map_err(|e| CompressionError::Animation(e.to_string()))
    }

    /// Decode every frame of a GIF or WebP animation, composited to full canvas size.
    fn decode_frames(data: &[u8]) -> Result<Vec<AnimationFrame>, CompressionError> {
        let animation_error = |e: image::ImageError| CompressionError::Animation(e.to_string());

        let frames: Vec<Frame> = match detect_source(data) {
            SourceFormat::Gif => GifDecoder::new(Cursor::new(data))
                .map_err(animation_error)?
                .into_frames()
                .collect_frames()
                .map_err(animation_error)?,
            SourceFormat::WebP => WebPDecoder::new(Cursor::new(data))
                .map_err(animation_error)?
                .into_frames()
                .collect_frames()
                .map_err(animation_error)?,
            other => {
                return Err(CompressionError::Animation(format!(
                    "{} sources have no frames to preserve",
                    other.as_str()
                )))
            }
        };

        if frames.is_empty() {
            return Err(CompressionError::Animation(
                "animation contains no frames".to_string(),
            ));
        }

        Ok(frames
            .into_iter()
            .map(|frame| {
                let (numer, denom) = frame.delay().numer_denom_ms();
                let delay_ms = if denom == 0 { 0 } else { numer / denom };
                AnimationFrame {
                    image: frame.into_buffer(),
                    delay_ms: i32::try_from(delay_ms).unwrap_or(i32::MAX),
                }
            })
            .collect())
    }
}
