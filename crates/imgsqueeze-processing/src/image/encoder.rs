//! Static and animated encoders

use anyhow::{anyhow, Result};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use imgsqueeze_core::models::OutputFormat;

use crate::compression::EngineOptions;
use std::io::Cursor;

/// A decoded animation frame and how long it is shown.
#[derive(Debug, Clone)]
pub struct AnimationFrame {
    pub image: RgbaImage,
    pub delay_ms: i32,
}

pub struct ImageEncoder;

impl ImageEncoder {
    /// Encode a still image into the given output format
    pub fn encode(
        img: &DynamicImage,
        format: OutputFormat,
        quality: u8,
        options: &EngineOptions,
    ) -> Result<Vec<u8>> {
        match format {
            OutputFormat::WebP => Self::encode_webp(img, quality, options.webp_method),
            OutputFormat::Jpeg => Self::encode_jpeg(img, quality),
            OutputFormat::Png => Self::encode_png(img, quality, options),
            OutputFormat::Gif => Self::encode_gif(img),
        }
    }

    /// WebP via libwebp's advanced config with sharp YUV conversion
    fn encode_webp(img: &DynamicImage, quality: u8, method: i32) -> Result<Vec<u8>> {
        let (width, height) = img.dimensions();
        let rgba_img = img.to_rgba8();

        let mut config =
            webp::WebPConfig::new().map_err(|_| anyhow!("Failed to initialise WebP config"))?;
        config.quality = quality as f32;
        config.method = method;
        config.use_sharp_yuv = 1;

        let encoder = webp::Encoder::from_rgba(&rgba_img, width, height);
        let webp_data = encoder
            .encode_advanced(&config)
            .map_err(|e| anyhow!("WebP encoding failed: {:?}", e))?;

        Ok(webp_data.to_vec())
    }

    /// Progressive JPEG using mozjpeg
    fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);
        comp.set_optimize_scans(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        Ok(jpeg_data)
    }

    /// Interlaced PNG, palette-reduced at lower quality, then optimised losslessly
    fn encode_png(img: &DynamicImage, quality: u8, options: &EngineOptions) -> Result<Vec<u8>> {
        let source = if quality < options.png_palette_threshold {
            Self::quantize(img, quality)?
        } else {
            img.clone()
        };

        let mut cursor = Cursor::new(Vec::new());
        source.write_to(&mut cursor, ImageFormat::Png)?;
        let png_data = cursor.into_inner();

        let mut opts = oxipng::Options::from_preset(options.png_optimization_preset);
        opts.interlace = Some(oxipng::Interlacing::Adam7);
        opts.strip = oxipng::StripChunks::Safe;
        let optimized = oxipng::optimize_from_memory(&png_data, &opts)
            .map_err(|e| anyhow!("PNG optimisation failed: {}", e))?;

        Ok(optimized)
    }

    /// Reduce colours to a palette with libimagequant and expand back to RGBA.
    fn quantize(img: &DynamicImage, quality: u8) -> Result<DynamicImage> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let mut attr = imagequant::Attributes::new();
        attr.set_speed(4)?;
        attr.set_quality(0, quality)?;

        let pixels: Vec<rgb::RGBA<u8>> = rgba
            .chunks_exact(4)
            .map(|p| rgb::RGBA::new(p[0], p[1], p[2], p[3]))
            .collect();

        let mut liq_img =
            imagequant::Image::new(&attr, pixels.as_slice(), width as usize, height as usize, 0.0)?;
        let mut res = attr.quantize(&mut liq_img)?;
        res.set_dithering_level(1.0)?;
        let (palette, indices) = res.remapped(&mut liq_img)?;

        let mut expanded = Vec::with_capacity(indices.len() * 4);
        for idx in indices {
            let p = palette
                .get(idx as usize)
                .ok_or_else(|| anyhow!("Palette index {} out of range", idx))?;
            expanded.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }

        let quantized = RgbaImage::from_raw(width, height, expanded)
            .ok_or_else(|| anyhow!("Quantized buffer does not match image size"))?;
        Ok(DynamicImage::ImageRgba8(quantized))
    }

    /// Plain GIF conversion
    fn encode_gif(img: &DynamicImage) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut cursor, ImageFormat::Gif)?;
        Ok(cursor.into_inner())
    }

    /// Encode frames of equal size as a lossy animated WebP.
    pub fn encode_animated_webp(
        frames: &[AnimationFrame],
        quality: u8,
        options: &EngineOptions,
    ) -> Result<Vec<u8>> {
        let first = frames
            .first()
            .ok_or_else(|| anyhow!("Animation has no frames"))?;
        let dimensions = first.image.dimensions();

        let mut config =
            webp_animation::EncodingConfig::new_lossy(quality.min(options.animated_quality_cap) as f32);
        config.method = options.animated_webp_method;

        let mut encoder_options = webp_animation::EncoderOptions::default();
        encoder_options.encoding_config = Some(config);
        encoder_options.minimize_size = true;

        let mut encoder = webp_animation::Encoder::new_with_options(dimensions, encoder_options)
            .map_err(|e| anyhow!("Failed to create animated WebP encoder: {:?}", e))?;

        let mut timestamp_ms: i32 = 0;
        for frame in frames {
            encoder
                .add_frame(frame.image.as_raw(), timestamp_ms)
                .map_err(|e| anyhow!("Failed to add animation frame: {:?}", e))?;
            timestamp_ms = timestamp_ms
                .checked_add(frame.delay_ms.max(options.min_frame_delay_ms))
                .ok_or_else(|| anyhow!("Animation duration exceeds the supported range"))?;
        }

        let webp_data = encoder
            .finalize(timestamp_ms)
            .map_err(|e| anyhow!("Failed to finalise animated WebP: {:?}", e))?;

        Ok(webp_data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8, 255])
        }))
    }

    #[test]
    fn test_encode_each_output_format() {
        let img = gradient(32, 24);
        let options = EngineOptions::default();
        let cases = [
            (OutputFormat::WebP, ImageFormat::WebP),
            (OutputFormat::Jpeg, ImageFormat::Jpeg),
            (OutputFormat::Png, ImageFormat::Png),
            (OutputFormat::Gif, ImageFormat::Gif),
        ];

        for (output, expected) in cases {
            let data = ImageEncoder::encode(&img, output, 80, &options).unwrap();
            assert_eq!(image::guess_format(&data).unwrap(), expected, "{:?}", output);
            let decoded = image::load_from_memory(&data).unwrap();
            assert_eq!(decoded.dimensions(), (32, 24));
        }
    }

    #[test]
    fn test_png_high_quality_skips_palette() {
        let img = gradient(16, 16);
        let data = ImageEncoder::encode(&img, OutputFormat::Png, 95, &EngineOptions::default())
            .unwrap();
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_animated_webp_round_trip() {
        let frames = vec![
            AnimationFrame {
                image: RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])),
                delay_ms: 0,
            },
            AnimationFrame {
                image: RgbaImage::from_pixel(10, 10, Rgba([0, 255, 0, 255])),
                delay_ms: 100,
            },
        ];
        let data =
            ImageEncoder::encode_animated_webp(&frames, 90, &EngineOptions::default()).unwrap();
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::WebP);

        let decoder = webp_animation::Decoder::new(&data).unwrap();
        assert_eq!(decoder.into_iter().count(), 2);
    }

    #[test]
    fn test_animated_webp_requires_frames() {
        assert!(ImageEncoder::encode_animated_webp(&[], 80, &EngineOptions::default()).is_err());
    }

    #[test]
    fn test_animated_webp_rejects_overlong_duration() {
        // 24-bit maximum delay per frame; 130 of them exceed i32 milliseconds.
        let frames: Vec<AnimationFrame> = (0..130u8)
            .map(|i| AnimationFrame {
                image: RgbaImage::from_pixel(2, 2, Rgba([i, 0, 0, 255])),
                delay_ms: 16_777_215,
            })
            .collect();
        assert!(ImageEncoder::encode_animated_webp(&frames, 80, &EngineOptions::default()).is_err());
    }
}
