use image::{imageops, DynamicImage, GenericImageView, RgbaImage};
use imgsqueeze_core::models::CompressionSettings;

/// How both-dimension requests are fitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Keep aspect ratio, shrink to fit within the box
    #[default]
    Inside,
    /// Stretch to the exact box
    Fill,
}

/// Requested output bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: FitMode,
}

impl ResizeRequest {
    /// `None` when the settings ask for no resize.
    pub fn from_settings(settings: &CompressionSettings) -> Option<Self> {
        if !settings.has_resize() {
            return None;
        }
        Some(Self {
            width: settings.width,
            height: settings.height,
            fit: if settings.keep_ratio {
                FitMode::Inside
            } else {
                FitMode::Fill
            },
        })
    }
}

fn scaled(value: u32, numerator: u32, denominator: u32) -> u32 {
    ((value as f64 * numerator as f64 / denominator as f64).round() as u32).max(1)
}

/// Image resize operations. Never enlarges.
pub struct ImageResize;

impl ImageResize {
    /// Compute the output size, or `None` when the image should stay as is.
    pub fn target_dimensions(
        orig_width: u32,
        orig_height: u32,
        request: &ResizeRequest,
    ) -> Option<(u32, u32)> {
        if orig_width == 0 || orig_height == 0 {
            return None;
        }

        let target = match (request.width, request.height) {
            (Some(w), None) => {
                if w >= orig_width {
                    return None;
                }
                (w, scaled(orig_height, w, orig_width))
            }
            (None, Some(h)) => {
                if h >= orig_height {
                    return None;
                }
                (scaled(orig_width, h, orig_height), h)
            }
            (Some(w), Some(h)) => match request.fit {
                FitMode::Inside => {
                    let width_scale = w as f64 / orig_width as f64;
                    let height_scale = h as f64 / orig_height as f64;
                    if width_scale.min(height_scale) >= 1.0 {
                        return None;
                    }
                    if width_scale <= height_scale {
                        (w, scaled(orig_height, w, orig_width))
                    } else {
                        (scaled(orig_width, h, orig_height), h)
                    }
                }
                FitMode::Fill => (w.min(orig_width), h.min(orig_height)),
            },
            (None, None) => return None,
        };

        (target != (orig_width, orig_height)).then_some(target)
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            imageops::FilterType::CatmullRom
        } else {
            imageops::FilterType::Lanczos3
        }
    }

    pub fn apply(img: DynamicImage, request: Option<&ResizeRequest>) -> DynamicImage {
        let Some(request) = request else {
            return img;
        };
        let (orig_width, orig_height) = img.dimensions();
        match Self::target_dimensions(orig_width, orig_height, request) {
            Some((width, height)) => {
                let filter = Self::select_filter(orig_width, orig_height, width, height);
                img.resize_exact(width, height, filter)
            }
            None => img,
        }
    }

    /// Resize one animation frame to an already computed size.
    pub fn resize_frame(frame: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        if frame.dimensions() == (width, height) {
            return frame.clone();
        }
        let filter = Self::select_filter(frame.width(), frame.height(), width, height);
        imageops::resize(frame, width, height, filter)
    }
}
