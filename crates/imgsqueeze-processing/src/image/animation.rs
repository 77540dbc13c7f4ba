//! Animated-image detection

use image::codecs::webp::WebPDecoder;
use image::AnimationDecoder;
use std::io::Cursor;
use std::path::Path;

pub struct AnimationDetector;

impl AnimationDetector {
    /// Decide whether an upload should be treated as animated.
    ///
    /// `.gif` always counts as animated. `.webp` counts only when it decodes
    /// to more than one frame. Every other extension is static. Decode
    /// problems degrade to `false`.
    pub fn is_animated(data: &[u8], filename: &str) -> bool {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "gif" => true,
            "webp" => match Self::webp_frame_count(data, 2) {
                Ok(frames) => frames > 1,
                Err(e) => {
                    tracing::warn!(
                        filename = %filename,
                        error = %e,
                        "Could not inspect webp frames, treating as static"
                    );
                    false
                }
            },
            _ => false,
        }
    }

    /// Count decodable webp frames, stopping at `limit`.
    fn webp_frame_count(data: &[u8], limit: usize) -> image::ImageResult<usize> {
        let decoder = WebPDecoder::new(Cursor::new(data))?;
        if !decoder.has_animation() {
            return Ok(1);
        }

        let mut count = 0;
        for frame in decoder.into_frames().take(limit) {
            frame?;
            count += 1;
        }
        Ok(count)
    }
}
