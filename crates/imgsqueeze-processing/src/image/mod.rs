//! Image handling: format sniffing, animation detection, resizing and encoding

pub mod animation;
pub mod encoder;
pub mod format;
pub mod resize;

pub use animation::AnimationDetector;
pub use encoder::{AnimationFrame, ImageEncoder};
pub use format::detect_source;
pub use resize::{FitMode, ImageResize, ResizeRequest};
