//! Imgsqueeze processing library
//!
//! Upload validation, animation detection, resizing, encoding, and the
//! compression engine with its batch aggregator.

pub mod batch;
pub mod compression;
pub mod image;
pub mod naming;
pub mod validator;

pub use batch::BatchAggregator;
pub use compression::{
    CompressionEngine, CompressionError, CompressionPath, CompressionResult, EngineOptions,
};
pub use self::image::AnimationDetector;
pub use naming::{batch_output_name, single_output_name};
pub use validator::{UploadValidator, ValidationError};
