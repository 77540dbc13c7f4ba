//! Imgsqueeze Core Library
//!
//! Domain models, error types and configuration shared by the processing
//! engine and the HTTP service.

pub mod config;
pub mod error;
pub mod models;

pub use config::{BaseConfig, CompressorConfig, Config, LogFormat};
pub use error::{AppError, ErrorMetadata, LogLevel};
