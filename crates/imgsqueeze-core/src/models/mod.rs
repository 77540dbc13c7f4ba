//! Domain models shared by the processing and API crates.

pub mod capabilities;
pub mod format;
pub mod result;
pub mod settings;
pub mod upload;

pub use capabilities::{FormatsResponse, HealthResponse, SERVICE_VERSION};
pub use format::{OutputFormat, SourceFormat, TargetFormat};
pub use result::{compression_ratio, BatchItemResult, BatchResponse, BatchSummary};
pub use settings::{CompressionSettings, NormalizedSettings, SettingsSource};
pub use upload::UploadedFile;
