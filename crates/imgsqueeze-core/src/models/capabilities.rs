//! Health and capability descriptors served by the informational endpoints.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::settings::{DEFAULT_QUALITY, MAX_QUALITY, MIN_QUALITY};

pub const SERVICE_VERSION: &str = "1.0.0";

/// Output formats a caller may request explicitly.
pub const OUTPUT_FORMATS: [&str; 4] = ["webp", "jpg", "png", "gif"];

/// Input formats that can carry several frames.
pub const ANIMATED_INPUT_FORMATS: [&str; 2] = ["gif", "webp"];

fn human_size(bytes: usize) -> String {
    format!("{}MB", bytes / 1024 / 1024)
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthFeatures {
    pub formats: Vec<String>,
    pub animated: bool,
    pub max_file_size: String,
    pub batch_processing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub message: String,
    pub features: HealthFeatures,
}

impl HealthResponse {
    pub fn new(max_file_size_bytes: usize, now: DateTime<Utc>) -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            version: SERVICE_VERSION.to_string(),
            message: "Image compression service is running".to_string(),
            features: HealthFeatures {
                formats: OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect(),
                animated: true,
                max_file_size: human_size(max_file_size_bytes),
                batch_processing: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InputCapabilities {
    pub formats: Vec<String>,
    pub max_size: String,
    pub animated: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct QualityRange {
    pub min: u8,
    pub max: u8,
    pub default: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputFeatures {
    pub resize: bool,
    pub keep_ratio: bool,
    pub animation: bool,
    pub progressive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OutputCapabilities {
    pub formats: Vec<String>,
    pub quality: QualityRange,
    pub features: OutputFeatures,
}

/// Static capability schema. A pure function of configuration.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FormatsResponse {
    pub input: InputCapabilities,
    pub output: OutputCapabilities,
}

impl FormatsResponse {
    pub fn new(max_file_size_bytes: usize, allowed_extensions: &[String]) -> Self {
        Self {
            input: InputCapabilities {
                formats: allowed_extensions.to_vec(),
                max_size: human_size(max_file_size_bytes),
                animated: ANIMATED_INPUT_FORMATS.iter().map(|f| f.to_string()).collect(),
            },
            output: OutputCapabilities {
                formats: OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect(),
                quality: QualityRange {
                    min: MIN_QUALITY,
                    max: MAX_QUALITY,
                    default: DEFAULT_QUALITY,
                },
                features: OutputFeatures {
                    resize: true,
                    keep_ratio: true,
                    animation: true,
                    progressive: true,
                },
            },
        }
    }
}
