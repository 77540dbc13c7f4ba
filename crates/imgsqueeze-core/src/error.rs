//! Error types module
//!
//! All failures that can reach an HTTP caller are unified under [`AppError`].
//! Each variant self-describes its response through [`ErrorMetadata`]; the
//! API crate turns that description into a JSON body.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for degraded but handled situations
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "NO_FILE")
    fn error_code(&self) -> &'static str;

    /// Short client-facing title, rendered as the `error` field
    fn client_message(&self) -> String;

    /// Optional longer explanation, rendered as the `message` field
    fn detail(&self) -> Option<String>;

    /// Whether the detail should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file uploaded")]
    NoFile,

    #[error("No files uploaded")]
    NoFiles,

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("File too large (max {max_bytes} bytes)")]
    FileTooLarge { max_bytes: usize },

    /// Multipart-level rejection carrying its own code (e.g. `LIMIT_UNEXPECTED_FILE`)
    #[error("Upload error ({code}): {message}")]
    Upload {
        code: &'static str,
        message: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    #[error("Batch compression failed: {0}")]
    BatchCompressionFailed(String),

    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("Method not allowed (allowed: {allowed})")]
    MethodNotAllowed { allowed: &'static str },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::NoFile => (400, "NO_FILE", false, LogLevel::Debug),
        AppError::NoFiles => (400, "NO_FILES", false, LogLevel::Debug),
        AppError::UnsupportedFileType(_) => (400, "INVALID_FILE_TYPE", false, LogLevel::Debug),
        AppError::FileTooLarge { .. } => (400, "FILE_TOO_LARGE", false, LogLevel::Debug),
        AppError::Upload { code, .. } => (400, *code, false, LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::CompressionFailed(_) => (500, "COMPRESSION_FAILED", false, LogLevel::Error),
        AppError::BatchCompressionFailed(_) => {
            (500, "BATCH_COMPRESSION_FAILED", false, LogLevel::Error)
        }
        AppError::NotFound { .. } => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::MethodNotAllowed { .. } => (405, "METHOD_NOT_ALLOWED", false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::NoFile => "NoFile",
            AppError::NoFiles => "NoFiles",
            AppError::UnsupportedFileType(_) => "UnsupportedFileType",
            AppError::FileTooLarge { .. } => "FileTooLarge",
            AppError::Upload { .. } => "Upload",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::CompressionFailed(_) => "CompressionFailed",
            AppError::BatchCompressionFailed(_) => "BatchCompressionFailed",
            AppError::NotFound { .. } => "NotFound",
            AppError::MethodNotAllowed { .. } => "MethodNotAllowed",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }

    /// Request path for `NotFound`, echoed back in the response body
    pub fn path(&self) -> Option<&str> {
        match self {
            AppError::NotFound { path } => Some(path),
            _ => None,
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::NoFile | AppError::NoFiles => "No file uploaded".to_string(),
            AppError::UnsupportedFileType(_) => "Only image files are supported".to_string(),
            AppError::FileTooLarge { .. } => "File too large".to_string(),
            AppError::Upload { .. } => "File upload error".to_string(),
            AppError::InvalidInput(_) => "Invalid request".to_string(),
            AppError::CompressionFailed(_) => "Image compression failed".to_string(),
            AppError::BatchCompressionFailed(_) => "Batch compression failed".to_string(),
            AppError::NotFound { .. } => "API endpoint not found".to_string(),
            AppError::MethodNotAllowed { .. } => "Method not allowed".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            AppError::NoFile | AppError::NoFiles | AppError::NotFound { .. } => None,
            AppError::UnsupportedFileType(msg) => Some(msg.clone()),
            AppError::FileTooLarge { max_bytes } => Some(format!(
                "A single file must not exceed {}MB",
                max_bytes / 1024 / 1024
            )),
            AppError::Upload { message, .. } => Some(message.clone()),
            AppError::InvalidInput(msg) => Some(msg.clone()),
            AppError::CompressionFailed(msg) => Some(msg.clone()),
            AppError::BatchCompressionFailed(msg) => Some(msg.clone()),
            AppError::MethodNotAllowed { allowed } => {
                Some(format!("Only {} requests are supported", allowed))
            }
            AppError::Internal(msg) => Some(msg.clone()),
            AppError::InternalWithSource { .. } => Some(self.detailed_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_no_file() {
        let err = AppError::NoFile;
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "NO_FILE");
        assert_eq!(err.detail(), None);
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_file_too_large() {
        let err = AppError::FileTooLarge {
            max_bytes: 50 * 1024 * 1024,
        };
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "FILE_TOO_LARGE");
        assert!(err.detail().unwrap().contains("50MB"));
    }

    #[test]
    fn test_error_metadata_upload_code_passthrough() {
        let err = AppError::Upload {
            code: "LIMIT_UNEXPECTED_FILE",
            message: "Unexpected field".to_string(),
        };
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "LIMIT_UNEXPECTED_FILE");
        assert_eq!(err.client_message(), "File upload error");
    }

    #[test]
    fn test_error_metadata_compression_failed_keeps_message() {
        let err = AppError::CompressionFailed("unsupported image".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "COMPRESSION_FAILED");
        assert_eq!(err.detail().as_deref(), Some("unsupported image"));
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_internal_is_sensitive() {
        let err = AppError::Internal("worker panicked".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.is_sensitive());
    }

    #[test]
    fn test_error_metadata_not_found_path() {
        let err = AppError::NotFound {
            path: "/api/nope".to_string(),
        };
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.path(), Some("/api/nope"));
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("root cause").context("outer"));
        let details = err.detailed_message();
        assert!(details.contains("Caused by"));
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}
