//! API constants

use axum::http::HeaderName;

/// Multipart field carrying the single upload
pub const FILE_FIELD: &str = "file";

/// Multipart field carrying batch uploads
pub const FILES_FIELD: &str = "files";

/// Optional JSON settings text field
pub const SETTINGS_FIELD: &str = "settings";

/// Largest accepted non-file field (the settings JSON)
pub const MAX_FIELD_VALUE_BYTES: usize = 1024 * 1024;

/// Headroom for multipart boundaries and part headers on top of file bytes
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub const HEADER_ORIGINAL_SIZE: HeaderName = HeaderName::from_static("x-original-size");
pub const HEADER_COMPRESSED_SIZE: HeaderName = HeaderName::from_static("x-compressed-size");
pub const HEADER_COMPRESSION_RATIO: HeaderName = HeaderName::from_static("x-compression-ratio");
