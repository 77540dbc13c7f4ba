//! Multipart extraction for the compression endpoints
//!
//! Mirrors a classic upload middleware: file parts are recognised by their
//! filename, checked by type before any bytes are read, and capped in size
//! while streaming. The optional `settings` text part is returned raw.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::BytesMut;
use imgsqueeze_core::models::UploadedFile;
use imgsqueeze_core::AppError;
use imgsqueeze_processing::UploadValidator;

use crate::constants::{FILES_FIELD, FILE_FIELD, MAX_FIELD_VALUE_BYTES, SETTINGS_FIELD};
use crate::error::HttpAppError;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Files and the raw settings payload pulled from one request
#[derive(Debug)]
pub struct ExtractedUpload {
    pub files: Vec<UploadedFile>,
    pub settings: Option<String>,
}

/// Which file field is expected and how many parts it may carry
#[derive(Debug, Clone, Copy)]
pub enum UploadMode {
    Single,
    Batch { max_files: usize },
}

impl UploadMode {
    fn field_name(self) -> &'static str {
        match self {
            UploadMode::Single => FILE_FIELD,
            UploadMode::Batch { .. } => FILES_FIELD,
        }
    }

    fn max_files(self) -> usize {
        match self {
            UploadMode::Single => 1,
            UploadMode::Batch { max_files } => max_files,
        }
    }

    fn missing(self) -> AppError {
        match self {
            UploadMode::Single => AppError::NoFile,
            UploadMode::Batch { .. } => AppError::NoFiles,
        }
    }
}

fn unexpected_file(field_name: &str) -> AppError {
    AppError::Upload {
        code: "LIMIT_UNEXPECTED_FILE",
        message: format!("Unexpected file field '{}'", field_name),
    }
}

fn multipart_error(err: MultipartError, validator: &UploadValidator) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::FileTooLarge {
            max_bytes: validator.max_file_size(),
        }
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Read the whole multipart body according to `mode`.
pub async fn extract_upload(
    mut multipart: Multipart,
    validator: &UploadValidator,
    mode: UploadMode,
) -> Result<ExtractedUpload, HttpAppError> {
    let mut files = Vec::new();
    let mut settings = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, validator))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        match field.file_name().map(str::to_string) {
            Some(filename) => {
                if field_name != mode.field_name() || files.len() >= mode.max_files() {
                    return Err(unexpected_file(&field_name).into());
                }

                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_CONTENT_TYPE)
                    .to_string();
                validator.validate_type(&filename, &content_type)?;

                let data = read_file(field, validator).await?;
                tracing::debug!(
                    filename = %filename,
                    content_type = %content_type,
                    size = data.len(),
                    "Received upload"
                );
                files.push(UploadedFile::new(filename, content_type, data.freeze()));
            }
            None if field_name == SETTINGS_FIELD => {
                settings = Some(read_text(field, validator).await?);
            }
            None => {
                tracing::debug!(field = %field_name, "Ignoring unknown form field");
            }
        }
    }

    if files.is_empty() {
        return Err(mode.missing().into());
    }

    Ok(ExtractedUpload { files, settings })
}

/// Stream a file part, failing as soon as it crosses the size ceiling.
async fn read_file(
    mut field: Field<'_>,
    validator: &UploadValidator,
) -> Result<BytesMut, HttpAppError> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, validator))?
    {
        validator.validate_file_size(data.len() + chunk.len())?;
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

async fn read_text(
    mut field: Field<'_>,
    validator: &UploadValidator,
) -> Result<String, HttpAppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, validator))?
    {
        if data.len() + chunk.len() > MAX_FIELD_VALUE_BYTES {
            return Err(AppError::Upload {
                code: "LIMIT_FIELD_VALUE",
                message: "Field value too long".to_string(),
            }
            .into());
        }
        data.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&data).into_owned())
}
