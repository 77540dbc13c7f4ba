use std::path::Path;

/// Upload validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Unsupported file type: {filename} ({content_type})")]
    UnsupportedType {
        filename: String,
        content_type: String,
    },
}

/// Upload validator
///
/// The allow-list holds bare tokens (`jpeg`, `png`, ...). A file passes the
/// type check when both its extension and its declared MIME type contain one
/// of them, so `image/jpeg` and `.jpg` are accepted while `image/svg+xml` is not.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_file_size: usize,
    allowed_tokens: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size: usize, allowed_tokens: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_tokens: allowed_tokens
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    fn matches_token(&self, value: &str) -> bool {
        !value.is_empty() && self.allowed_tokens.iter().any(|t| value.contains(t.as_str()))
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate extension and declared MIME type. Runs before the body is read.
    pub fn validate_type(&self, filename: &str, content_type: &str) -> Result<(), ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let mime = content_type.to_lowercase();

        if !self.matches_token(&extension) || !self.matches_token(&mime) {
            tracing::debug!(
                filename = %filename,
                content_type = %content_type,
                "Rejected upload with unsupported type"
            );
            return Err(ValidationError::UnsupportedType {
                filename: filename.to_string(),
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> UploadValidator {
        UploadValidator::new(
            1024,
            ["jpeg", "jpg", "png", "gif", "webp", "bmp", "tiff"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn test_accepts_common_images() {
        let v = validator();
        assert!(v.validate_type("photo.JPG", "image/jpeg").is_ok());
        assert!(v.validate_type("anim.gif", "image/gif").is_ok());
        assert!(v.validate_type("scan.tiff", "image/tiff").is_ok());
        assert!(v.validate_type("a.b.webp", "image/webp").is_ok());
    }

    #[test]
    fn test_rejects_wrong_extension_or_mime() {
        let v = validator();
        assert!(matches!(
            v.validate_type("notes.txt", "image/png"),
            Err(ValidationError::UnsupportedType { .. })
        ));
        assert!(v.validate_type("logo.png", "text/plain").is_err());
        assert!(v.validate_type("vector.svg", "image/svg+xml").is_err());
        assert!(v.validate_type("noext", "image/png").is_err());
    }

    #[test]
    fn test_file_size_ceiling() {
        let v = validator();
        assert!(v.validate_file_size(0).is_ok());
        assert!(v.validate_file_size(1024).is_ok());
        assert!(matches!(
            v.validate_file_size(1025),
            Err(ValidationError::FileTooLarge { size: 1025, max: 1024 })
        ));
    }
}
