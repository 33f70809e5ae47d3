// Uploaded file intake
use super::error::ValidationError;

/// Content types accepted for analysis, matched by prefix so that
/// parameters such as `; charset=utf-8` pass.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["text/csv", "application/json", "text/plain"];

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub content: String,
}

impl UploadedFile {
    pub fn new(file_name: String, content_type: String, bytes: &[u8]) -> Self {
        Self {
            file_name,
            content_type,
            content: String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    pub fn is_supported(&self) -> bool {
        ACCEPTED_MIME_TYPES
            .iter()
            .any(|accepted| self.content_type.starts_with(accepted))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(ValidationError::UnsupportedFileType {
                content_type: self.content_type.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content_type: &str) -> UploadedFile {
        UploadedFile::new("sales".to_string(), content_type.to_string(), b"a,b\n1,2")
    }

    #[test]
    fn test_accepted_types() {
        assert!(file("text/csv").is_supported());
        assert!(file("text/csv; charset=utf-8").is_supported());
        assert!(file("application/json").is_supported());
        assert!(file("text/plain").is_supported());
    }

    #[test]
    fn test_rejected_types() {
        let err = file("image/png").validate().unwrap_err();
        assert!(err.to_string().starts_with("Unsupported file type"));
        assert!(!file("").is_supported());
        assert!(!file("application/octet-stream").is_supported());
    }

    #[test]
    fn test_content_is_decoded_lossily() {
        let upload = UploadedFile::new("x.txt".into(), "text/plain".into(), &[b'o', b'k', 0xff]);
        assert!(upload.content.starts_with("ok"));
    }
}
