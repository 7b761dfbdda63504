//! Validation of tag generation requests.

use thiserror::Error;

use super::TagRequest;
use crate::data_uri::DataUri;

/// Reasons a tag request is rejected before dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagValidationError {
    /// File name is empty.
    #[error("file name cannot be empty")]
    FileNameEmpty,

    /// File name contains control characters.
    #[error("file name contains invalid characters")]
    FileNameInvalidChars,

    /// File type is empty.
    #[error("file type cannot be empty")]
    FileTypeEmpty,

    /// File content is not a base64 data URI with a MIME type.
    #[error("file data must be a base64 data URI with a MIME type")]
    InvalidDataUri,
}

/// Validate a tag request.
///
/// Requirements:
/// - File name: not blank, no control characters
/// - File type: not blank
/// - File data: `data:<mime>;base64,<payload>`
pub fn validate_request(request: &TagRequest) -> Result<(), TagValidationError> {
    if request.file_name.trim().is_empty() {
        return Err(TagValidationError::FileNameEmpty);
    }
    if request.file_name.chars().any(|c| c.is_control()) {
        return Err(TagValidationError::FileNameInvalidChars);
    }
    if request.file_type.trim().is_empty() {
        return Err(TagValidationError::FileTypeEmpty);
    }
    if DataUri::parse(&request.file_data_uri).is_err() {
        return Err(TagValidationError::InvalidDataUri);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_uri;

    fn request(name: &str, file_type: &str, uri: &str) -> TagRequest {
        TagRequest::new(uri, name, file_type)
    }

    #[test]
    fn test_valid_request() {
        let uri = data_uri::encode("text/plain", b"hello");
        assert!(validate_request(&request("notes.txt", "text", &uri)).is_ok());
    }

    #[test]
    fn test_empty_content_is_valid() {
        let uri = data_uri::encode("application/octet-stream", b"");
        assert!(validate_request(&request("empty.bin", "application", &uri)).is_ok());
    }

    #[test]
    fn test_file_name_rules() {
        let uri = data_uri::encode("text/plain", b"hello");
        assert_eq!(
            validate_request(&request("  ", "text", &uri)),
            Err(TagValidationError::FileNameEmpty)
        );
        assert_eq!(
            validate_request(&request("bad\u{0}.txt", "text", &uri)),
            Err(TagValidationError::FileNameInvalidChars)
        );
    }

    #[test]
    fn test_file_type_required() {
        let uri = data_uri::encode("text/plain", b"hello");
        assert_eq!(
            validate_request(&request("a.txt", "", &uri)),
            Err(TagValidationError::FileTypeEmpty)
        );
    }

    #[test]
    fn test_data_uri_required() {
        assert_eq!(
            validate_request(&request("a.txt", "text", "hello")),
            Err(TagValidationError::InvalidDataUri)
        );
        assert_eq!(
            validate_request(&request("a.txt", "text", "data:text/plain,hello")),
            Err(TagValidationError::InvalidDataUri)
        );
    }
}
