//! Error types for CloudPilot.

use thiserror::Error;

use crate::tree::TreeError;

/// Common error type for CloudPilot.
#[derive(Error, Debug)]
pub enum CloudPilotError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Tree mutation was rejected.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    /// Tag generation error.
    ///
    /// Raised by tag generators for transport failures and malformed
    /// model output.
    #[error("tagging error: {0}")]
    Tagging(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for CloudPilot operations.
pub type Result<T> = std::result::Result<T, CloudPilotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = CloudPilotError::Validation("name cannot be empty".to_string());
        assert_eq!(err.to_string(), "validation error: name cannot be empty");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = CloudPilotError::NotFound("node".to_string());
        assert_eq!(err.to_string(), "node not found");
    }

    #[test]
    fn test_tagging_error_display() {
        let err = CloudPilotError::Tagging("HTTP error: 500".to_string());
        assert_eq!(err.to_string(), "tagging error: HTTP error: 500");
    }

    #[test]
    fn test_tree_error_conversion() {
        let err: CloudPilotError = TreeError::ParentNotFound("42".to_string()).into();
        assert!(matches!(err, CloudPilotError::Tree(_)));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CloudPilotError = io_err.into();
        assert!(matches!(err, CloudPilotError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(CloudPilotError::Config("bad".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
