//! Upload tracking for CloudPilot.
//!
//! This module provides:
//! - Upload status and per-upload state
//! - File sources the upload pipeline reads content from
//! - MIME type guessing and categorisation

mod source;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use source::{BytesSource, FileSource, PathSource, UploadFile};

/// MIME type used when none can be determined.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Status of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    /// Content is being read; progress is simulated.
    Uploading,
    /// Content has been read and the tag generator is running.
    Tagging,
    /// The file was tagged and added to the tree.
    Completed,
    /// The upload failed.
    Error,
}

impl UploadStatus {
    /// Get the lowercase name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Tagging => "tagging",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }

    /// Check if no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }
}

/// Metadata of the file being uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// File name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileInfo {
    /// Create file metadata.
    ///
    /// A blank MIME type becomes [`DEFAULT_MIME_TYPE`].
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        let mime_type = mime_type.into();
        let mime_type = if mime_type.trim().is_empty() {
            DEFAULT_MIME_TYPE.to_string()
        } else {
            mime_type
        };

        Self {
            name: name.into(),
            mime_type,
            size,
        }
    }

    /// Top-level MIME category (e.g. `text` for `text/plain`).
    pub fn category(&self) -> &str {
        mime_category(&self.mime_type)
    }
}

/// State of one upload in the active set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadState {
    /// Upload ID (not a node ID).
    pub id: String,
    /// Uploaded file metadata.
    pub file: FileInfo,
    /// Progress from 0 to 100.
    pub progress: u8,
    /// Current status.
    pub status: UploadStatus,
    /// Error message (error status only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When the upload started.
    pub started_at: DateTime<Utc>,
}

impl UploadState {
    /// Create the initial state of an upload.
    pub fn new(id: impl Into<String>, file: FileInfo, started_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            file,
            progress: 0,
            status: UploadStatus::Uploading,
            error: None,
            started_at,
        }
    }
}

/// Build an upload ID from the file name and start time.
pub fn upload_id(file_name: &str, started_at: DateTime<Utc>) -> String {
    format!("{}-{}", file_name, started_at.timestamp_millis())
}

/// Top-level category of a MIME type.
pub fn mime_category(mime_type: &str) -> &str {
    mime_type.split('/').next().unwrap_or_default().trim()
}

/// Guess the MIME type of a file from its name.
pub fn guess_mime_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_status_terminal() {
        assert!(!UploadStatus::Uploading.is_terminal());
        assert!(!UploadStatus::Tagging.is_terminal());
        assert!(UploadStatus::Completed.is_terminal());
        assert!(UploadStatus::Error.is_terminal());
    }

    #[test]
    fn test_initial_state() {
        let started = Utc::now();
        let state = UploadState::new("a-1", FileInfo::new("a.txt", "text/plain", 3), started);

        assert_eq!(state.progress, 0);
        assert_eq!(state.status, UploadStatus::Uploading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_upload_id() {
        let started = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(upload_id("report.pdf", started), "report.pdf-1700000000123");
    }

    #[test]
    fn test_mime_category() {
        assert_eq!(mime_category("text/plain"), "text");
        assert_eq!(mime_category("image/svg+xml"), "image");
        assert_eq!(mime_category("application/pdf"), "application");
        assert_eq!(mime_category(""), "");
        assert_eq!(mime_category("weird"), "weird");
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("notes.txt"), "text/plain");
        assert_eq!(guess_mime_type("photo.PNG"), "image/png");
        assert_eq!(guess_mime_type("song.mp3"), "audio/mpeg");
        assert_eq!(guess_mime_type("no_extension"), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_blank_mime_type_defaults() {
        assert_eq!(FileInfo::new("LICENSE", "", 3).mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(FileInfo::new("LICENSE", "  ", 3).mime_type, DEFAULT_MIME_TYPE);
        assert_eq!(FileInfo::new("LICENSE", "", 3).category(), "application");
    }

    #[test]
    fn test_file_info_category() {
        assert_eq!(FileInfo::new("v.mp4", "video/mp4", 1).category(), "video");
    }

    #[test]
    fn test_state_serialization() {
        let mut state = UploadState::new("x", FileInfo::new("x", "text/plain", 1), Utc::now());
        state.status = UploadStatus::Error;
        state.error = Some("boom".to_string());
        let value = serde_json::to_value(&state).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["error"], "boom");
        assert_eq!(value["file"]["mimeType"], "text/plain");
    }
}
