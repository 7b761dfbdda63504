//! CloudPilot - an in-memory file browser with AI tagging.
//!
//! A session holds a small file tree, lets the user navigate, search and
//! filter it, and uploads files whose tags are generated by a language model.

pub mod browser;
pub mod config;
pub mod data_uri;
pub mod datetime;
pub mod error;
pub mod logging;
pub mod tagging;
pub mod tree;
pub mod upload;

pub use browser::{
    format_bytes, FileBrowser, Navigation, NodeCard, Notification, NotificationVariant,
    UploadCard,
};
pub use config::Config;
pub use error::{CloudPilotError, Result};
pub use tagging::{
    generate_file_tags, GeminiTagGenerator, TagGenerator, TagRequest, TagResponse,
};
pub use tree::{FileNode, FileType, Forest, NodeUpdate, TreeError};
pub use upload::{FileInfo, FileSource, UploadFile, UploadState, UploadStatus};
