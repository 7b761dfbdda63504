//! File node types for the CloudPilot tree.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Kind of entry in the file tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Pdf,
    Video,
    Audio,
    Document,
    Archive,
    Folder,
    #[default]
    Other,
}

impl FileType {
    /// Get the lowercase name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Archive => "archive",
            Self::Folder => "folder",
            Self::Other => "other",
        }
    }

    /// Map an upload category (the top-level part of a MIME type) to the
    /// type given to the node created for that upload.
    ///
    /// Only `image`, `video` and `audio` are kept; every other category,
    /// including an empty one, becomes [`FileType::Document`].
    pub fn from_upload_category(category: &str) -> Self {
        match category.trim().to_ascii_lowercase().as_str() {
            "image" => Self::Image,
            "video" => Self::Video,
            "audio" => Self::Audio,
            _ => Self::Document,
        }
    }

    /// Whether this is one of the media categories whose content is never
    /// fed to the tagging model as text.
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Image | Self::Video | Self::Audio)
    }
}

impl From<&str> for FileType {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "image" => Self::Image,
            "pdf" => Self::Pdf,
            "video" => Self::Video,
            "audio" => Self::Audio,
            "document" => Self::Document,
            "archive" => Self::Archive,
            "folder" => Self::Folder,
            "other" => Self::Other,
            _ => {
                tracing::warn!("file type {value} does not match any known type");
                Self::Other
            }
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file or folder in the tree.
///
/// Children are shared through [`Arc`] so that an immutable update only
/// allocates the nodes on the path to the changed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    /// Unique node ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Kind of entry.
    #[serde(rename = "type")]
    pub file_type: FileType,
    /// Size in bytes (absent for folders).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Tags in display order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Child nodes (folders only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<FileNode>>>,
    /// Hint for placeholder imagery.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_hint: Option<String>,
}

impl FileNode {
    /// Create a new folder with no children.
    pub fn folder(
        id: impl Into<String>,
        name: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            file_type: FileType::Folder,
            size: None,
            created_at: created_at.into(),
            tags: Vec::new(),
            children: Some(Vec::new()),
            ai_hint: None,
        }
    }

    /// Create a new file node.
    pub fn file(
        id: impl Into<String>,
        name: impl Into<String>,
        file_type: FileType,
        size: u64,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            file_type,
            size: Some(size),
            created_at: created_at.into(),
            tags: Vec::new(),
            children: None,
            ai_hint: None,
        }
    }

    /// Set the tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the children.
    pub fn with_children(mut self, children: Vec<FileNode>) -> Self {
        self.children = Some(children.into_iter().map(Arc::new).collect());
        self
    }

    /// Set the placeholder image hint.
    pub fn with_ai_hint(mut self, hint: impl Into<String>) -> Self {
        self.ai_hint = Some(hint.into());
        self
    }

    /// Check if this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.file_type == FileType::Folder
    }

    /// Children of this node, empty when absent.
    pub fn children(&self) -> &[Arc<FileNode>] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Check if the node carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Partial update merged into a node.
///
/// Only the fields that are set replace the node's values. The ID, type and
/// children of a node are never touched by an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeUpdate {
    /// New name.
    pub name: Option<String>,
    /// New tags.
    pub tags: Option<Vec<String>>,
    /// New size.
    pub size: Option<Option<u64>>,
    /// New placeholder image hint.
    pub ai_hint: Option<Option<String>>,
}

impl NodeUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the size.
    pub fn size(mut self, size: Option<u64>) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the placeholder image hint.
    pub fn ai_hint(mut self, hint: Option<impl Into<String>>) -> Self {
        self.ai_hint = Some(hint.map(Into::into));
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.tags.is_none() && self.size.is_none() && self.ai_hint.is_none()
    }

    /// Produce a copy of `node` with this update merged in.
    pub fn apply(&self, node: &FileNode) -> FileNode {
        let mut updated = node.clone();
        if let Some(ref name) = self.name {
            updated.name = name.clone();
        }
        if let Some(ref tags) = self.tags {
            updated.tags = tags.clone();
        }
        if let Some(size) = self.size {
            updated.size = size;
        }
        if let Some(ref hint) = self.ai_hint {
            updated.ai_hint = hint.clone();
        }
        updated
    }
}
