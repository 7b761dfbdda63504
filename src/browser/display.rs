//! Display summaries for node cards and upload progress cards.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::datetime::{format_datetime_default, format_distance_to_now};
use crate::tree::{FileNode, FileType};
use crate::upload::{UploadState, UploadStatus};

/// Number of tags shown on a card before collapsing the rest.
pub const VISIBLE_TAG_COUNT: usize = 3;

/// Image hint used for images without one.
const DEFAULT_IMAGE_HINT: &str = "file image";

const BYTE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Format a byte count for humans (1024 base, at most two decimals).
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, BYTE_UNITS[unit])
}

/// What a node card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeCard {
    pub id: String,
    pub name: String,
    pub file_type: FileType,
    /// Item count for folders, formatted size for files.
    pub subtitle: String,
    /// Tags shown as badges.
    pub visible_tags: Vec<String>,
    /// Number of tags not shown.
    pub hidden_tag_count: usize,
    /// Placeholder image hint (images only).
    pub image_hint: Option<String>,
    /// "Added 3 days ago".
    pub added: String,
    /// Creation time in the configured timezone.
    pub created_local: String,
    /// Whether download/rename/delete actions are offered.
    pub has_actions: bool,
}

impl NodeCard {
    /// Summarise `node` as seen at `now` in `timezone`.
    pub fn new(node: &FileNode, now: DateTime<Utc>, timezone: &str) -> Self {
        let subtitle = if node.is_folder() {
            format!("{} items", node.child_count())
        } else {
            format_bytes(node.size.unwrap_or(0))
        };

        let image_hint = (node.file_type == FileType::Image).then(|| {
            node.ai_hint
                .clone()
                .unwrap_or_else(|| DEFAULT_IMAGE_HINT.to_string())
        });

        let added = match format_distance_to_now(&node.created_at, now) {
            Some(distance) => format!("Added {distance}"),
            None => "Added at an unknown time".to_string(),
        };

        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            file_type: node.file_type,
            subtitle,
            visible_tags: node.tags.iter().take(VISIBLE_TAG_COUNT).cloned().collect(),
            hidden_tag_count: node.tags.len().saturating_sub(VISIBLE_TAG_COUNT),
            image_hint,
            added,
            created_local: format_datetime_default(&node.created_at, timezone),
            has_actions: !node.is_folder(),
        }
    }

    /// One-line text rendering.
    pub fn format(&self) -> String {
        let mut line = format!("[{}] {} ({})", self.file_type, self.name, self.subtitle);
        if !self.visible_tags.is_empty() {
            line.push_str(&format!(" #{}", self.visible_tags.join(" #")));
            if self.hidden_tag_count > 0 {
                line.push_str(&format!(" +{}", self.hidden_tag_count));
            }
        }
        line.push_str(&format!(" - {}", self.added));
        line
    }
}

/// What an upload progress card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCard {
    pub id: String,
    pub file_name: String,
    pub status: UploadStatus,
    pub status_text: String,
    pub size: String,
    pub progress: u8,
}

impl UploadCard {
    /// Summarise an upload.
    pub fn new(upload: &UploadState) -> Self {
        Self {
            id: upload.id.clone(),
            file_name: upload.file.name.clone(),
            status: upload.status,
            status_text: status_text(upload),
            size: format_bytes(upload.file.size),
            progress: upload.progress,
        }
    }

    /// One-line text rendering.
    pub fn format(&self) -> String {
        format!(
            "{} [{:>3}%] {} ({})",
            self.file_name, self.progress, self.status_text, self.size
        )
    }
}

fn status_text(upload: &UploadState) -> String {
    match upload.status {
        UploadStatus::Uploading => "Uploading...".to_string(),
        UploadStatus::Tagging => "AI is tagging your file...".to_string(),
        UploadStatus::Completed => "Completed".to_string(),
        UploadStatus::Error => upload
            .error
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "An error occurred".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::upload::FileInfo;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, 4, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(500), "500 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1204 * 1024), "1.18 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5 GB");
        assert_eq!(format_bytes(3 * 1024_u64.pow(5)), "3072 TB");
    }

    #[test]
    fn test_folder_card() {
        let folder = FileNode::folder("1", "Documents", "2023-10-01T10:00:00Z").with_children(vec![
            FileNode::file("a", "a", FileType::Document, 1, "2023-10-01T10:00:00Z"),
            FileNode::file("b", "b", FileType::Document, 1, "2023-10-01T10:00:00Z"),
        ]);
        let card = NodeCard::new(&folder, now(), "UTC");

        assert_eq!(card.subtitle, "2 items");
        assert_eq!(card.added, "Added 3 days ago");
        assert_eq!(card.created_local, "2023/10/01 10:00");
        assert!(!card.has_actions);
        assert!(card.image_hint.is_none());
    }

    #[test]
    fn test_file_card_tags() {
        let file = FileNode::file("2-1", "beach.jpg", FileType::Image, 4500 * 1024, "2023-10-04T09:58:00Z")
            .with_tags(["vacation", "spain", "travel", "personal"]);
        let card = NodeCard::new(&file, now(), "UTC");

        assert_eq!(card.subtitle, "4.39 MB");
        assert_eq!(card.visible_tags, vec!["vacation", "spain", "travel"]);
        assert_eq!(card.hidden_tag_count, 1);
        assert_eq!(card.image_hint.as_deref(), Some("file image"));
        assert_eq!(card.added, "Added 2 minutes ago");
        assert!(card.has_actions);
        assert!(card.format().contains("#vacation #spain #travel +1"));
    }

    #[test]
    fn test_image_hint_from_node() {
        let file = FileNode::file("x", "x.png", FileType::Image, 1, "2023-10-01T10:00:00Z")
            .with_ai_hint("family dinner");
        let card = NodeCard::new(&file, now(), "UTC");
        assert_eq!(card.image_hint.as_deref(), Some("family dinner"));
    }

    #[test]
    fn test_upload_card_status_text() {
        let mut upload = UploadState::new("u", FileInfo::new("a.txt", "text/plain", 2048), now());
        assert_eq!(UploadCard::new(&upload).status_text, "Uploading...");
        assert_eq!(UploadCard::new(&upload).size, "2 KB");

        upload.status = UploadStatus::Tagging;
        assert_eq!(UploadCard::new(&upload).status_text, "AI is tagging your file...");

        upload.status = UploadStatus::Completed;
        assert_eq!(UploadCard::new(&upload).status_text, "Completed");

        upload.status = UploadStatus::Error;
        assert_eq!(UploadCard::new(&upload).status_text, "An error occurred");

        upload.error = Some("Failed to generate tags.".to_string());
        assert_eq!(UploadCard::new(&upload).status_text, "Failed to generate tags.");
    }
}
