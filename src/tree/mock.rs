//! Sample tree used to seed a browser session.

use std::sync::Arc;

use super::node::{FileNode, FileType};
use super::ops::Forest;

const KB: u64 = 1024;
const MB: u64 = 1024 * 1024;

/// Build the sample tree: two folders with two files each, followed by
/// three root-level files.
pub fn mock_files() -> Forest {
    let documents = FileNode::folder("1", "Documents", "2023-10-01T10:00:00Z").with_children(vec![
        FileNode::file(
            "1-1",
            "Project Proposal.pdf",
            FileType::Pdf,
            1204 * KB,
            "2023-10-01T10:05:00Z",
        )
        .with_tags(["project", "work", "proposal"]),
        FileNode::file(
            "1-2",
            "Meeting Notes.docx",
            FileType::Document,
            50 * KB,
            "2023-10-02T14:30:00Z",
        )
        .with_tags(["meeting", "work"]),
    ]);

    let photos = FileNode::folder("2", "Photos", "2023-10-01T11:00:00Z").with_children(vec![
        FileNode::file(
            "2-1",
            "vacation-spain.jpg",
            FileType::Image,
            4500 * KB,
            "2023-09-15T18:20:00Z",
        )
        .with_tags(["vacation", "spain", "travel", "personal"])
        .with_ai_hint("beach sunset"),
        FileNode::file(
            "2-2",
            "family-gathering.png",
            FileType::Image,
            3200 * KB,
            "2023-08-20T16:45:00Z",
        )
        .with_tags(["family", "personal", "event"])
        .with_ai_hint("family dinner"),
    ]);

    vec![
        documents,
        photos,
        FileNode::file(
            "3",
            "System Design.pdf",
            FileType::Pdf,
            8300 * KB,
            "2023-10-03T09:00:00Z",
        )
        .with_tags(["work", "architecture", "system design"]),
        FileNode::file("4", "logo.svg", FileType::Image, 15 * KB, "2023-09-28T12:00:00Z")
            .with_tags(["design", "logo", "branding"])
            .with_ai_hint("abstract logo"),
        FileNode::file(
            "5",
            "Product-demo.mp4",
            FileType::Video,
            150 * MB,
            "2023-10-04T17:00:00Z",
        )
        .with_tags(["demo", "product", "video"]),
    ]
    .into_iter()
    .map(Arc::new)
    .collect()
}
