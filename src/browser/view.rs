//! Derivation of the displayed listing from the tree and navigation state.

use std::sync::Arc;

use crate::tree::{find_node, find_path, FileNode};

/// Navigation and filter state of a browsing session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    /// IDs of the opened folders, outermost first.
    pub current_path: Vec<String>,
    /// Name search text. Empty means no filtering.
    pub search_query: String,
    /// Selected tag filters, in selection order.
    pub selected_tags: Vec<String>,
}

impl Navigation {
    /// ID of the innermost open folder, or `None` at the root.
    pub fn current_folder_id(&self) -> Option<&str> {
        self.current_path.last().map(String::as_str)
    }

    /// Add `tag` to the filter if absent, remove it if present.
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.selected_tags.iter().position(|t| t == tag) {
            self.selected_tags.remove(pos);
        } else {
            self.selected_tags.push(tag.to_string());
        }
    }
}

/// Nodes listed in the open folder (the root sequence when none is open).
///
/// A folder that no longer exists lists nothing.
pub fn folder_contents(tree: &[Arc<FileNode>], folder_id: Option<&str>) -> Vec<Arc<FileNode>> {
    match folder_id {
        None => tree.to_vec(),
        Some(id) => find_node(tree, id)
            .map(|folder| folder.children().to_vec())
            .unwrap_or_default(),
    }
}

/// Case-insensitive substring match on the node name.
pub fn matches_query(node: &FileNode, query: &str) -> bool {
    query.is_empty() || node.name.to_lowercase().contains(&query.to_lowercase())
}

/// Check that the node carries every selected tag.
pub fn matches_tags(node: &FileNode, selected_tags: &[String]) -> bool {
    selected_tags.iter().all(|tag| node.has_tag(tag))
}

/// Apply the name filter, then the tag filter.
pub fn filter_nodes(
    nodes: Vec<Arc<FileNode>>,
    query: &str,
    selected_tags: &[String],
) -> Vec<Arc<FileNode>> {
    nodes
        .into_iter()
        .filter(|node| matches_query(node, query))
        .filter(|node| matches_tags(node, selected_tags))
        .collect()
}

/// Nodes to display for the given navigation state.
pub fn displayed_nodes(tree: &[Arc<FileNode>], navigation: &Navigation) -> Vec<Arc<FileNode>> {
    filter_nodes(
        folder_contents(tree, navigation.current_folder_id()),
        &navigation.search_query,
        &navigation.selected_tags,
    )
}

/// Breadcrumb trail from a root node down to the open folder.
pub fn breadcrumbs(tree: &[Arc<FileNode>], navigation: &Navigation) -> Vec<Arc<FileNode>> {
    navigation
        .current_folder_id()
        .map(|id| find_path(tree, id))
        .unwrap_or_default()
}
