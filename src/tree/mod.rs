//! In-memory file tree for CloudPilot.
//!
//! This module provides:
//! - File and folder node types
//! - Immutable find/update/delete/insert operations keyed by node ID
//! - The sample tree a session starts with

mod mock;
mod node;
mod ops;

pub use mock::mock_files;
pub use node::{FileNode, FileType, NodeUpdate};
pub use ops::{
    add_node, collect_tags, delete_node, find_node, find_path, update_node, Forest, TreeError,
};

/// Maximum depth of a node (root nodes have depth 1).
pub const MAX_TREE_DEPTH: usize = 32;
