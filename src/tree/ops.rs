//! Immutable operations over a forest of file nodes.
//!
//! Every mutation returns a new forest. Nodes that are not on the path to
//! the changed node are shared with the input through their `Arc`.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use super::node::{FileNode, NodeUpdate};
use super::MAX_TREE_DEPTH;

/// A forest of file nodes (the root sequence of the tree).
pub type Forest = Vec<Arc<FileNode>>;

/// Errors raised by tree mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The requested parent does not exist.
    #[error("parent node {0} not found")]
    ParentNotFound(String),

    /// The requested parent is not a folder.
    #[error("node {0} is not a folder")]
    NotAFolder(String),

    /// The insertion would exceed the maximum tree depth.
    #[error("tree depth limit of {limit} exceeded")]
    TooDeep { limit: usize },
}

/// Locate the first node (pre-order) with the given ID and return the
/// child indices leading to it from the root sequence.
fn locate(tree: &[Arc<FileNode>], id: &str) -> Option<Vec<usize>> {
    let mut indices: Vec<usize> = Vec::new();
    let mut stack = vec![tree.iter().enumerate()];

    while let Some(level) = stack.last_mut() {
        match level.next() {
            Some((index, node)) => {
                if node.id == id {
                    indices.push(index);
                    return Some(indices);
                }
                if let Some(children) = &node.children {
                    indices.push(index);
                    stack.push(children.iter().enumerate());
                }
            }
            None => {
                stack.pop();
                indices.pop();
            }
        }
    }

    None
}

/// Find the chain of nodes from a root down to and including the node with
/// the given ID.
///
/// Returns an empty vector if no node matches.
pub fn find_path(tree: &[Arc<FileNode>], id: &str) -> Vec<Arc<FileNode>> {
    let Some(indices) = locate(tree, id) else {
        return Vec::new();
    };

    let mut path = Vec::with_capacity(indices.len());
    let mut level = tree;
    for index in indices {
        let node = &level[index];
        path.push(Arc::clone(node));
        level = node.children();
    }
    path
}

/// Find the first node (depth-first, pre-order) with the given ID.
pub fn find_node<'a>(tree: &'a [Arc<FileNode>], id: &str) -> Option<&'a Arc<FileNode>> {
    let mut stack = vec![tree.iter()];

    while let Some(level) = stack.last_mut() {
        match level.next() {
            Some(node) => {
                if node.id == id {
                    return Some(node);
                }
                if let Some(children) = &node.children {
                    stack.push(children.iter());
                }
            }
            None => {
                stack.pop();
            }
        }
    }

    None
}

/// Child index paths of every node with the given ID, in pre-order.
///
/// Matches are not searched for inside another match.
fn locate_all(tree: &[Arc<FileNode>], id: &str) -> Vec<Vec<usize>> {
    let mut found = Vec::new();
    let mut indices: Vec<usize> = Vec::new();
    let mut stack = vec![tree.iter().enumerate()];

    while let Some(level) = stack.last_mut() {
        match level.next() {
            Some((index, node)) => {
                if node.id == id {
                    let mut path = indices.clone();
                    path.push(index);
                    found.push(path);
                } else if let Some(children) = &node.children {
                    indices.push(index);
                    stack.push(children.iter().enumerate());
                }
            }
            None => {
                stack.pop();
                indices.pop();
            }
        }
    }

    found
}

/// Rebuild the ancestors of the node at `indices`, replacing that node with
/// `replacement` or removing it when `None`.
///
/// Works bottom-up without recursion. Nodes off the path are shared.
fn rebuild(
    tree: &[Arc<FileNode>],
    indices: &[usize],
    replacement: Option<Arc<FileNode>>,
) -> Forest {
    let mut levels = Vec::with_capacity(indices.len());
    let mut level = tree;
    for &index in indices {
        levels.push(level);
        level = level[index].children();
    }

    let mut replacement = replacement;
    let mut result = tree.to_vec();
    for (depth, &index) in indices.iter().enumerate().rev() {
        let mut siblings = levels[depth].to_vec();
        match replacement.take() {
            Some(node) => siblings[index] = node,
            None => {
                siblings.remove(index);
            }
        }
        if depth == 0 {
            result = siblings;
        } else {
            let parent = &levels[depth - 1][indices[depth - 1]];
            replacement = Some(Arc::new(FileNode {
                children: Some(siblings),
                ..(**parent).clone()
            }));
        }
    }
    result
}

/// Return a new forest where the node with the given ID has `update`
/// merged into it.
///
/// Ancestors of the updated node are replaced; everything else is shared.
/// If no node matches, the result equals the input.
pub fn update_node(tree: &[Arc<FileNode>], id: &str, update: &NodeUpdate) -> Forest {
    let mut result = tree.to_vec();
    for indices in locate_all(tree, id) {
        let target = node_at(&result, &indices);
        let updated = Arc::new(update.apply(target));
        result = rebuild(&result, &indices, Some(updated));
    }
    result
}

/// Return a new forest with every node carrying the given ID removed,
/// together with its subtree.
///
/// If no node matches, the result equals the input.
pub fn delete_node(tree: &[Arc<FileNode>], id: &str) -> Forest {
    let mut result = tree.to_vec();
    // Later matches first, so removals never shift an unprocessed path.
    for indices in locate_all(tree, id).iter().rev() {
        result = rebuild(&result, indices, None);
    }
    result
}

/// The node at a non-empty child index path.
fn node_at<'a>(tree: &'a [Arc<FileNode>], indices: &[usize]) -> &'a Arc<FileNode> {
    indices
        .iter()
        .skip(1)
        .fold(&tree[indices[0]], |node, &index| &node.children()[index])
}

/// Return a new forest with `new_node` appended.
///
/// With no parent the node is appended to the root sequence. Otherwise it is
/// appended to the children of the first folder with the given ID.
///
/// # Errors
///
/// - [`TreeError::ParentNotFound`] if no node has the parent ID
/// - [`TreeError::NotAFolder`] if the parent is not a folder
/// - [`TreeError::TooDeep`] if the node would sit deeper than [`MAX_TREE_DEPTH`]
pub fn add_node(
    tree: &[Arc<FileNode>],
    parent_id: Option<&str>,
    new_node: FileNode,
) -> Result<Forest, TreeError> {
    let Some(parent_id) = parent_id else {
        let mut result = tree.to_vec();
        result.push(Arc::new(new_node));
        return Ok(result);
    };

    let indices =
        locate(tree, parent_id).ok_or_else(|| TreeError::ParentNotFound(parent_id.to_string()))?;

    let parent = node_at(tree, &indices);
    if !parent.is_folder() {
        return Err(TreeError::NotAFolder(parent_id.to_string()));
    }

    if indices.len() + 1 > MAX_TREE_DEPTH {
        return Err(TreeError::TooDeep {
            limit: MAX_TREE_DEPTH,
        });
    }

    let mut updated = (**parent).clone();
    updated
        .children
        .get_or_insert_with(Vec::new)
        .push(Arc::new(new_node));
    Ok(rebuild(tree, &indices, Some(Arc::new(updated))))
}

/// Collect every distinct tag in the tree, in first-seen (pre-order) order.
pub fn collect_tags(tree: &[Arc<FileNode>]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    let mut stack = vec![tree.iter()];

    while let Some(level) = stack.last_mut() {
        match level.next() {
            Some(node) => {
                for tag in &node.tags {
                    if seen.insert(tag.as_str()) {
                        tags.push(tag.clone());
                    }
                }
                if let Some(children) = &node.children {
                    stack.push(children.iter());
                }
            }
            None => {
                stack.pop();
            }
        }
    }

    tags
}
