//! File browser session for CloudPilot.
//!
//! This module provides:
//! - The state container owning the tree, navigation and active uploads
//! - Listing derivation (folder contents, search, tag filters, breadcrumbs)
//! - The upload pipeline with simulated progress and AI tagging
//! - Notifications and display summaries
//!
//! State is replaced wholesale on every mutation. Readers get cheap
//! snapshots (`Arc` clones) that never change under them.

mod display;
mod notify;
mod pipeline;
mod view;

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::config::{Config, UploadConfig};
use crate::error::{CloudPilotError, Result};
use crate::tagging::TagGenerator;
use crate::tree::{
    collect_tags, delete_node, find_node, find_path, mock_files, update_node, FileNode,
};
use crate::tree::{Forest, NodeUpdate};
use crate::upload::{upload_id, UploadFile, UploadState, UploadStatus};

pub use display::{format_bytes, NodeCard, UploadCard, VISIBLE_TAG_COUNT};
pub use notify::{Notification, NotificationHub, NotificationVariant};
pub use pipeline::READ_FAILED_MESSAGE;
pub use view::{
    breadcrumbs, displayed_nodes, filter_nodes, folder_contents, matches_query, matches_tags,
    Navigation,
};

/// Shared state behind a [`FileBrowser`] handle.
struct BrowserInner {
    files: RwLock<Arc<Forest>>,
    navigation: RwLock<Navigation>,
    uploads: RwLock<Arc<Vec<UploadState>>>,
    generator: Arc<dyn TagGenerator>,
    upload_config: UploadConfig,
    timezone: String,
    notifications: NotificationHub,
}

impl BrowserInner {
    /// Apply `f` to the upload with the given ID, copy-on-write.
    ///
    /// Returns `None` if the upload is no longer in the active set.
    async fn update_upload<F, R>(&self, upload_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut UploadState) -> R,
    {
        let mut uploads = self.uploads.write().await;
        let index = uploads.iter().position(|u| u.id == upload_id)?;
        let list = Arc::make_mut(&mut *uploads);
        Some(f(&mut list[index]))
    }

    /// Drop an upload from the active set.
    async fn remove_upload(&self, upload_id: &str) -> Option<UploadState> {
        let mut uploads = self.uploads.write().await;
        let index = uploads.iter().position(|u| u.id == upload_id)?;
        Some(Arc::make_mut(&mut *uploads).remove(index))
    }
}

/// A file browsing session.
///
/// Cloning the handle shares the session.
#[derive(Clone)]
pub struct FileBrowser {
    inner: Arc<BrowserInner>,
}

impl FileBrowser {
    /// Create a session from configuration.
    ///
    /// The tree starts with the sample files when `browser.seed_mock_data`
    /// is set, empty otherwise.
    pub fn new(config: &Config, generator: Arc<dyn TagGenerator>) -> Self {
        let files = if config.browser.seed_mock_data {
            mock_files()
        } else {
            Forest::new()
        };
        Self::with_files(config, generator, files)
    }

    /// Create a session over the given tree.
    pub fn with_files(config: &Config, generator: Arc<dyn TagGenerator>, files: Forest) -> Self {
        Self {
            inner: Arc::new(BrowserInner {
                files: RwLock::new(Arc::new(files)),
                navigation: RwLock::new(Navigation::default()),
                uploads: RwLock::new(Arc::new(Vec::new())),
                generator,
                upload_config: config.upload.clone(),
                timezone: config.browser.timezone.clone(),
                notifications: NotificationHub::new(),
            }),
        }
    }

    /// Snapshot of the whole tree.
    pub async fn files(&self) -> Arc<Forest> {
        self.inner.files.read().await.clone()
    }

    /// Find a node anywhere in the tree.
    pub async fn find(&self, id: &str) -> Option<Arc<FileNode>> {
        find_node(&self.inner.files.read().await, id).cloned()
    }

    /// Snapshot of the navigation state.
    pub async fn navigation(&self) -> Navigation {
        self.inner.navigation.read().await.clone()
    }

    /// Subscribe to notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.inner.notifications.subscribe()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Open a folder.
    ///
    /// The current path becomes the folder's ancestor chain, so breadcrumbs
    /// always match the path.
    pub async fn open_folder(&self, id: &str) -> Result<()> {
        let path = find_path(&self.files().await, id);
        let node = path
            .last()
            .ok_or_else(|| CloudPilotError::NotFound(format!("node {id}")))?;
        if !node.is_folder() {
            return Err(CloudPilotError::Validation(format!(
                "{} is not a folder",
                node.name
            )));
        }

        self.inner.navigation.write().await.current_path =
            path.iter().map(|n| n.id.clone()).collect();
        debug!("Opened folder {}", id);
        Ok(())
    }

    /// Go back to the breadcrumb at `index` (0 is the outermost folder).
    pub async fn open_breadcrumb(&self, index: usize) {
        self.inner
            .navigation
            .write()
            .await
            .current_path
            .truncate(index.saturating_add(1));
    }

    /// Go back to the root.
    pub async fn go_home(&self) {
        self.inner.navigation.write().await.current_path.clear();
    }

    /// The open folder, or `None` at the root or when it no longer exists.
    pub async fn current_folder(&self) -> Option<Arc<FileNode>> {
        let folder_id = self.inner.navigation.read().await.current_folder_id()?.to_string();
        self.find(&folder_id).await
    }

    /// Breadcrumb trail down to the open folder.
    pub async fn breadcrumbs(&self) -> Vec<Arc<FileNode>> {
        let navigation = self.navigation().await;
        breadcrumbs(&self.files().await, &navigation)
    }

    // ------------------------------------------------------------------
    // Search and filters
    // ------------------------------------------------------------------

    /// Set the name search text.
    pub async fn set_search_query(&self, query: impl Into<String>) {
        self.inner.navigation.write().await.search_query = query.into();
    }

    /// Select a tag filter, or deselect it if already selected.
    pub async fn toggle_tag(&self, tag: &str) {
        self.inner.navigation.write().await.toggle_tag(tag);
    }

    /// Deselect every tag filter.
    pub async fn clear_tags(&self) {
        self.inner.navigation.write().await.selected_tags.clear();
    }

    /// Nodes shown for the current folder, search and tag filters.
    pub async fn displayed_files(&self) -> Vec<Arc<FileNode>> {
        let navigation = self.navigation().await;
        displayed_nodes(&self.files().await, &navigation)
    }

    /// Every distinct tag in the tree.
    pub async fn all_tags(&self) -> Vec<String> {
        collect_tags(&self.files().await)
    }

    /// Card summaries of the displayed nodes.
    pub async fn node_cards(&self) -> Vec<NodeCard> {
        let now = Utc::now();
        self.displayed_files()
            .await
            .iter()
            .map(|node| NodeCard::new(node, now, &self.inner.timezone))
            .collect()
    }

    // ------------------------------------------------------------------
    // File actions
    // ------------------------------------------------------------------

    /// Rename a node.
    pub async fn rename(&self, id: &str, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(CloudPilotError::Validation("name cannot be empty".to_string()));
        }
        if new_name.chars().any(|c| c.is_control()) {
            return Err(CloudPilotError::Validation(
                "name contains invalid characters".to_string(),
            ));
        }

        let old_name = {
            let mut files = self.inner.files.write().await;
            let old_name = find_node(&files, id)
                .map(|node| node.name.clone())
                .ok_or_else(|| CloudPilotError::NotFound(format!("node {id}")))?;
            *files = Arc::new(update_node(&files, id, &NodeUpdate::new().name(new_name)));
            old_name
        };

        info!("Renamed {} from {:?} to {:?}", id, old_name, new_name);
        self.inner
            .notifications
            .send(Notification::renamed(&old_name, new_name));
        Ok(())
    }

    /// Delete a node and everything below it.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let name = {
            let mut files = self.inner.files.write().await;
            let name = find_node(&files, id)
                .map(|node| node.name.clone())
                .ok_or_else(|| CloudPilotError::NotFound(format!("node {id}")))?;
            *files = Arc::new(delete_node(&files, id));
            name
        };

        info!("Deleted {} ({:?})", id, name);
        self.inner.notifications.send(Notification::deleted(&name));
        Ok(())
    }

    /// Ask for a file to be downloaded.
    ///
    /// Only a notification is raised; no transfer takes place.
    pub async fn request_download(&self, id: &str) -> Result<()> {
        let node = self
            .find(id)
            .await
            .ok_or_else(|| CloudPilotError::NotFound(format!("node {id}")))?;
        if node.is_folder() {
            return Err(CloudPilotError::Validation(format!(
                "{} is a folder and cannot be downloaded",
                node.name
            )));
        }

        self.inner
            .notifications
            .send(Notification::download(&node.name));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Uploads
    // ------------------------------------------------------------------

    /// Start uploading a file into the open folder.
    ///
    /// Returns the upload ID immediately; the upload continues in the
    /// background. Must be called from within a Tokio runtime.
    pub async fn upload(&self, file: UploadFile) -> String {
        let parent_id = self
            .inner
            .navigation
            .read()
            .await
            .current_folder_id()
            .map(str::to_string);
        let started_at = Utc::now();

        let id = {
            let mut uploads = self.inner.uploads.write().await;
            let base = upload_id(&file.info.name, started_at);
            let mut id = base.clone();
            let mut n = 1;
            while uploads.iter().any(|u| u.id == id) {
                id = format!("{base}-{n}");
                n += 1;
            }
            Arc::make_mut(&mut *uploads).push(UploadState::new(
                id.clone(),
                file.info.clone(),
                started_at,
            ));
            id
        };

        info!(
            "Upload {} started ({}, {} bytes) into {}",
            id,
            file.info.mime_type,
            file.info.size,
            parent_id.as_deref().unwrap_or("root")
        );
        tokio::spawn(pipeline::run_upload(
            self.inner.clone(),
            id.clone(),
            file,
            parent_id,
        ));
        id
    }

    /// Snapshot of the active uploads, in start order.
    pub async fn uploads(&self) -> Arc<Vec<UploadState>> {
        self.inner.uploads.read().await.clone()
    }

    /// State of one upload.
    pub async fn upload_state(&self, upload_id: &str) -> Option<UploadState> {
        self.inner
            .uploads
            .read()
            .await
            .iter()
            .find(|u| u.id == upload_id)
            .cloned()
    }

    /// Check if any upload is still uploading or tagging.
    pub async fn has_active_uploads(&self) -> bool {
        self.inner
            .uploads
            .read()
            .await
            .iter()
            .any(|u| !u.status.is_terminal())
    }

    /// Card summaries of the active uploads.
    pub async fn upload_cards(&self) -> Vec<UploadCard> {
        self.uploads().await.iter().map(UploadCard::new).collect()
    }

    /// Remove a failed upload from the active set.
    pub async fn dismiss_upload(&self, upload_id: &str) -> Result<()> {
        let mut uploads = self.inner.uploads.write().await;
        let index = uploads
            .iter()
            .position(|u| u.id == upload_id)
            .ok_or_else(|| CloudPilotError::NotFound(format!("upload {upload_id}")))?;
        if uploads[index].status != UploadStatus::Error {
            return Err(CloudPilotError::Validation(format!(
                "upload {upload_id} is {} and cannot be dismissed",
                uploads[index].status.as_str()
            )));
        }

        Arc::make_mut(&mut *uploads).remove(index);
        debug!("Dismissed upload {}", upload_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::future::BoxFuture;

    use super::*;
    use crate::tagging::TagRequest;

    struct NoTags;

    impl TagGenerator for NoTags {
        fn generate_tags<'a>(&'a self, _request: &'a TagRequest) -> BoxFuture<'a, Result<Vec<String>>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    fn browser() -> FileBrowser {
        FileBrowser::new(&Config::default(), Arc::new(NoTags))
    }

    #[tokio::test]
    async fn test_seeded_or_empty() {
        assert_eq!(browser().files().await.len(), 5);

        let mut config = Config::default();
        config.browser.seed_mock_data = false;
        let empty = FileBrowser::new(&config, Arc::new(NoTags));
        assert!(empty.files().await.is_empty());
        assert!(empty.all_tags().await.is_empty());
    }

    #[tokio::test]
    async fn test_navigation() {
        let browser = browser();
        browser.open_folder("1").await.unwrap();
        assert_eq!(browser.current_folder().await.unwrap().name, "Documents");
        assert_eq!(browser.breadcrumbs().await.len(), 1);

        assert!(matches!(
            browser.open_folder("1-1").await,
            Err(CloudPilotError::Validation(_))
        ));
        assert!(matches!(
            browser.open_folder("nope").await,
            Err(CloudPilotError::NotFound(_))
        ));

        browser.go_home().await;
        assert!(browser.current_folder().await.is_none());
        assert_eq!(browser.displayed_files().await.len(), 5);
    }

    fn nested_browser() -> FileBrowser {
        let created = "2024-01-01T00:00:00Z";
        let acme = FileNode::folder("c", "Acme", created);
        let clients = FileNode::folder("b", "Clients", created).with_children(vec![acme]);
        let work = FileNode::folder("a", "Work", created).with_children(vec![clients]);
        let tree = vec![Arc::new(work)];
        FileBrowser::with_files(&Config::default(), Arc::new(NoTags), tree)
    }

    #[tokio::test]
    async fn test_open_folder_follows_ancestors() {
        let browser = browser();
        browser.open_folder("1").await.unwrap();
        browser.open_folder("2").await.unwrap();
        assert_eq!(browser.navigation().await.current_path, vec!["2"]);
        assert_eq!(browser.breadcrumbs().await[0].name, "Photos");

        browser.open_breadcrumb(0).await;
        assert_eq!(browser.current_folder().await.unwrap().name, "Photos");
    }

    #[tokio::test]
    async fn test_open_breadcrumb_truncates() {
        let browser = nested_browser();
        browser.open_folder("c").await.unwrap();
        assert_eq!(browser.navigation().await.current_path, vec!["a", "b", "c"]);

        browser.open_breadcrumb(0).await;
        assert_eq!(browser.navigation().await.current_path, vec!["a"]);

        browser.open_breadcrumb(5).await;
        assert_eq!(browser.navigation().await.current_path, vec!["a"]);
    }

    #[tokio::test]
    async fn test_breadcrumb_index_opens_that_crumb() {
        let browser = nested_browser();
        browser.open_folder("a").await.unwrap();
        browser.open_folder("c").await.unwrap();

        let crumbs = browser.breadcrumbs().await;
        assert_eq!(crumbs.len(), 3);
        for index in (0..crumbs.len()).rev() {
            browser.open_breadcrumb(index).await;
            assert_eq!(browser.current_folder().await.unwrap().id, crumbs[index].id);
            assert_eq!(browser.breadcrumbs().await.len(), index + 1);
        }
    }

    #[tokio::test]
    async fn test_rename_validation() {
        let browser = browser();
        assert!(matches!(
            browser.rename("1-1", "   ").await,
            Err(CloudPilotError::Validation(_))
        ));
        assert!(matches!(
            browser.rename("1-1", "a\nb").await,
            Err(CloudPilotError::Validation(_))
        ));
        assert!(matches!(
            browser.rename("missing", "x").await,
            Err(CloudPilotError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_trims_and_notifies() {
        let browser = browser();
        let mut notifications = browser.subscribe();

        browser.rename("1-1", "  Final Proposal.pdf ").await.unwrap();
        assert_eq!(browser.find("1-1").await.unwrap().name, "Final Proposal.pdf");

        let notification = notifications.recv().await.unwrap();
        assert_eq!(
            notification.description,
            "\"Project Proposal.pdf\" was renamed to \"Final Proposal.pdf\"."
        );
    }

    #[tokio::test]
    async fn test_delete_folder_removes_subtree() {
        let browser = browser();
        browser.delete("2").await.unwrap();

        assert!(browser.find("2").await.is_none());
        assert!(browser.find("2-1").await.is_none());
        assert!(!browser.all_tags().await.contains(&"vacation".to_string()));
        assert!(matches!(
            browser.delete("2").await,
            Err(CloudPilotError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_download_files_only() {
        let browser = browser();
        let mut notifications = browser.subscribe();

        browser.request_download("3").await.unwrap();
        assert_eq!(notifications.recv().await.unwrap().title, "Preparing Download");
        assert!(matches!(
            browser.request_download("1").await,
            Err(CloudPilotError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_is_stable() {
        let browser = browser();
        let before = browser.files().await;
        browser.delete("3").await.unwrap();

        assert_eq!(before.len(), 5);
        assert_eq!(browser.files().await.len(), 4);
    }

    #[tokio::test]
    async fn test_dismiss_unknown_upload() {
        let browser = browser();
        assert!(matches!(
            browser.dismiss_upload("nope").await,
            Err(CloudPilotError::NotFound(_))
        ));
    }
}
