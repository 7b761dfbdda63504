//! Upload pipeline: simulated progress, content read, tagging, insertion.
//!
//! Each upload runs as its own task. Transitions for one upload are applied
//! in order; uploads never wait on each other.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::notify::Notification;
use super::BrowserInner;
use crate::data_uri;
use crate::datetime::now_rfc3339;
use crate::tagging::{generate_file_tags, TagRequest};
use crate::tree::{add_node, FileNode, FileType};
use crate::upload::{UploadFile, UploadStatus};

/// Error recorded when the file content cannot be read.
pub const READ_FAILED_MESSAGE: &str = "Failed to read file.";

/// Build a fresh node ID.
fn node_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("file-{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

/// Advance the simulated progress of an upload on every tick.
///
/// Stops by itself once progress reaches the cap or the upload leaves the
/// uploading state; the pipeline aborts it as soon as the content is read.
fn spawn_progress_ticker(inner: Arc<BrowserInner>, upload_id: String) -> JoinHandle<()> {
    let period = inner.upload_config.progress_interval();
    let step = inner.upload_config.progress_step;
    let cap = inner.upload_config.progress_cap;

    tokio::spawn(async move {
        let mut timer = interval_at(Instant::now() + period, period);
        loop {
            timer.tick().await;
            let advanced = inner
                .update_upload(&upload_id, |upload| {
                    if upload.status != UploadStatus::Uploading || upload.progress >= cap {
                        return false;
                    }
                    upload.progress = upload.progress.saturating_add(step).min(cap);
                    true
                })
                .await;
            if advanced != Some(true) {
                break;
            }
        }
    })
}

/// Move an upload to the error state and tell the user.
async fn fail(inner: &BrowserInner, upload_id: &str, message: String, notification: Notification) {
    let recorded = message.clone();
    inner
        .update_upload(upload_id, move |upload| {
            upload.status = UploadStatus::Error;
            upload.error = Some(recorded);
        })
        .await;
    inner.notifications.send(notification);
    warn!("Upload {} failed: {}", upload_id, message);
}

/// Drive one upload from start to completion or error.
///
/// `parent_id` is the folder that was open when the upload started.
pub(super) async fn run_upload(
    inner: Arc<BrowserInner>,
    upload_id: String,
    file: UploadFile,
    parent_id: Option<String>,
) {
    let ticker = spawn_progress_ticker(inner.clone(), upload_id.clone());

    let content = file.source.read().await;
    ticker.abort();
    // Cancellation is the expected outcome.
    let _ = ticker.await;

    let content = match content {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to read {}: {}", file.info.name, e);
            fail(
                &inner,
                &upload_id,
                READ_FAILED_MESSAGE.to_string(),
                Notification::upload_failed(READ_FAILED_MESSAGE),
            )
            .await;
            return;
        }
    };

    let tagging_progress = inner.upload_config.tagging_progress;
    inner
        .update_upload(&upload_id, |upload| {
            upload.progress = tagging_progress;
            upload.status = UploadStatus::Tagging;
        })
        .await;
    debug!("Upload {} read {} bytes, tagging", upload_id, content.len());

    let category = file.info.category().to_string();
    let request = TagRequest::new(
        data_uri::encode(&file.info.mime_type, &content),
        file.info.name.clone(),
        category.clone(),
    );
    let tags = match generate_file_tags(inner.generator.as_ref(), &request)
        .await
        .into_result()
    {
        Ok(tags) => tags,
        Err(message) => {
            let notification = Notification::tagging_failed(&message);
            fail(&inner, &upload_id, message, notification).await;
            return;
        }
    };

    let node = FileNode::file(
        node_id(),
        file.info.name.clone(),
        FileType::from_upload_category(&category),
        file.info.size,
        now_rfc3339(),
    )
    .with_tags(tags);
    let node_id = node.id.clone();

    let inserted = {
        let mut files = inner.files.write().await;
        add_node(&files, parent_id.as_deref(), node).map(|updated| {
            *files = Arc::new(updated);
        })
    };
    if let Err(e) = inserted {
        let message = format!("Failed to add file: {e}");
        let notification = Notification::upload_failed(&message);
        fail(&inner, &upload_id, message, notification).await;
        return;
    }

    inner
        .update_upload(&upload_id, |upload| {
            upload.progress = 100;
            upload.status = UploadStatus::Completed;
        })
        .await;
    info!(
        "Upload {} completed as node {} in {}",
        upload_id,
        node_id,
        parent_id.as_deref().unwrap_or("root")
    );

    let delay = inner.upload_config.completed_clear_delay();
    tokio::spawn(async move {
        sleep(delay).await;
        inner.remove_upload(&upload_id).await;
        debug!("Cleared completed upload {}", upload_id);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_shape() {
        let id = node_id();
        let parts: Vec<&str> = id.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "file");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
        assert_ne!(node_id(), node_id());
    }
}
