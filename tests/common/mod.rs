//! Test helpers for browser and upload tests.
//!
//! Provides scripted tag generators, delayed file sources and helper
//! functions for driving a FileBrowser session.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::Semaphore;
use tokio::time::{sleep, timeout, Instant};

use cloudpilot::upload::FileInfo;
use cloudpilot::{
    CloudPilotError, Config, FileBrowser, FileNode, FileSource, Result, TagGenerator, TagRequest,
    UploadFile,
};

/// Default timeout for waiting on uploads.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Tag generator returning a fixed outcome and recording every request.
pub struct ScriptedGenerator {
    outcome: std::result::Result<Vec<String>, String>,
    requests: Mutex<Vec<TagRequest>>,
}

impl ScriptedGenerator {
    /// Generator that always succeeds with `tags`.
    pub fn ok(tags: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(tags.iter().map(|t| t.to_string()).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Generator that always fails with `message`.
    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<TagRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl TagGenerator for ScriptedGenerator {
    fn generate_tags<'a>(&'a self, request: &'a TagRequest) -> BoxFuture<'a, Result<Vec<String>>> {
        self.requests.lock().unwrap().push(request.clone());
        let outcome = self.outcome.clone().map_err(CloudPilotError::Tagging);
        Box::pin(async move { outcome })
    }
}

/// Tag generator that holds every call until released.
pub struct GatedGenerator {
    tags: Vec<String>,
    gate: Semaphore,
}

impl GatedGenerator {
    pub fn new(tags: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            tags: tags.iter().map(|t| t.to_string()).collect(),
            gate: Semaphore::new(0),
        })
    }

    /// Let one pending (or future) call finish.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

impl TagGenerator for GatedGenerator {
    fn generate_tags<'a>(&'a self, _request: &'a TagRequest) -> BoxFuture<'a, Result<Vec<String>>> {
        Box::pin(async move {
            self.gate
                .acquire()
                .await
                .map_err(|e| CloudPilotError::Tagging(e.to_string()))?
                .forget();
            Ok(self.tags.clone())
        })
    }
}

/// File source that takes `delay` to produce its content, or fails.
pub struct DelayedSource {
    delay: Duration,
    content: Option<Vec<u8>>,
}

impl FileSource for DelayedSource {
    fn read(&self) -> BoxFuture<'_, std::io::Result<Vec<u8>>> {
        Box::pin(async move {
            sleep(self.delay).await;
            self.content.clone().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "read aborted")
            })
        })
    }
}

/// Create a browser over the sample tree with default configuration.
pub fn browser_with(generator: Arc<dyn TagGenerator>) -> FileBrowser {
    FileBrowser::new(&Config::default(), generator)
}

/// In-memory text file.
pub fn text_file(name: &str, content: &str) -> UploadFile {
    UploadFile::from_bytes(name, Some("text/plain"), content.as_bytes().to_vec())
}

/// File whose content becomes available after `delay`.
pub fn delayed_file(name: &str, mime_type: &str, content: &[u8], delay: Duration) -> UploadFile {
    UploadFile::new(
        FileInfo::new(name, mime_type, content.len() as u64),
        Arc::new(DelayedSource {
            delay,
            content: Some(content.to_vec()),
        }),
    )
}

/// File whose read fails after `delay`.
pub fn unreadable_file(name: &str, delay: Duration) -> UploadFile {
    UploadFile::new(
        FileInfo::new(name, "text/plain", 10),
        Arc::new(DelayedSource {
            delay,
            content: None,
        }),
    )
}

/// Let (possibly paused) time move forward.
pub async fn advance(ms: u64) {
    sleep(Duration::from_millis(ms)).await;
}

/// Wait until no upload is uploading or tagging.
pub async fn wait_until_settled(browser: &FileBrowser) {
    let deadline = Instant::now() + DEFAULT_TIMEOUT;
    timeout(DEFAULT_TIMEOUT, async {
        while browser.has_active_uploads().await {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("uploads did not settle before {deadline:?}"));
}

/// Count every node in the tree.
pub fn count_nodes(tree: &[Arc<FileNode>]) -> usize {
    tree.iter()
        .map(|node| 1 + count_nodes(node.children()))
        .sum()
}
