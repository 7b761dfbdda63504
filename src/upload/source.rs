//! Sources the upload pipeline reads file content from.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;

use super::{guess_mime_type, FileInfo};
use crate::error::{CloudPilotError, Result};

/// Something an upload can read its full content from.
pub trait FileSource: Send + Sync {
    /// Read the whole content.
    fn read(&self) -> BoxFuture<'_, std::io::Result<Vec<u8>>>;
}

/// In-memory content.
pub struct BytesSource {
    bytes: Arc<[u8]>,
}

impl BytesSource {
    /// Wrap in-memory content.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

impl FileSource for BytesSource {
    fn read(&self) -> BoxFuture<'_, std::io::Result<Vec<u8>>> {
        let bytes = self.bytes.to_vec();
        Box::pin(async move { Ok(bytes) })
    }
}

/// Content of a file on disk.
pub struct PathSource {
    path: PathBuf,
}

impl PathSource {
    /// Read from the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FileSource for PathSource {
    fn read(&self) -> BoxFuture<'_, std::io::Result<Vec<u8>>> {
        Box::pin(tokio::fs::read(&self.path))
    }
}

/// A file handed to the browser for upload.
#[derive(Clone)]
pub struct UploadFile {
    /// Name, MIME type and size.
    pub info: FileInfo,
    /// Where the content is read from.
    pub source: Arc<dyn FileSource>,
}

impl UploadFile {
    /// Create an upload from metadata and an arbitrary source.
    pub fn new(info: FileInfo, source: Arc<dyn FileSource>) -> Self {
        Self { info, source }
    }

    /// Create an upload from in-memory content.
    ///
    /// The MIME type is guessed from the name when not given. A blank one
    /// falls back to `application/octet-stream`.
    pub fn from_bytes(name: impl Into<String>, mime_type: Option<&str>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = match mime_type {
            Some(mime) => mime.to_string(),
            None => guess_mime_type(&name),
        };
        let size = bytes.len() as u64;

        Self {
            info: FileInfo::new(name, mime_type, size),
            source: Arc::new(BytesSource::new(bytes)),
        }
    }

    /// Create an upload for a file on disk.
    ///
    /// Size comes from the file metadata; the content itself is read later
    /// by the upload pipeline.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(CloudPilotError::Validation(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CloudPilotError::Validation(format!("{} has no file name", path.display()))
            })?;
        let mime_type = guess_mime_type(&name);

        Ok(Self {
            info: FileInfo::new(name, mime_type, metadata.len()),
            source: Arc::new(PathSource::new(path)),
        })
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile")
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}
