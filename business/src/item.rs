//! Upload items and the file handles they wrap.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::time::Instant;

use crate::UploadError;
use crate::size::format_speed;

/// Speed label shown before any time has elapsed.
pub const ZERO_SPEED_LABEL: &str = "0 KB/s";

/// Opaque identifier of an [`UploadItem`], unique within a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadId(String);

impl UploadId {
    /// Time-ordered id: millisecond timestamp followed by random bits.
    pub fn fresh() -> Self {
        Self(uuid::Uuid::now_v7().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the bytes of a [`FileRef`] come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// Handle to a file selected for upload: its bytes plus name, size and MIME type.
#[derive(Debug, Clone)]
pub struct FileRef {
    name: String,
    size: u64,
    mime_type: Option<String>,
    source: FileSource,
}

impl FileRef {
    /// A file on disk whose size and MIME type were already looked up.
    ///
    /// The display name is the last path component.
    pub fn on_disk(path: impl Into<PathBuf>, size: u64, mime_type: Option<String>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Self {
            name,
            size,
            mime_type,
            source: FileSource::Path(path),
        }
    }

    /// A file held in memory. The size is the length of `data`.
    pub fn in_memory(
        name: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
        mime_type: Option<String>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            mime_type,
            source: FileSource::Memory(data),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Path on disk, if this file is backed by one.
    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            FileSource::Path(path) => Some(path),
            FileSource::Memory(_) => None,
        }
    }

    /// Opens the file contents for streaming.
    pub async fn open(&self) -> io::Result<Box<dyn AsyncRead + Send + Sync + Unpin>> {
        match &self.source {
            FileSource::Path(path) => {
                let file = tokio::fs::File::open(path).await?;
                Ok(Box::new(file))
            }
            FileSource::Memory(data) => Ok(Box::new(io::Cursor::new(Arc::clone(data)))),
        }
    }
}

/// Lifecycle of an [`UploadItem`].
///
/// `Completed` and `Failed` are terminal. A failed item carries the error
/// that ended it, so an error can only exist on a failed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Failed(UploadError),
}

impl UploadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Uploading => "uploading",
            Self::Completed => "completed",
            Self::Failed(_) => "failed",
        }
    }
}

/// Derived display values for one progress report.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub percent: f64,
    pub speed_label: String,
}

/// One file in the upload queue.
#[derive(Debug, Clone)]
pub struct UploadItem {
    id: UploadId,
    file: FileRef,
    status: UploadStatus,
    progress_percent: f64,
    uploaded_bytes: u64,
    total_bytes: u64,
    started_at: Option<Instant>,
}

impl UploadItem {
    pub fn new(file: FileRef) -> Self {
        Self {
            id: UploadId::fresh(),
            total_bytes: file.size(),
            file,
            status: UploadStatus::Pending,
            progress_percent: 0.0,
            uploaded_bytes: 0,
            started_at: None,
        }
    }

    pub fn id(&self) -> &UploadId {
        &self.id
    }

    pub fn file(&self) -> &FileRef {
        &self.file
    }

    pub fn name(&self) -> &str {
        self.file.name()
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    pub fn uploaded_bytes(&self) -> u64 {
        self.uploaded_bytes
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// The error that failed this item, if it failed.
    pub fn last_error(&self) -> Option<&UploadError> {
        match &self.status {
            UploadStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// `Pending -> Uploading`. Returns false for any other starting status.
    pub(crate) fn begin(&mut self, now: Instant) -> bool {
        if self.status != UploadStatus::Pending {
            return false;
        }
        self.status = UploadStatus::Uploading;
        self.started_at = Some(now);
        true
    }

    /// Applies a byte count reported by the transfer.
    ///
    /// Counts above the file size are clamped and counts never go backwards.
    /// Ignored unless the item is uploading.
    pub(crate) fn record_progress(&mut self, loaded: u64, now: Instant) -> Option<ProgressUpdate> {
        if self.status != UploadStatus::Uploading {
            return None;
        }

        self.uploaded_bytes = self.uploaded_bytes.max(loaded.min(self.total_bytes));
        self.progress_percent = if self.total_bytes == 0 {
            0.0
        } else {
            100.0 * self.uploaded_bytes as f64 / self.total_bytes as f64
        };

        let elapsed = self
            .started_at
            .map(|started| now.saturating_duration_since(started).as_secs_f64())
            .unwrap_or_default();
        let speed_label = if elapsed > 0.0 {
            format_speed(self.uploaded_bytes as f64 / elapsed)
        } else {
            ZERO_SPEED_LABEL.to_owned()
        };

        Some(ProgressUpdate {
            percent: self.progress_percent,
            speed_label,
        })
    }

    /// `Uploading -> Completed`, pinning progress to 100%.
    pub(crate) fn complete(&mut self) -> bool {
        if self.status != UploadStatus::Uploading {
            return false;
        }
        self.status = UploadStatus::Completed;
        self.progress_percent = 100.0;
        self.uploaded_bytes = self.total_bytes;
        true
    }

    /// `Uploading -> Failed`. Progress stays at the last reported value.
    pub(crate) fn fail(&mut self, err: UploadError) -> bool {
        if self.status != UploadStatus::Uploading {
            return false;
        }
        self.status = UploadStatus::Failed(err);
        true
    }
}
