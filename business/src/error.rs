use thiserror::Error;

/// Terminal failure of a single file transfer.
///
/// Every variant is contained to the item that produced it: the queue marks
/// that item failed and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Upload failed with status {status_code}")]
    ServerRejected { status_code: u16 },
    #[error("Network error during upload: {0}")]
    NetworkFailure(String),
    #[error("Upload aborted")]
    Aborted,
    #[error("Could not read source file: {0}")]
    FileUnreadable(String),
}

impl UploadError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure(message.into())
    }

    pub fn unreadable(message: impl Into<String>) -> Self {
        Self::FileUnreadable(message.into())
    }
}

/// Errors from starting a queue run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("No files to upload")]
    Empty,
}

/// Errors from enqueueing a batch of files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No valid video files in selection")]
    NoValidFiles,
}
