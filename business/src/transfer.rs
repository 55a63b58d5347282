//! Single-file transfer contract used by the upload queue.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{FileRef, UploadError};

/// Bytes in flight for the file being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    /// File bytes handed to the transport so far. Never decreases within a transfer.
    pub loaded: u64,
    /// Size of the file, fixed for the whole transfer.
    pub total: u64,
    /// Time since the transfer started.
    pub elapsed: Duration,
}

/// Uploads one file and reports how far it got.
///
/// Implementations make exactly one attempt per call. `on_progress` may be
/// called any number of times before the returned future resolves and never
/// after. When `cancel` fires the transfer stops and resolves with
/// [`UploadError::Aborted`].
pub trait TransferChannel: Send + Sync {
    fn send(
        &self,
        file: &FileRef,
        cancel: CancellationToken,
        on_progress: &mut (dyn FnMut(TransferProgress) + Send),
    ) -> impl Future<Output = Result<(), UploadError>> + Send;
}

impl<C: TransferChannel> TransferChannel for Arc<C> {
    fn send(
        &self,
        file: &FileRef,
        cancel: CancellationToken,
        on_progress: &mut (dyn FnMut(TransferProgress) + Send),
    ) -> impl Future<Output = Result<(), UploadError>> + Send {
        (**self).send(file, cancel, on_progress)
    }
}
