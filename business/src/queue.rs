//! Sequential upload queue.
//!
//! Items are appended by [`UploadQueue::enqueue`] and drained front to back by
//! [`UploadQueue::start`], one transfer at a time. Shared state sits behind a
//! mutex that is only held between awaits, so enqueueing, inspection and
//! cancellation stay available while a drain is in progress.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::filter::{accepted_extensions_label, is_accepted_video};
use crate::{
    FileRef, QueueError, Severity, TransferChannel, TransferProgress, UploadId, UploadItem,
    UploadObserver, UploadStatus, ValidationError,
};

const STARTING_MESSAGE: &str = "Starting upload...";
const FINISHED_MESSAGE: &str = "All uploads completed!";

/// Counts for one drain of the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub failed: usize,
    /// Items already terminal when the drain reached them.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// The drain ran until no item was left.
    Finished(RunSummary),
    /// Another drain was in progress; this call did nothing.
    AlreadyRunning,
}

#[derive(Debug, Default)]
struct QueueState {
    items: Vec<UploadItem>,
    cursor: usize,
    is_running: bool,
    active: Option<CancellationToken>,
}

/// The item a drain is about to send.
struct ActiveTransfer {
    index: usize,
    item: UploadItem,
    cancel: CancellationToken,
}

/// Ordered upload queue driving a [`TransferChannel`] and reporting to an
/// [`UploadObserver`].
pub struct UploadQueue<C, O> {
    channel: C,
    observer: O,
    state: Mutex<QueueState>,
}

impl<C: TransferChannel, O: UploadObserver> UploadQueue<C, O> {
    pub fn new(channel: C, observer: O) -> Self {
        Self {
            channel,
            observer,
            state: Mutex::new(QueueState::default()),
        }
    }

    /// Appends the video files in `files` as pending items.
    ///
    /// Files that fail the video filter are dropped. If none pass, the queue
    /// is left unchanged, a warning is sent to the observer and
    /// [`ValidationError::NoValidFiles`] is returned.
    pub fn enqueue(
        &self,
        files: impl IntoIterator<Item = FileRef>,
    ) -> Result<Vec<UploadId>, ValidationError> {
        let (accepted, rejected): (Vec<_>, Vec<_>) =
            files.into_iter().partition(is_accepted_video);

        for file in &rejected {
            log::debug!(
                target: "reelup::queue",
                "rejected file={} mime={:?}",
                file.name(),
                file.mime_type()
            );
        }

        if accepted.is_empty() {
            log::warn!(target: "reelup::queue", "no_valid_files rejected={}", rejected.len());
            self.observer.on_notify(
                &format!(
                    "Please select valid video files ({})",
                    accepted_extensions_label()
                ),
                Severity::Warning,
            );
            return Err(ValidationError::NoValidFiles);
        }

        let created: Vec<UploadItem> = accepted.into_iter().map(UploadItem::new).collect();
        self.lock().items.extend(created.iter().cloned());

        for item in &created {
            log::debug!(
                target: "reelup::queue",
                "enqueued id={} file={} bytes={}",
                item.id(),
                item.name(),
                item.total_bytes()
            );
            self.observer.on_item_created(item);
        }
        self.observer.on_notify(
            &format!("Added {} file(s) to upload queue", created.len()),
            Severity::Success,
        );

        Ok(created.iter().map(|item| item.id().clone()).collect())
    }

    /// Drains the queue: every pending item is sent in order, one at a time.
    ///
    /// Items added while the drain runs are picked up by the same drain. A
    /// failed item is reported and skipped over, never retried. Returns
    /// [`StartOutcome::AlreadyRunning`] without side effects if a drain is in
    /// progress, and [`QueueError::Empty`] if the queue has no items.
    pub async fn start(&self) -> Result<StartOutcome, QueueError> {
        {
            let mut state = self.lock();
            if state.items.is_empty() {
                drop(state);
                log::warn!(target: "reelup::queue", "start on empty queue");
                self.observer
                    .on_notify(&QueueError::Empty.to_string(), Severity::Warning);
                return Err(QueueError::Empty);
            }
            if state.is_running {
                log::debug!(target: "reelup::queue", "start ignored, drain in progress");
                return Ok(StartOutcome::AlreadyRunning);
            }
            state.is_running = true;
            state.cursor = 0;
        }

        log::info!(target: "reelup::queue", "drain started");
        self.observer.on_notify(STARTING_MESSAGE, Severity::Success);

        let mut summary = RunSummary::default();
        while let Some(active) = self.next_pending(&mut summary) {
            if self.run_transfer(active).await {
                summary.completed += 1;
            } else {
                summary.failed += 1;
            }
        }

        log::info!(
            target: "reelup::queue",
            "drain finished completed={} failed={} skipped={}",
            summary.completed,
            summary.failed,
            summary.skipped
        );
        self.observer.on_notify(FINISHED_MESSAGE, Severity::Success);
        Ok(StartOutcome::Finished(summary))
    }

    /// Cancels the transfer in flight, if any. The item fails with
    /// [`UploadError::Aborted`](crate::UploadError::Aborted) and the drain
    /// moves on to the next one.
    pub fn cancel_active(&self) -> bool {
        match &self.lock().active {
            Some(token) => {
                log::info!(target: "reelup::queue", "cancel requested");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Snapshot of every item in queue order.
    pub fn items(&self) -> Vec<UploadItem> {
        self.lock().items.clone()
    }

    pub fn item(&self, id: &UploadId) -> Option<UploadItem> {
        self.lock().items.iter().find(|item| item.id() == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_running
    }

    /// Index of the next item the drain will look at.
    pub fn cursor(&self) -> usize {
        self.lock().cursor
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the cursor to the next pending item and marks it uploading.
    ///
    /// Clears `is_running` under the same lock when nothing is left, so an
    /// enqueue racing with the end of a drain is either picked up here or
    /// left for the next `start`.
    fn next_pending(&self, summary: &mut RunSummary) -> Option<ActiveTransfer> {
        let mut guard = self.lock();
        let state = &mut *guard;
        loop {
            let index = state.cursor;
            let Some(item) = state.items.get_mut(index) else {
                state.is_running = false;
                state.active = None;
                return None;
            };

            if item.begin(Instant::now()) {
                let cancel = CancellationToken::new();
                state.active = Some(cancel.clone());
                return Some(ActiveTransfer {
                    index,
                    item: item.clone(),
                    cancel,
                });
            }

            log::debug!(
                target: "reelup::queue",
                "skip id={} status={}",
                item.id(),
                item.status().label()
            );
            summary.skipped += 1;
            state.cursor += 1;
        }
    }

    /// Sends one item and records its terminal state. Returns true on success.
    async fn run_transfer(&self, active: ActiveTransfer) -> bool {
        let ActiveTransfer {
            index,
            item,
            cancel,
        } = active;
        log::info!(
            target: "reelup::queue",
            "upload started id={} file={} bytes={}",
            item.id(),
            item.name(),
            item.total_bytes()
        );

        let mut on_progress = |progress: TransferProgress| {
            let update = {
                let mut state = self.lock();
                state.items.get_mut(index).and_then(|item| {
                    item.record_progress(progress.loaded, Instant::now())
                        .map(|update| (item.clone(), update))
                })
            };
            if let Some((item, update)) = update {
                self.observer
                    .on_progress(&item, update.percent, &update.speed_label);
            }
        };

        let result = self
            .channel
            .send(item.file(), cancel, &mut on_progress)
            .await;

        let finished = {
            let mut guard = self.lock();
            let state = &mut *guard;
            state.active = None;
            state.cursor = index + 1;
            state.items.get_mut(index).map(|item| {
                match &result {
                    Ok(()) => item.complete(),
                    Err(err) => item.fail(err.clone()),
                };
                item.clone()
            })
        };
        let Some(finished) = finished else {
            return false;
        };
        self.observer.on_item_terminal(&finished);

        match (&result, finished.status()) {
            (Ok(()), UploadStatus::Completed) => {
                log::info!(target: "reelup::queue", "upload completed id={}", finished.id());
                true
            }
            (Err(err), _) => {
                log::warn!(
                    target: "reelup::queue",
                    "upload failed id={} file={} error={err}",
                    finished.id(),
                    finished.name()
                );
                self.observer.on_notify(
                    &format!("Failed to upload {}: {err}", finished.name()),
                    Severity::Error,
                );
                false
            }
            (Ok(()), _) => false,
        }
    }
}
