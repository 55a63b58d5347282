//! Test doubles for driving an [`UploadQueue`](crate::UploadQueue) without a
//! server.
//!
//! [`ScriptedChannel`] plays back a per-file list of [`Step`]s and then
//! resolves with a scripted outcome. [`RecordingObserver`] keeps every event
//! the queue emits so tests can assert on order and content.
//!
//! ```ignore
//! let channel = ScriptedChannel::default()
//!     .script("a.mp4", [Step::Sleep(Duration::from_secs(1)), Step::Progress(50)])
//!     .fail("b.mp4", UploadError::ServerRejected { status_code: 500 });
//! let queue = UploadQueue::new(channel, RecordingObserver::default());
//! ```

#![cfg(test)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    FileRef, Severity, TransferChannel, TransferProgress, UploadError, UploadId, UploadItem,
    UploadObserver, UploadStatus,
};

/// In-memory video of `size` zero bytes. The MIME type is left unset so the
/// extension decides whether the filter accepts it.
pub fn video(name: &str, size: usize) -> FileRef {
    FileRef::in_memory(name, vec![0u8; size], None)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Created {
        id: UploadId,
        name: String,
    },
    Progress {
        name: String,
        percent: f64,
        speed_label: String,
    },
    Terminal {
        name: String,
        status: UploadStatus,
        percent: f64,
    },
    Notify {
        message: String,
        severity: Severity,
    },
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    fn push(&self, event: Event) {
        self.events.lock().expect("events lock").push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("events lock").clone()
    }

    pub fn notifications(&self) -> Vec<(String, Severity)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Notify { message, severity } => Some((message, severity)),
                _ => None,
            })
            .collect()
    }

    /// `(percent, speed_label)` pairs reported for the file called `name`.
    pub fn progress_for(&self, name: &str) -> Vec<(f64, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Progress {
                    name: n,
                    percent,
                    speed_label,
                } if n == name => Some((percent, speed_label)),
                _ => None,
            })
            .collect()
    }
}

impl UploadObserver for RecordingObserver {
    fn on_item_created(&self, item: &UploadItem) {
        self.push(Event::Created {
            id: item.id().clone(),
            name: item.name().to_owned(),
        });
    }

    fn on_progress(&self, item: &UploadItem, percent: f64, speed_label: &str) {
        self.push(Event::Progress {
            name: item.name().to_owned(),
            percent,
            speed_label: speed_label.to_owned(),
        });
    }

    fn on_item_terminal(&self, item: &UploadItem) {
        self.push(Event::Terminal {
            name: item.name().to_owned(),
            status: item.status().clone(),
            percent: item.progress_percent(),
        });
    }

    fn on_notify(&self, message: &str, severity: Severity) {
        self.push(Event::Notify {
            message: message.to_owned(),
            severity,
        });
    }
}

/// One scripted action inside a transfer.
#[derive(Debug, Clone)]
pub enum Step {
    /// Sleep on the tokio clock. Under `start_paused` this advances time exactly.
    Sleep(Duration),
    /// Report this many bytes loaded.
    Progress(u64),
    /// Block until the gate is notified.
    WaitFor(Arc<Notify>),
    /// Notify the other side that the transfer reached this point.
    Signal(Arc<Notify>),
}

#[derive(Debug, Clone)]
struct Script {
    steps: Vec<Step>,
    outcome: Result<(), UploadError>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            outcome: Ok(()),
        }
    }
}

type SendHook = Box<dyn Fn(&FileRef) + Send + Sync>;

/// Transfer channel that succeeds instantly unless a file has a script.
#[derive(Default)]
pub struct ScriptedChannel {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    hook: Option<SendHook>,
}

impl ScriptedChannel {
    /// Steps to play for the file called `name`.
    pub fn script(self, name: &str, steps: impl IntoIterator<Item = Step>) -> Self {
        self.scripts
            .lock()
            .expect("scripts lock")
            .entry(name.to_owned())
            .or_default()
            .steps
            .extend(steps);
        self
    }

    /// Resolve the transfer of `name` with `err` after its steps.
    pub fn fail(self, name: &str, err: UploadError) -> Self {
        self.scripts
            .lock()
            .expect("scripts lock")
            .entry(name.to_owned())
            .or_default()
            .outcome = Err(err);
        self
    }

    /// Runs `hook` at the start of every transfer.
    pub fn with_hook(mut self, hook: impl Fn(&FileRef) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// File names in the order transfers were started.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl TransferChannel for ScriptedChannel {
    async fn send(
        &self,
        file: &FileRef,
        cancel: CancellationToken,
        on_progress: &mut (dyn FnMut(TransferProgress) + Send),
    ) -> Result<(), UploadError> {
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);
        self.calls
            .lock()
            .expect("calls lock")
            .push(file.name().to_owned());
        if let Some(hook) = &self.hook {
            hook(file);
        }

        let script = self
            .scripts
            .lock()
            .expect("scripts lock")
            .remove(file.name())
            .unwrap_or_default();
        let started = Instant::now();
        let total = file.size();

        let playback = async {
            for step in script.steps {
                match step {
                    Step::Sleep(duration) => tokio::time::sleep(duration).await,
                    Step::Progress(loaded) => on_progress(TransferProgress {
                        loaded,
                        total,
                        elapsed: started.elapsed(),
                    }),
                    Step::WaitFor(gate) => gate.notified().await,
                    Step::Signal(signal) => signal.notify_one(),
                }
            }
            script.outcome
        };

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(UploadError::Aborted),
            outcome = playback => outcome,
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
