//! Presentation callbacks consumed by the upload queue.
//!
//! The queue never renders anything itself. A front end implements
//! [`UploadObserver`] and keeps its own mapping from [`UploadId`] to whatever
//! it draws for that item.
//!
//! [`UploadId`]: crate::UploadId

use std::fmt;
use std::sync::Arc;

use crate::UploadItem;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// Receives item lifecycle events and notifications from an upload queue.
///
/// Callbacks run on the task driving the queue, one at a time, so they
/// should return quickly.
pub trait UploadObserver: Send + Sync {
    /// A new item was appended to the queue.
    fn on_item_created(&self, item: &UploadItem);

    /// The active item reported bytes in flight.
    fn on_progress(&self, item: &UploadItem, percent: f64, speed_label: &str);

    /// The item reached `Completed` or `Failed`.
    fn on_item_terminal(&self, item: &UploadItem);

    /// Status text for the user.
    fn on_notify(&self, message: &str, severity: Severity);
}

impl<T: UploadObserver + ?Sized> UploadObserver for Arc<T> {
    fn on_item_created(&self, item: &UploadItem) {
        (**self).on_item_created(item);
    }

    fn on_progress(&self, item: &UploadItem, percent: f64, speed_label: &str) {
        (**self).on_progress(item, percent, speed_label);
    }

    fn on_item_terminal(&self, item: &UploadItem) {
        (**self).on_item_terminal(item);
    }

    fn on_notify(&self, message: &str, severity: Severity) {
        (**self).on_notify(message, severity);
    }
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl UploadObserver for NoopObserver {
    fn on_item_created(&self, _item: &UploadItem) {}

    fn on_progress(&self, _item: &UploadItem, _percent: f64, _speed_label: &str) {}

    fn on_item_terminal(&self, _item: &UploadItem) {}

    fn on_notify(&self, _message: &str, _severity: Severity) {}
}
