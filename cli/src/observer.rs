//! Renders queue events on the terminal.

use std::sync::{Mutex, PoisonError};

use reelup_business::{Severity, UploadId, UploadItem, UploadObserver, UploadStatus, format_size};

use crate::output::Output;

/// [`UploadObserver`] that prints to stdout.
///
/// Progress is redrawn in place on a terminal, at most once per whole
/// percent. When stdout is piped only the terminal line of each item is
/// written.
pub struct TerminalObserver {
    out: Output,
    last_drawn: Mutex<Option<(UploadId, u32)>>,
}

impl Default for TerminalObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalObserver {
    pub fn new() -> Self {
        Self {
            out: Output::new(),
            last_drawn: Mutex::new(None),
        }
    }

    /// True if this percent has not been drawn yet for `id`.
    fn should_draw(&self, id: &UploadId, percent: f64) -> bool {
        let whole = percent.floor() as u32;
        let mut last = self
            .last_drawn
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let changed = !matches!(&*last, Some((drawn_id, drawn)) if drawn_id == id && *drawn == whole);
        if changed {
            *last = Some((id.clone(), whole));
        }
        changed
    }
}

impl UploadObserver for TerminalObserver {
    fn on_item_created(&self, item: &UploadItem) {
        self.out
            .file_item(item.name(), format_size(item.total_bytes() as f64));
    }

    fn on_progress(&self, item: &UploadItem, percent: f64, speed_label: &str) {
        if self.out.is_interactive() && self.should_draw(item.id(), percent) {
            self.out.progress(item.name(), percent, speed_label);
        }
    }

    fn on_item_terminal(&self, item: &UploadItem) {
        if self.out.is_interactive() {
            self.out.clear_progress();
        }
        match item.status() {
            UploadStatus::Completed => self.out.success(format!(
                "{} ({})",
                item.name(),
                format_size(item.total_bytes() as f64)
            )),
            // The queue follows up with an error notification naming the cause.
            UploadStatus::Failed(_) => self.out.dim(format!(
                "  {} stopped at {:.1}%",
                item.name(),
                item.progress_percent()
            )),
            UploadStatus::Pending | UploadStatus::Uploading => {}
        }
    }

    fn on_notify(&self, message: &str, severity: Severity) {
        self.out.notify(message, severity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_drawn_once_per_percent() {
        let observer = TerminalObserver::new();
        let id = UploadId::fresh();

        assert!(observer.should_draw(&id, 10.2));
        assert!(!observer.should_draw(&id, 10.9));
        assert!(observer.should_draw(&id, 11.0));
    }

    #[test]
    fn test_new_item_redraws_same_percent() {
        let observer = TerminalObserver::new();

        assert!(observer.should_draw(&UploadId::fresh(), 0.0));
        assert!(observer.should_draw(&UploadId::fresh(), 0.0));
    }
}
