//! Upload queue orchestration: file selection filtering, sequential
//! transfer, progress and speed reporting.

mod config;
mod error;
pub mod filter;
mod health;
mod http;
mod item;
mod observer;
mod queue;
mod size;
mod transfer;

#[cfg(test)]
mod test_utils;

pub use config::UploaderConfig;
pub use error::{QueueError, UploadError, ValidationError};
pub use filter::{VIDEO_EXTENSIONS, accepted_extensions_label, has_video_extension, is_accepted_video};
pub use health::{HealthError, HealthReport, check_health};
pub use http::HttpTransferChannel;
pub use item::{
    FileRef, FileSource, ProgressUpdate, UploadId, UploadItem, UploadStatus, ZERO_SPEED_LABEL,
};
pub use observer::{NoopObserver, Severity, UploadObserver};
pub use queue::{RunSummary, StartOutcome, UploadQueue};
pub use size::{format_size, format_speed};
pub use transfer::{TransferChannel, TransferProgress};
