//! `reelup upload`: queue the given files and upload them in order.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use reelup_business::{
    HttpTransferChannel, RunSummary, StartOutcome, TransferChannel, UploadObserver, UploadQueue,
    UploaderConfig,
};
use reelup_input::{PathListReader, RealPathListReader, collect_files};
use tracing::instrument;

use crate::observer::TerminalObserver;
use crate::output::Output;

#[instrument(skip_all, name = "upload", fields(server = %config.server_url(), path_count = paths.len(), stdin))]
pub async fn run_upload(
    config: &UploaderConfig,
    mut paths: Vec<PathBuf>,
    stdin: bool,
) -> Result<RunSummary> {
    if stdin {
        let out = Output::new();
        if out.is_interactive() {
            out.dim("Reading paths from stdin... Press Ctrl+D to finish.");
        }
        paths.extend(read_path_list(&mut RealPathListReader::new())?);
    }

    let summary = upload_paths(
        HttpTransferChannel::new(config),
        TerminalObserver::new(),
        &paths,
    )
    .await?;

    let out = Output::new();
    for (label, count) in summary_counts(&summary) {
        out.count(label, count);
    }
    Ok(summary)
}

/// Lines printed after a drain. Zero failed or skipped counts are left out.
fn summary_counts(summary: &RunSummary) -> Vec<(&'static str, usize)> {
    let mut counts = vec![("Uploaded", summary.completed)];
    if summary.failed > 0 {
        counts.push(("Failed", summary.failed));
    }
    if summary.skipped > 0 {
        counts.push(("Skipped", summary.skipped));
    }
    counts
}

fn read_path_list<R: PathListReader>(reader: &mut R) -> Result<Vec<PathBuf>> {
    reader
        .read_paths()
        .context("Failed to read paths from stdin")
}

/// Resolve `paths`, enqueue every video among them and drain the queue.
///
/// The first Ctrl+C cancels the file being uploaded and the queue moves on;
/// a second one exits the process.
pub async fn upload_paths<C, O>(channel: C, observer: O, paths: &[PathBuf]) -> Result<RunSummary>
where
    C: TransferChannel + 'static,
    O: UploadObserver + 'static,
{
    if paths.is_empty() {
        bail!("No files given. Pass paths or use --stdin.");
    }

    let files = collect_files(paths).await?;
    tracing::debug!(candidates = files.len(), "collected files");

    let queue = Arc::new(UploadQueue::new(channel, observer));
    queue.enqueue(files)?;

    let watcher = tokio::spawn(cancel_on_ctrl_c(Arc::clone(&queue)));
    let outcome = queue.start().await;
    watcher.abort();

    match outcome? {
        StartOutcome::Finished(summary) => Ok(summary),
        StartOutcome::AlreadyRunning => bail!("Upload already in progress"),
    }
}

async fn cancel_on_ctrl_c<C, O>(queue: Arc<UploadQueue<C, O>>)
where
    C: TransferChannel,
    O: UploadObserver,
{
    let mut cancelled_once = false;
    while tokio::signal::ctrl_c().await.is_ok() {
        if cancelled_once || !queue.cancel_active() {
            tracing::warn!("interrupted, exiting");
            std::process::exit(130);
        }
        cancelled_once = true;
        Output::new().warning("Cancelled current upload. Press Ctrl+C again to quit.");
    }
}
