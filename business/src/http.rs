//! HTTP transfer channel: one multipart `POST {server}/upload` per file.
//!
//! reqwest owns the request body while it streams, so progress cannot be
//! reported to the caller from inside the body. Instead the body stream
//! pushes its running byte count into a `flume` channel, and [`send`] drains
//! that channel from the same task that awaits the response. Bursts of
//! chunk events are coalesced into the most recent count before the
//! callback runs.
//!
//! [`send`]: HttpTransferChannel::send

use futures_util::StreamExt as _;
use reqwest::multipart::{Form, Part};
use tokio::io::AsyncRead;
use tokio::time::Instant;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

use crate::{FileRef, TransferChannel, TransferProgress, UploadError, UploaderConfig};

const CHUNK_SIZE: usize = 64 * 1024;
const FILE_FIELD: &str = "file";
const FILENAME_FIELD: &str = "filename";
const FALLBACK_MIME: &str = "application/octet-stream";

/// Uploads files to an HTTP server.
///
/// Only status `200` counts as success. Any other status fails the item with
/// [`UploadError::ServerRejected`], and transport errors become
/// [`UploadError::NetworkFailure`].
#[derive(Debug, Clone)]
pub struct HttpTransferChannel {
    client: reqwest::Client,
    upload_url: String,
}

impl HttpTransferChannel {
    pub fn new(config: &UploaderConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuses an existing client, e.g. one with custom timeouts.
    pub fn with_client(client: reqwest::Client, config: &UploaderConfig) -> Self {
        Self {
            client,
            upload_url: config.upload_url(),
        }
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

/// Wraps `reader` in a body that reports the cumulative bytes read so far.
fn counted_body(
    reader: Box<dyn AsyncRead + Send + Sync + Unpin>,
    progress_tx: flume::Sender<u64>,
) -> reqwest::Body {
    let mut sent = 0u64;
    let stream = ReaderStream::with_capacity(reader, CHUNK_SIZE).inspect(move |chunk| {
        if let Ok(bytes) = chunk {
            sent += bytes.len() as u64;
            // Receiver gone means the transfer already settled.
            progress_tx.send(sent).ok();
        }
    });
    reqwest::Body::wrap_stream(stream)
}

impl TransferChannel for HttpTransferChannel {
    async fn send(
        &self,
        file: &FileRef,
        cancel: CancellationToken,
        on_progress: &mut (dyn FnMut(TransferProgress) + Send),
    ) -> Result<(), UploadError> {
        let total = file.size();
        let reader = file.open().await.map_err(|err| {
            log::warn!(target: "reelup::transfer", "open_failed file={} error={err}", file.name());
            UploadError::unreadable(format!("{}: {err}", file.name()))
        })?;

        let (progress_tx, progress_rx) = flume::unbounded();
        let part = Part::stream_with_length(counted_body(reader, progress_tx), total)
            .file_name(file.name().to_owned())
            .mime_str(file.mime_type().unwrap_or(FALLBACK_MIME))
            .map_err(|err| UploadError::network(format!("invalid content type: {err}")))?;
        let form = Form::new()
            .part(FILE_FIELD, part)
            .text(FILENAME_FIELD, file.name().to_owned());

        log::debug!(
            target: "reelup::transfer",
            "post url={} file={} bytes={total}",
            self.upload_url,
            file.name()
        );

        let started = Instant::now();
        let mut report = |loaded: u64| {
            on_progress(TransferProgress {
                loaded: loaded.min(total),
                total,
                elapsed: started.elapsed(),
            });
        };

        let request = self.client.post(&self.upload_url).multipart(form).send();
        tokio::pin!(request);

        let outcome = loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    log::info!(target: "reelup::transfer", "aborted file={}", file.name());
                    return Err(UploadError::Aborted);
                }
                response = &mut request => break response,
                Ok(loaded) = progress_rx.recv_async() => {
                    report(progress_rx.try_iter().last().unwrap_or(loaded));
                }
            }
        };

        if let Some(loaded) = progress_rx.try_iter().last() {
            report(loaded);
        }

        let response = outcome.map_err(|err| {
            log::warn!(target: "reelup::transfer", "request_failed file={} error={err}", file.name());
            UploadError::network(err.to_string())
        })?;

        let status_code = response.status().as_u16();
        if status_code == 200 {
            log::debug!(target: "reelup::transfer", "accepted file={}", file.name());
            Ok(())
        } else {
            log::warn!(
                target: "reelup::transfer",
                "rejected file={} status={status_code}",
                file.name()
            );
            Err(UploadError::ServerRejected { status_code })
        }
    }
}
