//! `reelup health`: probe the server before queueing anything.

use anyhow::{Context as _, Result};
use reelup_business::{UploaderConfig, check_health};
use tracing::instrument;

use crate::output::Output;

#[instrument(skip_all, name = "health", fields(server = %config.server_url()))]
pub async fn run_health(config: &UploaderConfig) -> Result<()> {
    let out = Output::new();
    let report = check_health(&reqwest::Client::new(), config)
        .await
        .with_context(|| format!("Health check failed for {}", config.server_url()))?;

    out.success(format!(
        "Server {} is {}",
        config.server_url(),
        report.status
    ));
    if let Some(folder) = &report.upload_folder {
        out.labeled_indent("Upload folder", folder, 2);
    }
    Ok(())
}
