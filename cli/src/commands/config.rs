//! `reelup config`: inspect and change saved settings.

use anyhow::{Result, bail};
use reelup_business::UploaderConfig;

use crate::config::Config;
use crate::output::Output;

pub fn show_config(effective: &UploaderConfig) -> Result<()> {
    let out = Output::new();
    let path = Config::config_path()?;

    out.labeled_indent("Config file", path.display(), 0);
    out.labeled_indent("Server", effective.server_url(), 0);
    out.labeled_indent("Upload endpoint", effective.upload_url(), 0);
    out.labeled_indent("Health endpoint", effective.health_url(), 0);
    Ok(())
}

pub fn set_server(mut config: Config, url: &str) -> Result<()> {
    validate_server_url(url)?;
    config.set_server_url(url);
    let path = config.save()?;

    Output::new().success(format!("Saved server {url} to {}", path.display()));
    Ok(())
}

fn validate_server_url(url: &str) -> Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("Server URL must start with http:// or https://, got {url:?}");
    }
    Ok(())
}
