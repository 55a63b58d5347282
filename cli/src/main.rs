#![allow(clippy::exit)]

mod cli;
mod commands;
mod config;
mod observer;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;

use crate::cli::{Cli, Commands, ConfigAction};
use crate::commands::{generate_completions, run_health, run_upload, set_server, show_config};
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    timing::init_tracing(cli.verbose, cli.timing);

    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    let config = Config::load()?;
    let uploader = config.uploader_config(cli.server.as_deref());
    tracing::debug!(server = uploader.server_url(), "resolved server");

    match cli.command {
        Commands::Upload { paths, stdin } => {
            let summary = run_upload(&uploader, paths, stdin).await?;
            if summary.failed > 0 {
                std::process::exit(1);
            }
        }
        Commands::Health => run_health(&uploader).await?,
        Commands::Config {
            action: ConfigAction::Show,
        } => show_config(&uploader)?,
        Commands::Config {
            action: ConfigAction::SetServer { url },
        } => set_server(config, &url)?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}
