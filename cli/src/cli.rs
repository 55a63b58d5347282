use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "reelup")]
#[command(about = "Upload video files to a reelup server, one at a time", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Server base URL (overrides the config file)
    #[arg(long, short = 's', global = true, env = "REELUP_SERVER_URL")]
    pub server: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Queue video files and upload them in order
    Upload {
        /// Files or directories to upload (directories are expanded recursively)
        paths: Vec<PathBuf>,

        /// Read additional paths from stdin, one per line
        #[arg(long)]
        stdin: bool,
    },
    /// Check that the server is up
    Health,
    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective settings and where they are stored
    Show,
    /// Save the default server URL
    SetServer {
        /// e.g. http://192.168.1.20:8080
        url: String,
    },
}
