//! Command implementations for the reelup CLI.
//!
//! Each subcommand is implemented in its own module.

pub mod completions;
pub mod config;
pub mod health;
pub mod upload;

pub use completions::generate_completions;
pub use config::{set_server, show_config};
pub use health::run_health;
pub use upload::run_upload;
