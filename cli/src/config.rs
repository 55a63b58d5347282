//! Configuration file handling for the CLI.
//!
//! Settings live in `$XDG_CONFIG_HOME/reelup/config.toml` on Linux and the
//! platform equivalent elsewhere:
//!
//! ```toml
//! [server]
//! url = "http://192.168.1.20:8080"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use reelup_business::UploaderConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration stored on disk
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the upload server
    pub url: Option<String>,
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("dev", "reelup", "reelup")
            .context("Failed to determine config directory")?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, or defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn set_server_url(&mut self, url: &str) {
        self.server.url = Some(UploaderConfig::new(url).server_url().to_owned());
    }

    /// Resolve the server to talk to: `override_url` (flag or env), then the
    /// saved URL, then the built-in default.
    pub fn uploader_config(&self, override_url: Option<&str>) -> UploaderConfig {
        override_url
            .or(self.server.url.as_deref())
            .map(UploaderConfig::new)
            .unwrap_or_default()
    }
}
