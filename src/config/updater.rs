//! Updater configuration file.
//!
//! The config file is optional. When present it is TOML with every key
//! optional:
//!
//! ```toml
//! # Where to ask for the latest download links
//! links_endpoint = "https://net-secondary.web.minecraft-services.net/api/v1.0/download/links"
//!
//! # Which distribution to install ("serverBedrockWindows" or "serverBedrockLinux")
//! download_type = "serverBedrockLinux"
//!
//! # Where the downloaded archive is staged while the update runs
//! staging_dir = "/var/tmp"
//!
//! user_agent = "bds-updater/0.1.0"
//!
//! # Total deadline for the links API call
//! request_timeout_secs = 300
//!
//! # Connection deadline, and the longest a download may stall between reads
//! connect_timeout_secs = 30
//! download_idle_timeout_secs = 60
//! ```
//!
//! # Location
//!
//! Resolved in order:
//! 1. `--config <FILE>` on the command line
//! 2. `BDS_UPDATER_CONFIG_PATH` environment variable
//! 3. `~/.bds-updater/config.toml` (`%LOCALAPPDATA%\bds-updater\config.toml` on Windows)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_DOWNLOAD_IDLE_TIMEOUT_SECS, DEFAULT_LINKS_ENDPOINT,
    DEFAULT_REQUEST_TIMEOUT_SECS, default_user_agent, platform_download_type,
};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "BDS_UPDATER_CONFIG_PATH";

fn default_links_endpoint() -> String {
    DEFAULT_LINKS_ENDPOINT.to_string()
}

fn default_download_type() -> String {
    platform_download_type().to_string()
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

const fn default_download_idle_timeout_secs() -> u64 {
    DEFAULT_DOWNLOAD_IDLE_TIMEOUT_SECS
}

/// Settings for resolving, downloading, and staging server releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdaterConfig {
    /// Links API queried for the latest download URL.
    #[serde(default = "default_links_endpoint")]
    pub links_endpoint: String,

    /// `downloadType` of the links entry to install.
    #[serde(default = "default_download_type")]
    pub download_type: String,

    /// Directory holding the staged archive; the system temp dir when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Total timeout in seconds for a links API request. Downloads are not
    /// bound by it.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Seconds a download may go without receiving data before it fails.
    #[serde(default = "default_download_idle_timeout_secs")]
    pub download_idle_timeout_secs: u64,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            links_endpoint: default_links_endpoint(),
            download_type: default_download_type(),
            staging_dir: None,
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            download_idle_timeout_secs: default_download_idle_timeout_secs(),
        }
    }
}

impl UpdaterConfig {
    /// Load the config from `explicit`, or from the default location.
    ///
    /// A missing file yields [`UpdaterConfig::default`]; an explicitly named
    /// file that is missing is an error.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path).await;
        }

        let path = Self::default_path()?;
        if path.exists() {
            Self::load_from(&path).await
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Default config file location.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("bds-updater")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".bds-updater")
        };

        Ok(config_dir.join("config.toml"))
    }

    #[must_use]
    pub fn staging_dir(&self) -> PathBuf {
        self.staging_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub const fn download_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.download_idle_timeout_secs)
    }
}
