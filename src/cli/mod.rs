//! Command-line interface for bds-update.
//!
//! One command, one positional argument: the server install directory. Flags
//! choose between the update workflow (default), `--check` and `--rollback`.
//!
//! # Options
//!
//! - `--no-backup` - Skip the `<install>_backup` snapshot (not recommended)
//! - `--accept-eula` - Answer the EULA question with "yes" without prompting
//! - `--check` - Print the latest release and exit; nothing is changed
//! - `--rollback` - Copy `<install>_backup` back over the installation
//! - `--config` - Path to a config file (default `~/.bds-updater/config.toml`)
//! - `--verbose` / `--quiet` - Log level
//! - `--no-progress` - Disable the download progress bar
//!
//! # Examples
//!
//! ```bash
//! bds-update /srv/bds
//! bds-update ~/bds --no-backup --accept-eula
//! bds-update /srv/bds --check
//! bds-update /srv/bds --rollback
//! ```

pub mod update;


use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::utils::normalize_path;
use update::UpdateCommand;

/// Runtime configuration for CLI execution.
///
/// Built from the parsed flags by [`Cli::build_config`]; tests construct it
/// directly to run a command without going through argument parsing.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for the crate's own targets.
    ///
    /// `None` disables logging unless `RUST_LOG` is set, which always wins.
    pub log_level: Option<String>,

    /// Hide the download progress bar.
    pub no_progress: bool,

    /// Suppress stage progress lines on stdout.
    pub quiet: bool,

    /// Explicit config file, overriding `BDS_UPDATER_CONFIG_PATH` and the
    /// default location.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Only the first call in a process has any effect.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(level) = &self.log_level {
            EnvFilter::new(format!("bds_updater={level}"))
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Update a Minecraft Bedrock Dedicated Server installation to the latest
/// release.
#[derive(Parser, Debug)]
#[command(
    name = "bds-update",
    about = "Update a Minecraft Bedrock Dedicated Server installation",
    version,
    author,
    long_about = "Downloads the latest Bedrock Dedicated Server release, backs up the existing installation to <INSTALL_DIR>_backup and extracts the new files over it. World data and edited config files not shipped in the release are kept."
)]
pub struct Cli {
    /// Server install directory (created if missing).
    #[arg(value_name = "INSTALL_DIR")]
    install_dir: String,

    /// Skip backing up the current installation.
    #[arg(long)]
    no_backup: bool,

    /// Agree to the Minecraft EULA and Privacy Policy without prompting.
    #[arg(long)]
    accept_eula: bool,

    /// Restore the installation from <INSTALL_DIR>_backup.
    #[arg(long, conflicts_with_all = ["check", "no_backup", "accept_eula"])]
    rollback: bool,

    /// Show the latest available release without installing it.
    #[arg(long, conflicts_with_all = ["no_backup", "accept_eula"])]
    check: bool,

    /// Path to a config file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors and the EULA prompt.
    #[arg(short, long)]
    quiet: bool,

    /// Disable the download progress bar.
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    /// Execute with the configuration implied by the parsed flags.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate flags into a [`CliConfig`].
    ///
    /// `--verbose` logs at debug, `--quiet` disables logging, otherwise only
    /// warnings are logged so stdout stays readable.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            no_progress: self.no_progress,
            quiet: self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        let command = UpdateCommand {
            install_dir: resolve_install_dir(&self.install_dir)?,
            no_backup: self.no_backup,
            accept_eula: self.accept_eula,
            rollback: self.rollback,
            check: self.check,
        };

        command.execute(&config).await
    }
}

/// Expand a leading `~`, make the path absolute and resolve `.` and `..`.
///
/// The path does not have to exist. The filesystem root is refused since a
/// backup cannot sit beside it.
pub fn resolve_install_dir(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(raw);
    let absolute = std::path::absolute(Path::new(expanded.as_ref()))
        .with_context(|| format!("Invalid install directory: '{raw}'"))?;

    let resolved = normalize_path(&absolute);
    if resolved.file_name().is_none() {
        bail!("Invalid install directory: '{raw}' resolves to {}", resolved.display());
    }
    Ok(resolved)
}
