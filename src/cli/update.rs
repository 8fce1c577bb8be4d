//! The update, check and rollback flows behind `bds-update`.
//!
//! # Update
//!
//! ```text
//! BDS install path: /srv/bds
//! Before installing Bedrock Dedicated Server, you must agree to:
//!  ...
//! Do you agree? (y/n): y
//! Checking latest Bedrock Dedicated Server version...
//! Downloading Bedrock Dedicated Server...
//! Creating backup of current server...
//! Extracting server files...
//! Update completed successfully.
//! ```
//!
//! When a stage fails, `Bedrock Dedicated Server update failed: <stage>` is
//! printed to stderr before the error itself, and the process exits 1.

use anyhow::Result;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::CliConfig;
use crate::config::UpdaterConfig;
use crate::core::UpdateError;
use crate::update::resolver::server_version_from_url;
use crate::update::{
    BackupManager, Collaborators, ConsentPrompt, HttpDownloader, LinksApiResolver, PresetAnswer,
    StageObserver, TerminalPrompt, UpdateOptions, UpdateOrchestrator, UpdateReport, UpdateStage,
    VersionResolver, ZipExtractor,
};

/// What the parsed command line asked for.
#[derive(Debug, Clone)]
pub struct UpdateCommand {
    /// Absolute install directory
    pub install_dir: PathBuf,
    pub no_backup: bool,
    pub accept_eula: bool,
    pub rollback: bool,
    pub check: bool,
}

impl UpdateCommand {
    /// Load configuration and run the selected flow.
    ///
    /// # Errors
    ///
    /// An [`UpdateError`] wrapped in [`anyhow::Error`], so that `main` can
    /// render it with its suggestion.
    pub async fn execute(self, config: &CliConfig) -> Result<()> {
        let settings = UpdaterConfig::load(config.config_path.as_deref()).await.map_err(|e| {
            UpdateError::ConfigError {
                message: format!("{e:#}"),
            }
        })?;
        debug!("Using configuration: {:?}", settings);

        if self.rollback {
            return handle_rollback(&self.install_dir).await;
        }

        if self.check {
            return check_latest(&settings).await;
        }

        perform_update(&self, &settings, config).await
    }
}

/// Prints one line per stage, matching the interactive script users know.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleObserver {
    quiet: bool,
}

impl ConsoleObserver {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self {
            quiet,
        }
    }

    /// The line announcing `stage`, if it has one.
    #[must_use]
    pub const fn stage_line(stage: UpdateStage) -> Option<&'static str> {
        match stage {
            UpdateStage::AwaitConsent => None,
            UpdateStage::ResolveVersion => Some("Checking latest Bedrock Dedicated Server version..."),
            UpdateStage::Download => Some("Downloading Bedrock Dedicated Server..."),
            UpdateStage::Backup => Some("Creating backup of current server..."),
            UpdateStage::Install => Some("Extracting server files..."),
        }
    }
}

impl StageObserver for ConsoleObserver {
    fn stage_started(&self, stage: UpdateStage) {
        if self.quiet {
            return;
        }
        if let Some(line) = Self::stage_line(stage) {
            println!("{}", line.cyan());
        }
    }

    fn backup_skipped(&self) {
        if !self.quiet {
            println!("{}", "Backup skipped (--no-backup)".yellow());
        }
    }

    fn nothing_to_back_up(&self) {
        if !self.quiet {
            println!("No existing installation found, nothing to back up");
        }
    }
}

/// Interactive prompt, or the fixed "yes" of `--accept-eula`.
pub enum CliPrompt {
    Interactive(TerminalPrompt),
    Accepted(PresetAnswer),
}

impl CliPrompt {
    #[must_use]
    pub fn new(accept_eula: bool) -> Self {
        if accept_eula {
            Self::Accepted(PresetAnswer::accept())
        } else {
            Self::Interactive(TerminalPrompt)
        }
    }
}

impl ConsentPrompt for CliPrompt {
    async fn ask(&self) -> Result<Option<String>> {
        match self {
            Self::Interactive(prompt) => prompt.ask().await,
            Self::Accepted(answer) => {
                println!("EULA and Privacy Policy accepted (--accept-eula)");
                answer.ask().await
            }
        }
    }
}

async fn perform_update(
    command: &UpdateCommand,
    settings: &UpdaterConfig,
    config: &CliConfig,
) -> Result<()> {
    println!("BDS install path: {}", command.install_dir.display());

    let show_progress = !config.no_progress && !config.quiet;
    let orchestrator = UpdateOrchestrator::new(
        &command.install_dir,
        UpdateOptions {
            skip_backup: command.no_backup,
        },
        Collaborators {
            prompt: CliPrompt::new(command.accept_eula),
            resolver: LinksApiResolver::from_config(settings)?,
            downloader: HttpDownloader::from_config(settings, show_progress)?,
            extractor: ZipExtractor,
        },
    )
    .with_staging_dir(settings.staging_dir())
    .with_observer(ConsoleObserver::new(config.quiet));

    match orchestrator.run().await {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            if let Some(stage) = e.stage() {
                eprintln!("{} {}", "Bedrock Dedicated Server update failed:".red(), stage);
            }
            Err(e.into())
        }
    }
}

fn print_report(report: &UpdateReport) {
    if let Some(version) = &report.version {
        println!("Installed Bedrock Dedicated Server {}", version.green());
    }
    if let Some(backup) = &report.backup_path {
        println!("Previous installation saved to {}", backup.display());
    }
    println!("{}", "Update completed successfully.".green());
}

async fn handle_rollback(install_dir: &Path) -> Result<()> {
    println!("{}", "Restoring previous installation from backup...".yellow());

    let manager = BackupManager::new(install_dir);
    manager.restore_backup().await.map_err(|e| UpdateError::RestoreFailed {
        path: install_dir.display().to_string(),
        reason: format!("{e:#}"),
    })?;

    println!(
        "{}",
        format!(
            "Restored {} from {}",
            manager.install_path().display(),
            manager.backup_path().display()
        )
        .green()
    );
    Ok(())
}

async fn check_latest(settings: &UpdaterConfig) -> Result<()> {
    println!("{}", "Checking latest Bedrock Dedicated Server version...".cyan());

    let resolver = LinksApiResolver::from_config(settings)?;
    let url = resolver
        .resolve_latest_download_url()
        .await
        .map_err(|e| UpdateError::resolution(&e))?;

    match server_version_from_url(&url) {
        Some(version) => println!("Latest version: {}", version.green()),
        None => println!("Latest version: {}", "unknown".yellow()),
    }
    println!("Download: {url}");
    Ok(())
}
