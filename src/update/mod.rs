//! Bedrock Dedicated Server update workflow.
//!
//! # Architecture Overview
//!
//! - **[`UpdateOrchestrator`]**: sequences the stages and owns the staging archive
//! - **[`consent::ConsentGate`]**: refuses to go on without EULA agreement
//! - **[`resolver::VersionResolver`]**: finds the latest download URL
//! - **[`downloader::Downloader`]**: transfers the archive to the staging path
//! - **[`BackupManager`]**: snapshots the installation to `<install>_backup`
//! - **[`installer::Installer`]**: extracts the archive over the installation
//!
//! ## Update Process Flow
//!
//! ```text
//! 1. Consent
//!    └── Show EULA and Privacy Policy links, require "y"/"yes"
//!
//! 2. Version Resolution
//!    └── Query the links API, pick the entry for the configured build
//!
//! 3. Download
//!    └── Stream the archive to <staging_dir>/bds-staging-<uuid>.zip
//!
//! 4. Backup (unless --no-backup)
//!    ├── Delete the previous <install>_backup
//!    └── Copy the whole install directory to <install>_backup
//!
//! 5. Install
//!    ├── Create the install directory if missing
//!    └── Extract every archive entry, overwriting on conflict
//!
//! 6. Cleanup (always)
//!    └── Delete the staged archive
//! ```
//!
//! # Safety Mechanisms
//!
//! - Nothing on disk changes before consent is given
//! - A failed backup stops the run before the installation is touched
//! - The staged archive is removed on every exit path
//! - `--rollback` copies the backup back over the installation
//!
//! Replacement is not transactional: a failure during extraction can leave a
//! partially updated installation, which the backup exists to recover.
//!
//! # Example
//!
//! ```rust,no_run
//! use bds_updater::update::{
//!     Collaborators, HttpDownloader, LinksApiResolver, PresetAnswer, UpdateOptions,
//!     UpdateOrchestrator, ZipExtractor,
//! };
//! use bds_updater::config::UpdaterConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = UpdaterConfig::default();
//! let orchestrator = UpdateOrchestrator::new(
//!     "/srv/bds",
//!     UpdateOptions::default(),
//!     Collaborators {
//!         prompt: PresetAnswer::accept(),
//!         resolver: LinksApiResolver::from_config(&config)?,
//!         downloader: HttpDownloader::from_config(&config, true)?,
//!         extractor: ZipExtractor,
//!     },
//! );
//! let report = orchestrator.run().await?;
//! println!("Installed {}", report.download_url);
//! # Ok(())
//! # }
//! ```

/// Backup creation and restoration of the install directory.
pub mod backup;
/// EULA consent prompt and gate.
pub mod consent;
/// HTTP download into the staging path.
pub mod downloader;
/// Archive extraction into the install directory.
pub mod installer;
mod orchestrator;
/// Links API lookup of the latest release.
pub mod resolver;
/// Self-deleting staging archive.
pub mod staging;
mod state;


pub use backup::BackupManager;
pub use consent::{ConsentPrompt, PresetAnswer, TerminalPrompt};
pub use downloader::{Downloader, HttpDownloader};
pub use installer::{ArchiveExtractor, ZipExtractor};
pub use orchestrator::{Collaborators, SilentObserver, StageObserver, UpdateOrchestrator};
pub use resolver::{LinksApiResolver, VersionResolver};
pub use state::{TerminalState, UpdateOptions, UpdateReport, UpdateStage};
