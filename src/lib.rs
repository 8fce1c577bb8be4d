//! bds-updater - Minecraft Bedrock Dedicated Server updater
//!
//! Updates a locally installed Bedrock Dedicated Server (BDS) to the latest
//! release: asks for EULA consent, looks up the current download link,
//! downloads the archive, backs up the existing installation next to it and
//! extracts the new files over it.
//!
//! # Architecture Overview
//!
//! The update workflow in [`update`] is written against small traits so it can
//! run without a terminal or network:
//!
//! - [`update::ConsentPrompt`] - one yes/no question
//! - [`update::VersionResolver`] - latest download URL
//! - [`update::Downloader`] - URL to local file
//! - [`update::ArchiveExtractor`] - archive into directory
//!
//! The binary plugs in the production implementations (terminal prompt,
//! links API, HTTP with a progress bar, zip) through [`cli`].
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface and logging setup
//! - [`config`] - Optional TOML configuration (`~/.bds-updater/config.toml`)
//! - [`core`] - Error types and user-facing error formatting
//! - [`update`] - Consent, resolution, download, backup, install, orchestration
//! - [`utils`] - Directory helpers and progress bars
//! - [`constants`] - Endpoints, file naming, timeouts
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Update (or first-time install) into /srv/bds
//! bds-update /srv/bds
//!
//! # Unattended, after reading the EULA
//! bds-update /srv/bds --accept-eula --no-progress
//!
//! # Show the latest release without changing anything
//! bds-update /srv/bds --check
//!
//! # Put the pre-update files back
//! bds-update /srv/bds --rollback
//! ```
//!
//! # Safety
//!
//! - Nothing on disk changes before the EULA is accepted
//! - The previous installation is copied to `<install>_backup` before extraction
//! - The downloaded archive is deleted on every exit path

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod update;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
