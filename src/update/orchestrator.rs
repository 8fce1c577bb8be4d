use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::UpdateError;
use crate::update::backup::BackupManager;
use crate::update::consent::{ConsentGate, ConsentPrompt};
use crate::update::downloader::Downloader;
use crate::update::installer::{ArchiveExtractor, Installer};
use crate::update::resolver::{VersionResolver, server_version_from_url};
use crate::update::staging::StagingArchive;
use crate::update::state::{UpdateOptions, UpdateReport, UpdateStage};

/// Hooks for following a run as it moves through its stages.
///
/// Every method has an empty default; the CLI implements it to print progress
/// lines, tests implement it to record the sequence of stages.
pub trait StageObserver: Send + Sync {
    /// Called as `stage` begins.
    fn stage_started(&self, _stage: UpdateStage) {}

    /// Called instead of `stage_started(Backup)` when backup is skipped.
    fn backup_skipped(&self) {}

    /// Called instead of `stage_started(Backup)` when there is no existing
    /// installation to back up.
    fn nothing_to_back_up(&self) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl StageObserver for SilentObserver {}

/// The external capabilities an update run is built from.
pub struct Collaborators<P, R, D, X> {
    pub prompt: P,
    pub resolver: R,
    pub downloader: D,
    pub extractor: X,
}

/// Runs one update of a server installation.
///
/// Stages run strictly in order, each to completion:
///
/// ```text
/// AwaitConsent → ResolveVersion → Download → Backup → Install
/// ```
///
/// The first failure ends the run with no retry. Nothing on disk is touched
/// before consent is given. Whatever the outcome, the staged archive is
/// deleted before [`run`](Self::run) returns.
pub struct UpdateOrchestrator<P, R, D, X, O = SilentObserver> {
    install_dir: PathBuf,
    staging_dir: PathBuf,
    options: UpdateOptions,
    consent: ConsentGate<P>,
    resolver: R,
    downloader: D,
    installer: Installer<X>,
    observer: O,
}

impl<P, R, D, X> UpdateOrchestrator<P, R, D, X, SilentObserver>
where
    P: ConsentPrompt,
    R: VersionResolver,
    D: Downloader,
    X: ArchiveExtractor,
{
    /// Staging happens in the system temp directory unless
    /// [`with_staging_dir`](Self::with_staging_dir) says otherwise.
    pub fn new(
        install_dir: impl Into<PathBuf>,
        options: UpdateOptions,
        collaborators: Collaborators<P, R, D, X>,
    ) -> Self {
        let Collaborators {
            prompt,
            resolver,
            downloader,
            extractor,
        } = collaborators;

        Self {
            install_dir: install_dir.into(),
            staging_dir: std::env::temp_dir(),
            options,
            consent: ConsentGate::new(prompt),
            resolver,
            downloader,
            installer: Installer::new(extractor),
            observer: SilentObserver,
        }
    }
}

impl<P, R, D, X, O> UpdateOrchestrator<P, R, D, X, O>
where
    P: ConsentPrompt,
    R: VersionResolver,
    D: Downloader,
    X: ArchiveExtractor,
    O: StageObserver,
{
    #[must_use]
    pub fn with_staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }

    pub fn with_observer<O2: StageObserver>(self, observer: O2) -> UpdateOrchestrator<P, R, D, X, O2> {
        UpdateOrchestrator {
            install_dir: self.install_dir,
            staging_dir: self.staging_dir,
            options: self.options,
            consent: self.consent,
            resolver: self.resolver,
            downloader: self.downloader,
            installer: self.installer,
            observer,
        }
    }

    #[must_use]
    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Run every stage once.
    ///
    /// # Errors
    ///
    /// The [`UpdateError`] of the first stage that failed;
    /// [`UpdateError::ConsentDeclined`] when the run was aborted at the prompt.
    pub async fn run(&self) -> Result<UpdateReport, UpdateError> {
        self.enter(UpdateStage::AwaitConsent);
        self.consent.require_consent().await?;

        self.enter(UpdateStage::ResolveVersion);
        let download_url = self
            .resolver
            .resolve_latest_download_url()
            .await
            .map_err(|e| UpdateError::resolution(&e))?;
        let version = server_version_from_url(&download_url);
        info!("Latest server release: {}", version.as_deref().unwrap_or(&download_url));

        // Dropped on every return below, deleting the archive if it was written.
        let staging = StagingArchive::new_in(&self.staging_dir);

        self.enter(UpdateStage::Download);
        self.downloader
            .fetch_to_file(&download_url, staging.path())
            .await
            .map_err(|e| UpdateError::download(&download_url, &e))?;

        let backups = BackupManager::new(&self.install_dir);
        let backup_path = if self.options.skip_backup {
            debug!("Backup skipped by request");
            self.observer.backup_skipped();
            None
        } else if !backups.install_path().exists() {
            debug!("No installation at {}, nothing to back up", self.install_dir.display());
            self.observer.nothing_to_back_up();
            None
        } else {
            self.enter(UpdateStage::Backup);
            backups.create_backup().await.map_err(|e| UpdateError::backup(&self.install_dir, &e))?
        };

        self.enter(UpdateStage::Install);
        self.installer
            .install(staging.path(), &self.install_dir)
            .await
            .map_err(|e| UpdateError::extract(&self.install_dir, &e))?;

        info!("Update of {} completed", self.install_dir.display());
        Ok(UpdateReport {
            download_url,
            version,
            backup_path,
        })
    }

    fn enter(&self, stage: UpdateStage) {
        debug!("Entering stage: {stage}");
        self.observer.stage_started(stage);
    }
}
