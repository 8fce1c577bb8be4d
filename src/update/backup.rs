use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::constants::BACKUP_SUFFIX;
use crate::utils::{copy_dir, normalize_path, remove_dir_if_exists};

/// Snapshots a server installation before it is overwritten.
///
/// The backup lives next to the install directory with `_backup` appended to
/// its name (`/srv/bds` → `/srv/bds_backup`). There is only ever one backup
/// per installation: creating a new one deletes the previous one first.
///
/// # Examples
///
/// ```rust,no_run
/// use bds_updater::update::BackupManager;
///
/// # async fn example() -> anyhow::Result<()> {
/// let manager = BackupManager::new("/srv/bds");
/// if let Some(backup) = manager.create_backup().await? {
///     println!("Backup written to {}", backup.display());
/// }
///
/// // Later, after a failed update:
/// manager.restore_backup().await?;
/// # Ok(())
/// # }
/// ```
pub struct BackupManager {
    install_dir: PathBuf,
    backup_dir: PathBuf,
}

impl BackupManager {
    /// `.` and `..` in `install_dir` are resolved first, so `/srv/bds/..`
    /// pairs `/srv` with `/srv_backup`.
    pub fn new(install_dir: impl AsRef<Path>) -> Self {
        let install_dir = normalize_path(install_dir.as_ref());
        let backup_dir = backup_path_for(&install_dir);

        Self {
            install_dir,
            backup_dir,
        }
    }

    /// Replace any previous backup with a full copy of the install directory.
    ///
    /// Returns the backup path, or `None` when the install directory does not
    /// exist yet (first-time install, nothing to preserve).
    ///
    /// # Errors
    ///
    /// Fails if the old backup cannot be removed (other than it being absent)
    /// or if any part of the copy fails. A failed copy may leave a partial
    /// backup behind.
    pub async fn create_backup(&self) -> Result<Option<PathBuf>> {
        self.check_sibling()?;
        if !self.install_dir.exists() {
            debug!("Nothing to back up at {:?}", self.install_dir);
            return Ok(None);
        }

        let install_dir = self.install_dir.clone();
        let backup_dir = self.backup_dir.clone();

        info!("Creating backup at {:?}", self.backup_dir);
        tokio::task::spawn_blocking(move || -> Result<()> {
            if remove_dir_if_exists(&backup_dir).context("Failed to remove old backup")? {
                debug!("Removed old backup at {:?}", backup_dir);
            }
            copy_dir(&install_dir, &backup_dir).context("Failed to create backup")
        })
        .await
        .context("Backup task failed")??;

        info!("Backup created successfully");
        Ok(Some(self.backup_dir.clone()))
    }

    /// Copy the backup back over the install directory.
    ///
    /// Files written by a failed update that are absent from the backup stay
    /// in place; every file the backup holds is restored.
    pub async fn restore_backup(&self) -> Result<()> {
        self.check_sibling()?;
        if !self.backup_dir.exists() {
            bail!("No backup found at {:?}", self.backup_dir);
        }

        warn!("Restoring from backup at {:?}", self.backup_dir);

        let install_dir = self.install_dir.clone();
        let backup_dir = self.backup_dir.clone();
        tokio::task::spawn_blocking(move || copy_dir(&backup_dir, &install_dir))
            .await
            .context("Restore task failed")?
            .context("Failed to restore backup")?;

        info!("Successfully restored from backup");
        Ok(())
    }

    /// The backup must sit beside the installation, never inside it.
    fn check_sibling(&self) -> Result<()> {
        if self.install_dir.file_name().is_none() || self.backup_dir.starts_with(&self.install_dir)
        {
            bail!(
                "Cannot back up {:?}: the backup would be created inside it at {:?}",
                self.install_dir,
                self.backup_dir
            );
        }
        Ok(())
    }

    #[must_use]
    pub fn backup_exists(&self) -> bool {
        self.backup_dir.exists()
    }

    #[must_use]
    pub fn backup_path(&self) -> &Path {
        &self.backup_dir
    }

    #[must_use]
    pub fn install_path(&self) -> &Path {
        &self.install_dir
    }
}

/// The backup directory paired with `install_dir`.
///
/// `install_dir` is expected to be normalized; a path without a final
/// component (`/`, or one ending in `..`) has no sibling.
#[must_use]
pub fn backup_path_for(install_dir: &Path) -> PathBuf {
    let mut name = install_dir.file_name().unwrap_or_default().to_os_string();
    name.push(BACKUP_SUFFIX);
    install_dir.with_file_name(name)
}
