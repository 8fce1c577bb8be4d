//! Unpacking a staged archive into the live installation.
//!
//! Extraction is additive: every archive entry overwrites the file at the
//! same relative path, and files the archive does not mention (worlds,
//! `server.properties` edits, allowlists, stale files of older releases) are
//! left as they are.

use anyhow::{Context, Result};
use std::fs::File;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::utils::{ensure_dir, ensure_parent_dir};

/// Unpacks an archive into a directory, overwriting on conflict.
pub trait ArchiveExtractor: Send + Sync {
    fn extract(&self, archive: &Path, dest: &Path) -> impl Future<Output = Result<()>> + Send;
}

/// Extracts zip archives on a blocking worker thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    async fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        let archive: PathBuf = archive.to_path_buf();
        let dest: PathBuf = dest.to_path_buf();

        let written = tokio::task::spawn_blocking(move || extract_zip(&archive, &dest))
            .await
            .context("Extraction task failed")??;
        debug!("Extracted {} files", written);
        Ok(())
    }
}

/// Extract every entry of the zip at `archive` into `dest`.
///
/// Entries whose names would land outside `dest` are skipped. Returns the
/// number of files written.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let mut zip = ZipArchive::new(file)
        .with_context(|| format!("Failed to read zip archive {}", archive.display()))?;

    let mut written = 0;
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .with_context(|| format!("Failed to read entry {i} of {}", archive.display()))?;

        let Some(relative) = entry.enclosed_name() else {
            warn!("Skipping archive entry with unsafe path: {}", entry.name());
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            ensure_dir(&out_path)?;
            continue;
        }

        ensure_parent_dir(&out_path)?;
        let mut out_file = File::create(&out_path)
            .with_context(|| format!("Failed to create {}", out_path.display()))?;
        std::io::copy(&mut entry, &mut out_file)
            .with_context(|| format!("Failed to write {}", out_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&out_path, std::fs::Permissions::from_mode(mode & 0o7777))
                    .with_context(|| format!("Failed to set permissions on {}", out_path.display()))?;
            }
        }

        written += 1;
    }

    Ok(written)
}

/// Writes a staged archive into the install directory.
pub struct Installer<X> {
    extractor: X,
}

impl<X: ArchiveExtractor> Installer<X> {
    pub fn new(extractor: X) -> Self {
        Self {
            extractor,
        }
    }

    /// Create `install_dir` if needed, then extract `archive` into it.
    ///
    /// # Errors
    ///
    /// A failure partway through leaves the files extracted so far in place.
    pub async fn install(&self, archive: &Path, install_dir: &Path) -> Result<()> {
        ensure_dir(install_dir)?;

        info!("Extracting {} into {}", archive.display(), install_dir.display());
        self.extractor.extract(archive, install_dir).await
    }
}
