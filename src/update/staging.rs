//! Staging archive with guaranteed cleanup.
//!
//! [`StagingArchive`] names a unique file in the staging directory and
//! deletes it when dropped. The orchestrator holds one for the duration of a
//! run, so the archive is removed on every exit path: success, a failed
//! stage, or an early return.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::constants::STAGING_PREFIX;

/// A transient download location, removed on drop.
#[derive(Debug)]
pub struct StagingArchive {
    path: PathBuf,
}

impl StagingArchive {
    /// Reserve a fresh `bds-staging-<uuid>.zip` path inside `dir`.
    ///
    /// Nothing is created on disk; the downloader creates the file.
    #[must_use]
    pub fn new_in(dir: &Path) -> Self {
        let path = dir.join(format!("{STAGING_PREFIX}-{}.zip", Uuid::new_v4()));
        Self {
            path,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingArchive {
    fn drop(&mut self) {
        // Logged, never returned
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed staging archive {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove staging archive {}: {}", self.path.display(), e),
        }
    }
}
