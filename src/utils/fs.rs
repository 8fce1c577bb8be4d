//! Directory operations for creating, copying, and removing directory trees.
//!
//! All functions here are synchronous. Async callers run them through
//! `tokio::task::spawn_blocking` so large trees don't stall the runtime.

use anyhow::{Context, Result, bail};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Create `path` and any missing parents.
///
/// # Errors
///
/// Fails if the directory cannot be created or if `path` exists but is not a
/// directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        bail!("Path exists but is not a directory: {}", path.display());
    }
    Ok(())
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Mirror the tree under `src` into `dst`, creating `dst` if needed.
///
/// Regular files overwrite their counterpart in `dst`; entries only present
/// in `dst` are kept. Symlinks are recreated as symlinks with the same
/// target and are never followed, so a `worlds` link pointing at another
/// disk is preserved as a link. Sockets, FIFOs and devices are skipped.
///
/// # Errors
///
/// The first failing read, create, copy, or link aborts the whole copy.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;

    let entries =
        fs::read_dir(src).with_context(|| format!("Failed to read directory: {}", src.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", src.display()))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let kind = entry
            .file_type()
            .with_context(|| format!("Failed to inspect {}", from.display()))?;

        if kind.is_symlink() {
            copy_symlink(&from, &to)?;
        } else if kind.is_dir() {
            copy_dir(&from, &to)?;
        } else if kind.is_file() {
            fs::copy(&from, &to).with_context(|| {
                format!("Failed to copy file from {} to {}", from.display(), to.display())
            })?;
        } else {
            warn!("Skipping special file {}", from.display());
        }
    }

    Ok(())
}

/// Recreate the symlink `from` at `to`, replacing a file or link already there.
fn copy_symlink(from: &Path, to: &Path) -> Result<()> {
    let target =
        fs::read_link(from).with_context(|| format!("Failed to read link {}", from.display()))?;

    if let Ok(existing) = fs::symlink_metadata(to) {
        if existing.is_dir() {
            bail!("Cannot replace directory {} with a symlink", to.display());
        }
        remove_link_or_file(to)?;
    }

    make_symlink(from, &target, to).with_context(|| {
        format!("Failed to link {} -> {}", to.display(), target.display())
    })?;
    debug!("Linked {} -> {}", to.display(), target.display());
    Ok(())
}

#[cfg(unix)]
fn make_symlink(_from: &Path, target: &Path, to: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, to)
}

#[cfg(windows)]
fn make_symlink(from: &Path, target: &Path, to: &Path) -> io::Result<()> {
    // Windows needs to know the kind up front; a dangling link becomes a file link
    if fs::metadata(from).is_ok_and(|meta| meta.is_dir()) {
        std::os::windows::fs::symlink_dir(target, to)
    } else {
        std::os::windows::fs::symlink_file(target, to)
    }
}

#[cfg(unix)]
fn remove_link_or_file(path: &Path) -> Result<()> {
    fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))
}

#[cfg(windows)]
fn remove_link_or_file(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .or_else(|_| fs::remove_dir(path))
        .with_context(|| format!("Failed to remove {}", path.display()))
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path. Leading `..` of a
/// relative path are kept.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            c => out.push(c),
        }
    }

    out.iter().collect()
}

/// Remove the directory tree at `path`, treating a missing tree as success.
///
/// Returns `true` if something was removed. Only "not found" is tolerated;
/// every other I/O failure is returned.
pub fn remove_dir_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            debug!("Removed directory {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove directory: {}", path.display())),
    }
}
