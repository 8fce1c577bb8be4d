//! Workflow states, per-run options, and the report of a successful run.

use std::fmt;
use std::path::PathBuf;

/// The non-terminal states of an update run, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateStage {
    AwaitConsent,
    ResolveVersion,
    Download,
    Backup,
    Install,
}

impl UpdateStage {
    /// Every stage in execution order.
    pub const ALL: [Self; 5] =
        [Self::AwaitConsent, Self::ResolveVersion, Self::Download, Self::Backup, Self::Install];
}

impl fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AwaitConsent => "consent",
            Self::ResolveVersion => "version resolution",
            Self::Download => "download",
            Self::Backup => "backup",
            Self::Install => "install",
        };
        f.write_str(name)
    }
}

/// Where a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Succeeded,
    /// A stage failed; no later stage ran.
    Failed(UpdateStage),
    /// Consent was not given; nothing was touched.
    Aborted,
}

impl TerminalState {
    /// Classify the result of [`UpdateOrchestrator::run`](super::UpdateOrchestrator::run).
    #[must_use]
    pub const fn of(result: &Result<UpdateReport, crate::core::UpdateError>) -> Self {
        match result {
            Ok(_) => Self::Succeeded,
            Err(e) => e.terminal_state(),
        }
    }

    /// Process exit code for this state.
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Succeeded => 0,
            Self::Failed(_) | Self::Aborted => 1,
        }
    }
}

/// Immutable per-run options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Go straight from download to install without snapshotting the
    /// install directory.
    pub skip_backup: bool,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// The archive URL that was installed.
    pub download_url: String,
    /// Server version parsed from the URL, when recognizable.
    pub version: Option<String>,
    /// Backup written before install; `None` when skipped or nothing existed.
    pub backup_path: Option<PathBuf>,
}
