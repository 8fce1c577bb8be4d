//! Error handling for the updater
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can tell which stage of the update
//!    workflow stopped the run
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`UpdateError`] - one variant per way an update run can end without success
//! - [`ErrorContext`] - wrapper that adds details and a suggestion for display
//!
//! Collaborators (resolver, downloader, extractor, filesystem helpers) report
//! failures as [`anyhow::Error`] with `.context(...)` chains. The orchestrator
//! folds each chain into the `reason` of the variant matching the failed stage,
//! so nothing below the stage boundary is lost when the error reaches `main`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bds_updater::core::{UpdateError, user_friendly_error};
//!
//! let error = UpdateError::DownloadFailed {
//!     url: "https://example.com/bedrock-server.zip".to_string(),
//!     reason: "HTTP 404 Not Found".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with details and suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::update::{TerminalState, UpdateStage};

/// Every way an update run, or a rollback, can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// The operator did not agree to the EULA and Privacy Policy.
    #[error("EULA agreement required to continue")]
    ConsentDeclined,

    /// The latest download link could not be determined.
    #[error("Failed to resolve the latest Bedrock Dedicated Server download")]
    ResolutionFailed {
        /// Full cause chain
        reason: String,
    },

    /// The server archive could not be transferred to the staging path.
    #[error("Failed to download server archive from {url}")]
    DownloadFailed {
        /// URL being downloaded
        url: String,
        /// Full cause chain
        reason: String,
    },

    /// The existing installation could not be snapshotted.
    #[error("Failed to back up {path}")]
    BackupFailed {
        /// Install directory being backed up
        path: String,
        /// Full cause chain
        reason: String,
    },

    /// The staged archive could not be unpacked into the install directory.
    #[error("Failed to extract server files into {path}")]
    ExtractFailed {
        /// Install directory being written
        path: String,
        /// Full cause chain
        reason: String,
    },

    /// The backup could not be copied back over the install directory.
    #[error("Failed to restore backup into {path}")]
    RestoreFailed {
        /// Install directory being restored
        path: String,
        /// Full cause chain
        reason: String,
    },

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl UpdateError {
    /// Wraps a resolver failure, keeping its cause chain.
    pub fn resolution(error: &anyhow::Error) -> Self {
        Self::ResolutionFailed {
            reason: format!("{error:#}"),
        }
    }

    /// Wraps a downloader failure, keeping its cause chain.
    pub fn download(url: &str, error: &anyhow::Error) -> Self {
        Self::DownloadFailed {
            url: url.to_string(),
            reason: format!("{error:#}"),
        }
    }

    /// Wraps a backup failure, keeping its cause chain.
    pub fn backup(path: &std::path::Path, error: &anyhow::Error) -> Self {
        Self::BackupFailed {
            path: path.display().to_string(),
            reason: format!("{error:#}"),
        }
    }

    /// Wraps an installer failure, keeping its cause chain.
    pub fn extract(path: &std::path::Path, error: &anyhow::Error) -> Self {
        Self::ExtractFailed {
            path: path.display().to_string(),
            reason: format!("{error:#}"),
        }
    }

    /// The workflow stage this error terminated, if it came from the workflow.
    #[must_use]
    pub const fn stage(&self) -> Option<UpdateStage> {
        match self {
            Self::ConsentDeclined => Some(UpdateStage::AwaitConsent),
            Self::ResolutionFailed {
                ..
            } => Some(UpdateStage::ResolveVersion),
            Self::DownloadFailed {
                ..
            } => Some(UpdateStage::Download),
            Self::BackupFailed {
                ..
            } => Some(UpdateStage::Backup),
            Self::ExtractFailed {
                ..
            } => Some(UpdateStage::Install),
            Self::RestoreFailed {
                ..
            }
            | Self::ConfigError {
                ..
            }
            | Self::Other {
                ..
            } => None,
        }
    }

    /// The terminal state a run ends in when it fails with this error.
    ///
    /// Declined consent is an expected outcome rather than a defect and maps
    /// to [`TerminalState::Aborted`]; every stage failure maps to
    /// [`TerminalState::Failed`].
    #[must_use]
    pub const fn terminal_state(&self) -> TerminalState {
        match self.stage() {
            Some(UpdateStage::AwaitConsent) => TerminalState::Aborted,
            Some(stage) => TerminalState::Failed(stage),
            None => TerminalState::Failed(UpdateStage::AwaitConsent),
        }
    }

    /// The underlying cause chain, when the variant carries one.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::ResolutionFailed {
                reason,
            }
            | Self::DownloadFailed {
                reason,
                ..
            }
            | Self::BackupFailed {
                reason,
                ..
            }
            | Self::ExtractFailed {
                reason,
                ..
            }
            | Self::RestoreFailed {
                reason,
                ..
            } => Some(reason),
            Self::ConsentDeclined
            | Self::ConfigError {
                ..
            }
            | Self::Other {
                ..
            } => None,
        }
    }
}

/// An error paired with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The error being reported
    pub error: UpdateError,
    /// Suggested fix, if one is known
    pub suggestion: Option<String>,
    /// Additional explanation, usually the cause chain
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: UpdateError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] fit for the terminal.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(update_error) = error.downcast_ref::<UpdateError>() {
        return create_error_context(update_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(UpdateError::Other {
                    message: io_error.to_string(),
                })
                .with_suggestion("Check ownership of the server directory or run with elevated permissions")
                .with_details("The updater needs read and write access to the install and backup directories");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(UpdateError::Other {
                    message: io_error.to_string(),
                })
                .with_suggestion("Check that the path exists and is spelled correctly");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(UpdateError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of your bds-updater config file");
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(UpdateError::Other {
        message,
    })
}

fn create_error_context(error: UpdateError) -> ErrorContext {
    let details = error.reason().map(str::to_string);
    let suggestion = match &error {
        UpdateError::ConsentDeclined => Some(
            "Answer 'y' at the prompt, or pass --accept-eula once you have read the EULA and Privacy Policy",
        ),
        UpdateError::ResolutionFailed {
            ..
        } => Some(
            "Check your internet connection. If the links API moved, set 'links_endpoint' in the config file",
        ),
        UpdateError::DownloadFailed {
            ..
        } => Some("Check your internet connection and try again; nothing was changed on disk"),
        UpdateError::BackupFailed {
            ..
        } => Some(
            "Free up disk space or fix permissions on the backup directory, or pass --no-backup to skip it (not recommended)",
        ),
        UpdateError::ExtractFailed {
            ..
        } => Some(
            "The install directory may be partially updated. Stop the server if it is running, then retry or run with --rollback",
        ),
        UpdateError::RestoreFailed {
            ..
        } => Some("Copy the backup directory over the install directory manually"),
        UpdateError::ConfigError {
            ..
        } => Some("Fix or remove the config file; every key is optional"),
        UpdateError::Other {
            ..
        } => None,
    };

    let mut ctx = ErrorContext::new(error);
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    if let Some(suggestion) = suggestion {
        ctx = ctx.with_suggestion(suggestion);
    }
    ctx
}
