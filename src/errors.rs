//! Error taxonomy for repository scans.
//!
//! Only two kinds abort a request: [`ErrorKind::InvalidInput`] and
//! [`ErrorKind::CloneFailed`]. Per-file problems become [`SkippedFile`]
//! entries on the scan result and cleanup problems are logged where they
//! happen; neither is ever returned as the outcome of a request.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Closed set of failure kinds reported across the library boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    CloneFailed,
    ScanPartial,
    CleanupFailed,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::CloneFailed => "clone_failed",
            ErrorKind::ScanPartial => "scan_partial",
            ErrorKind::CleanupFailed => "cleanup_failed",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    /// The repository reference is empty or uses an unsupported transport
    #[error("Invalid repository reference: {0}")]
    InvalidInput(String),

    /// The remote fetch did not complete
    #[error("Failed to clone repository: {message}")]
    CloneFailed {
        message: String,
        #[source]
        source: Option<git2::Error>,
    },

    /// A single file could not be read or parsed
    #[error("Skipped {}: {message}", file.display())]
    ScanPartial { file: PathBuf, message: String },

    /// Workspace removal failed after the outcome was decided
    #[error("Failed to remove workspace: {message}")]
    CleanupFailed { message: String },
}

impl ScanError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn clone_failed(message: impl Into<String>) -> Self {
        Self::CloneFailed {
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::InvalidInput(_) => ErrorKind::InvalidInput,
            ScanError::CloneFailed { .. } => ErrorKind::CloneFailed,
            ScanError::ScanPartial { .. } => ErrorKind::ScanPartial,
            ScanError::CleanupFailed { .. } => ErrorKind::CleanupFailed,
        }
    }

    /// Whether a caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScanError::CloneFailed { .. })
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl From<git2::Error> for ScanError {
    fn from(err: git2::Error) -> Self {
        Self::CloneFailed {
            message: err.message().to_string(),
            source: Some(err),
        }
    }
}

/// The serializable shape of a failure: a kind and a message, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

/// A file that was skipped during walking or extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// Path relative to the scanned root.
    pub file: PathBuf,
    pub reason: String,
}

impl SkippedFile {
    pub fn new(root: &Path, path: &Path, reason: impl Into<String>) -> Self {
        let file = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        Self {
            file,
            reason: reason.into(),
        }
    }

    pub fn into_error(self) -> ScanError {
        ScanError::ScanPartial {
            file: self.file,
            message: self.reason,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, ScanError>;
