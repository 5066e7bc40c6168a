//! Error types for the event log subsystem.
//!
//! [`EventLogError`] is the primary error type returned by all log, rotation,
//! and cancellation operations. Malformed log lines are deliberately NOT an
//! error anywhere in this crate — they are preserved verbatim and skipped
//! during grouping.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during event log operations.
#[derive(Debug, Error)]
pub enum EventLogError {
    /// Filesystem read/write failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure when appending a record.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The session targeted by an operation no longer exists in the log.
    #[error("session not found in log: {0}")]
    SessionNotFound(String),

    /// An operation required an `active` session but the current log state
    /// says otherwise.
    #[error("session is not active: {0}")]
    NotActive(String),

    /// A cancellation was requested for a session that never recorded a
    /// liveness marker path.
    #[error("session has no liveness marker path: {0}")]
    MissingMarkerPath(String),

    /// A recorded path resolved outside the directory it must live in.
    #[error("path {path} resolves outside {base}")]
    PathOutsideBoundary {
        /// The offending path as recorded.
        path: PathBuf,
        /// The directory the path was required to stay within.
        base: PathBuf,
    },

    /// Writing the pre-rotation backup failed; the log was left untouched.
    #[error("backup write failed: {0}")]
    BackupFailed(String),

    /// A rotation validation step failed and the log was restored from
    /// backup.
    #[error("rotation aborted: {0}")]
    RotationAborted(String),

    /// Restoring the log from backup failed. The backup file is left in
    /// place for manual recovery; no further automated repair is attempted.
    #[error("restore from backup failed (backup left at {backup}): {message}")]
    RestoreFailed {
        /// Location of the surviving backup file.
        backup: PathBuf,
        /// What went wrong during the restore.
        message: String,
    },
}

/// Convenience type alias for event log results.
pub type Result<T> = std::result::Result<T, EventLogError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
