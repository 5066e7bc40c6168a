//! Loop cancellation — deleting a session's liveness marker.
//!
//! Cancellation does not append a completion event. Deleting the marker is
//! the signal; the session-end collaborator observes the marker's absence
//! and records the `cancelled` completion itself. What this module does
//! guarantee:
//!
//! - the target session is `active` in the *current* log, re-verified at
//!   call time — a stale record (a completion has since landed) is rejected
//!   with an error, never silently accepted;
//! - the recorded marker path must resolve inside the expected state
//!   directory before anything is deleted, so a tampered or corrupted path
//!   field cannot reach elsewhere on the filesystem;
//! - a marker that is already gone is success-of-intent, reported as such;
//! - a failed delete is reported, not retried.

use std::path::Path;

use tracing::{info, warn};

use crate::errors::{EventLogError, Result};
use crate::log::LogStore;
use crate::types::record::LoopEvent;
use crate::types::session::{SessionRecord, SessionStatus};

/// What a cancellation did, returned to the caller and never persisted.
#[derive(Clone, Debug, serde::Serialize)]
pub struct CancelOutcome {
    /// Whether the intent "this loop's marker is gone" now holds.
    pub success: bool,
    /// Human-readable description of what happened.
    pub message: String,
}

/// Cancel an active loop by deleting its liveness marker.
///
/// `state_dir` is the directory the marker path must resolve into;
/// `store` is read once to re-verify the record is not stale.
pub fn cancel_loop(
    record: &SessionRecord,
    store: &dyn LogStore,
    state_dir: &Path,
) -> Result<CancelOutcome> {
    if record.status != SessionStatus::Active {
        return Err(EventLogError::NotActive(record.id.clone()));
    }

    verify_still_active(record, store)?;

    let marker = record
        .state_file_path
        .as_deref()
        .ok_or_else(|| EventLogError::MissingMarkerPath(record.id.clone()))?;

    if !loopwatch_core::paths::is_within(state_dir, marker) {
        return Err(EventLogError::PathOutsideBoundary {
            path: marker.to_path_buf(),
            base: state_dir.to_path_buf(),
        });
    }

    if !marker.exists() {
        return Ok(CancelOutcome {
            success: true,
            message: format!(
                "loop {} already had no liveness marker; nothing to delete",
                record.id
            ),
        });
    }

    match std::fs::remove_file(marker) {
        Ok(()) => {
            info!(id = %record.id, marker = %marker.display(), "liveness marker deleted");
            Ok(CancelOutcome {
                success: true,
                message: format!("cancellation requested for loop {}", record.id),
            })
        }
        Err(err) => {
            warn!(id = %record.id, marker = %marker.display(), %err, "marker delete failed");
            Ok(CancelOutcome {
                success: false,
                message: format!("failed to delete liveness marker: {err}"),
            })
        }
    }
}

/// Reject a stale view: the caller's record must still be an unresolved
/// start in the log as it exists right now.
fn verify_still_active(record: &SessionRecord, store: &dyn LogStore) -> Result<()> {
    let lines = store.read_all()?;
    let mut start_seen = false;
    for line in &lines {
        let Ok(event) = LoopEvent::parse_line(line) else {
            continue;
        };
        if event.identity() != record.id {
            continue;
        }
        match event {
            LoopEvent::Active(_) => start_seen = true,
            LoopEvent::Completed(_) => {
                return Err(EventLogError::NotActive(record.id.clone()));
            }
        }
    }
    if !start_seen {
        return Err(EventLogError::SessionNotFound(record.id.clone()));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
