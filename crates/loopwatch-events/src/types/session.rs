//! Derived session records — the reconciled view of one task run.
//!
//! Nothing in this module is ever persisted. Records are rebuilt from the
//! current log plus the current liveness state on every read.

use chrono::{DateTime, Utc};
use loopwatch_core::{LoopId, SessionId};
use serde::Serialize;
use std::path::PathBuf;

use super::record::LoopOutcome;

/// Current status of one reconciled session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Start recorded, no completion, liveness marker present (or none was
    /// ever recorded).
    Active,
    /// Either the owning process died without recording completion (start
    /// present, marker gone), or the start record was lost (completion
    /// present alone).
    Orphaned,
    /// Completed: the loop finished its task.
    Success,
    /// Completed: cancelled by hand.
    Cancelled,
    /// Completed: died with an error.
    Error,
    /// Completed: hit the iteration ceiling.
    MaxIterations,
}

impl From<LoopOutcome> for SessionStatus {
    fn from(outcome: LoopOutcome) -> Self {
        match outcome {
            LoopOutcome::Success => Self::Success,
            LoopOutcome::Cancelled => Self::Cancelled,
            LoopOutcome::Error => Self::Error,
            LoopOutcome::MaxIterations => Self::MaxIterations,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("active"),
            Self::Orphaned => f.write_str("orphaned"),
            Self::Success => f.write_str("success"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Error => f.write_str("error"),
            Self::MaxIterations => f.write_str("max_iterations"),
        }
    }
}

/// The reconciled view of one task run.
#[derive(Clone, Debug, Serialize)]
pub struct SessionRecord {
    /// Effective identity (`loop_id`, or `session_id` for legacy rows).
    pub id: String,
    /// Loop ID when the underlying records carried one.
    pub loop_id: Option<LoopId>,
    /// Host session ID.
    pub session_id: SessionId,
    /// Reconciled status.
    pub status: SessionStatus,
    /// Project directory.
    pub project: String,
    /// Human-facing project name (placeholder for orphaned completions whose
    /// start record is gone).
    pub project_name: String,
    /// Task text with any embedded completion-promise flag stripped.
    pub task: String,
    /// Liveness marker path from the start record.
    pub state_file_path: Option<PathBuf>,
    /// Start time; absent for orphaned completions whose start is gone.
    pub started_at: Option<DateTime<Utc>>,
    /// End time from the completion record.
    pub ended_at: Option<DateTime<Utc>>,
    /// Runtime in seconds — live (`now − started_at`) while unresolved,
    /// stored `duration_seconds` once completed.
    pub duration_seconds: u64,
    /// Iterations executed, from the completion record (0 while running).
    pub iterations: u32,
    /// Configured iteration ceiling (0 when the start record is gone).
    pub max_iterations: u32,
    /// Completion promise — explicit field first, else extracted from the
    /// task text.
    pub completion_promise: Option<String>,
    /// Failure detail for `error` outcomes.
    pub error_reason: Option<String>,
}

impl SessionRecord {
    /// The timestamp this record sorts on within the non-active tier.
    #[must_use]
    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        self.started_at
            .or(self.ended_at)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Ordered session records plus the summary counts the presentation layer
/// shows.
#[derive(Clone, Debug, Serialize)]
pub struct SessionQuery {
    /// Records: actives first (original order), then the rest newest-first.
    pub sessions: Vec<SessionRecord>,
    /// Total number of records.
    pub total: usize,
    /// Number of `active` records.
    pub active_count: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
