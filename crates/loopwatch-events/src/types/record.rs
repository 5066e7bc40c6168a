//! The [`LoopEvent`] enum — the persisted wire format of the event log.
//!
//! Each log line is one JSON object tagged by its `status` field:
//! `"active"` for a start record, `"completed"` for a completion record.
//! Unknown tags are rejected at the parse boundary rather than inferred from
//! field presence. A line that fails to parse is malformed — callers keep it
//! byte-for-byte and exclude it from grouping; it is never an error and never
//! deleted.
//!
//! Both record kinds carry `session_id` (the host terminal process) and,
//! outside of legacy rows, `loop_id` (one task run). The effective identity
//! used for grouping is `loop_id` when present, else `session_id` — two start
//! records sharing a `session_id` but carrying different `loop_id`s are two
//! independent runs.

use chrono::{DateTime, Utc};
use loopwatch_core::{LoopId, SessionId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One immutable fact appended to the log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoopEvent {
    /// A loop started (`status = "active"`).
    Active(StartEvent),
    /// A loop finished, one way or another (`status = "completed"`).
    Completed(CompletionEvent),
}

impl LoopEvent {
    /// The effective identity used to group events into one task run:
    /// `loop_id` when present, else `session_id` (legacy rows).
    #[must_use]
    pub fn identity(&self) -> &str {
        match self {
            Self::Active(start) => start
                .loop_id
                .as_deref()
                .unwrap_or_else(|| start.session_id.as_str()),
            Self::Completed(completion) => completion
                .loop_id
                .as_deref()
                .unwrap_or_else(|| completion.session_id.as_str()),
        }
    }

    /// The loop ID, when the record carries one.
    #[must_use]
    pub fn loop_id(&self) -> Option<&LoopId> {
        match self {
            Self::Active(start) => start.loop_id.as_ref(),
            Self::Completed(completion) => completion.loop_id.as_ref(),
        }
    }

    /// Parse one log line. `Err` means the line is malformed and must be
    /// preserved verbatim by any rewriter.
    pub fn parse_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Serialize to a single log line (no trailing newline).
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Start record: a loop began running in some session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartEvent {
    /// Identity of this task run. Absent on legacy rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_id: Option<LoopId>,
    /// Identity of the host process/terminal.
    pub session_id: SessionId,
    /// Project directory the loop runs in.
    pub project: String,
    /// Human-facing project name.
    pub project_name: String,
    /// Liveness marker file; its existence means the loop is still running.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file_path: Option<PathBuf>,
    /// Free-text task description. May embed a `--completion-promise=` flag.
    pub task: String,
    /// When the loop started.
    pub started_at: DateTime<Utc>,
    /// Iteration ceiling the runner was configured with (≥ 1).
    pub max_iterations: u32,
    /// Explicit completion promise; `null` means "extract from task text, if
    /// present there".
    #[serde(default)]
    pub completion_promise: Option<String>,
}

/// Completion record: a loop stopped, with an outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Identity of this task run. Absent on legacy rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_id: Option<LoopId>,
    /// Identity of the host process/terminal.
    pub session_id: SessionId,
    /// How the loop ended.
    pub outcome: LoopOutcome,
    /// When the loop ended.
    pub ended_at: DateTime<Utc>,
    /// Wall-clock runtime in seconds (≥ 0).
    pub duration_seconds: u64,
    /// Iterations actually executed (≥ 0).
    pub iterations: u32,
    /// Failure detail for `error` outcomes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_reason: Option<String>,
}

/// How a completed loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopOutcome {
    /// The loop finished its task (completion promise observed).
    Success,
    /// The loop hit its iteration ceiling.
    MaxIterations,
    /// The loop was cancelled by hand.
    Cancelled,
    /// The loop died with an error.
    Error,
}

impl std::fmt::Display for LoopOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::MaxIterations => f.write_str("max_iterations"),
            Self::Cancelled => f.write_str("cancelled"),
            Self::Error => f.write_str("error"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
