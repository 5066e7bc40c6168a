//! Session reconciliation — the pure read path.
//!
//! [`reconcile`] merges the raw log lines with the liveness oracle's view
//! into ordered [`SessionRecord`]s:
//!
//! 1. Parse every line independently; malformed lines are logged and
//!    excluded from grouping (never deleted — rewrites happen elsewhere).
//! 2. Group events by effective identity into `{start?, completion?}` pairs,
//!    preserving first-seen order.
//! 3. Classify each group: both halves → the completion's outcome; start
//!    alone → `active` or `orphaned` depending on the liveness marker;
//!    completion alone → an orphaned entry with synthesized display fields.
//! 4. Order: actives first in original relative order, then everything else
//!    newest-first.
//!
//! The whole pass is a pure transform over its inputs — no caching, no side
//! effects — and is recomputed from scratch on every query.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::errors::Result;
use crate::liveness::LivenessOracle;
use crate::log::LogStore;
use crate::promise::resolve_promise;
use crate::types::record::{CompletionEvent, LoopEvent, StartEvent};
use crate::types::session::{SessionQuery, SessionRecord, SessionStatus};

/// Placeholder shown when a completion's start record is gone and no project
/// name survives.
const UNKNOWN_PROJECT: &str = "unknown";

#[derive(Default)]
struct Group {
    start: Option<StartEvent>,
    completion: Option<CompletionEvent>,
}

/// Read the store and reconcile against the oracle at the current instant.
pub fn load_sessions(
    store: &dyn LogStore,
    liveness: &dyn LivenessOracle,
) -> Result<SessionQuery> {
    let lines = store.read_all()?;
    Ok(reconcile(&lines, liveness, Utc::now()))
}

/// Reconcile raw log lines into ordered session records.
///
/// `now` is threaded explicitly so live durations are deterministic under
/// test.
#[must_use]
pub fn reconcile(
    lines: &[String],
    liveness: &dyn LivenessOracle,
    now: DateTime<Utc>,
) -> SessionQuery {
    let groups = group_events(lines);

    let records: Vec<SessionRecord> = groups
        .into_iter()
        .map(|(identity, group)| build_record(identity, group, liveness, now))
        .collect();

    order_records(records)
}

/// Group parsed events by effective identity, preserving first-seen order.
fn group_events(lines: &[String]) -> Vec<(String, Group)> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Group> = HashMap::new();

    for (index, line) in lines.iter().enumerate() {
        let event = match LoopEvent::parse_line(line) {
            Ok(event) => event,
            Err(err) => {
                debug!(line = index + 1, %err, "malformed log line, excluded from grouping");
                continue;
            }
        };

        let identity = event.identity().to_owned();
        let group = groups.entry(identity.clone()).or_insert_with(|| {
            order.push(identity.clone());
            Group::default()
        });

        match event {
            LoopEvent::Active(start) => {
                if group.start.is_some() {
                    warn!(identity = %identity, "duplicate start record, keeping the first");
                } else {
                    group.start = Some(start);
                }
            }
            LoopEvent::Completed(completion) => {
                if group.completion.is_some() {
                    warn!(identity = %identity, "duplicate completion record, keeping the first");
                } else {
                    group.completion = Some(completion);
                }
            }
        }
    }

    order
        .into_iter()
        .map(|identity| {
            let group = groups.remove(&identity).unwrap_or_default();
            (identity, group)
        })
        .collect()
}

fn build_record(
    identity: String,
    group: Group,
    liveness: &dyn LivenessOracle,
    now: DateTime<Utc>,
) -> SessionRecord {
    match (group.start, group.completion) {
        (Some(start), Some(completion)) => {
            let resolved = resolve_promise(start.completion_promise.as_deref(), &start.task);
            SessionRecord {
                id: identity,
                loop_id: start.loop_id.clone().or_else(|| completion.loop_id.clone()),
                session_id: start.session_id,
                status: completion.outcome.into(),
                project: start.project,
                project_name: start.project_name,
                task: resolved.task,
                state_file_path: start.state_file_path,
                started_at: Some(start.started_at),
                ended_at: Some(completion.ended_at),
                duration_seconds: completion.duration_seconds,
                iterations: completion.iterations,
                max_iterations: start.max_iterations,
                completion_promise: resolved.promise,
                error_reason: completion.error_reason,
            }
        }
        (Some(start), None) => {
            // No completion on record: the marker decides between a loop
            // that's still running and one whose process died silently. A
            // start that never recorded a marker path can't be
            // liveness-checked and stays active.
            let alive = match &start.state_file_path {
                Some(marker) => liveness.is_running(marker),
                None => true,
            };
            let status = if alive {
                SessionStatus::Active
            } else {
                SessionStatus::Orphaned
            };
            let resolved = resolve_promise(start.completion_promise.as_deref(), &start.task);
            let live_duration =
                u64::try_from((now - start.started_at).num_seconds().max(0)).unwrap_or(0);
            SessionRecord {
                id: identity,
                loop_id: start.loop_id,
                session_id: start.session_id,
                status,
                project: start.project,
                project_name: start.project_name,
                task: resolved.task,
                state_file_path: start.state_file_path,
                started_at: Some(start.started_at),
                ended_at: None,
                duration_seconds: live_duration,
                iterations: 0,
                max_iterations: start.max_iterations,
                completion_promise: resolved.promise,
                error_reason: None,
            }
        }
        (None, Some(completion)) => {
            // The start record is gone — lost to a defective historical
            // compaction, or never written. Surface the completion anyway
            // with synthesized display fields.
            SessionRecord {
                id: identity,
                loop_id: completion.loop_id,
                session_id: completion.session_id,
                status: SessionStatus::Orphaned,
                project: UNKNOWN_PROJECT.to_owned(),
                project_name: UNKNOWN_PROJECT.to_owned(),
                task: format!("Orphaned: {}", completion.outcome),
                state_file_path: None,
                started_at: None,
                ended_at: Some(completion.ended_at),
                duration_seconds: completion.duration_seconds,
                iterations: completion.iterations,
                max_iterations: 0,
                completion_promise: None,
                error_reason: completion.error_reason,
            }
        }
        (None, None) => unreachable!("groups are only created when an event arrives"),
    }
}

/// Actives first in original relative order, then the rest sorted by their
/// sort timestamp, most recent first.
fn order_records(records: Vec<SessionRecord>) -> SessionQuery {
    let (active, mut rest): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|record| record.status == SessionStatus::Active);

    rest.sort_by(|a, b| b.sort_timestamp().cmp(&a.sort_timestamp()));

    let active_count = active.len();
    let mut sessions = active;
    sessions.extend(rest);
    let total = sessions.len();

    SessionQuery {
        sessions,
        total,
        active_count,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
