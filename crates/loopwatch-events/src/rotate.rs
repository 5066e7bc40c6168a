//! Crash-safe log rotation.
//!
//! Rotation bounds the log by purging the oldest fully-resolved groups (one
//! start plus one completion, exactly two lines) once the line count exceeds
//! the configured ceiling. The protocol is strictly
//! backup → plan → validate → commit-or-restore:
//!
//! - a byte-identical backup is written before any mutation, and a backup
//!   write failure aborts with the log untouched;
//! - a single rotation never removes more than half the existing lines, no
//!   matter how far over the ceiling the log has grown;
//! - lines that fail to parse are never purged;
//! - the filtered output is re-validated (exact count, non-empty, still
//!   parseable) before commit, and any failure restores the original from
//!   backup;
//! - the commit itself is a temp-file write plus atomic rename, so a
//!   concurrent reader never observes a torn file;
//! - if the restore itself fails, the backup is left on disk for manual
//!   recovery — no automated repair-of-repair.
//!
//! Per-loop transcript artifacts for purged identities are deleted after the
//! commit, best-effort, outside the rollback scope.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use loopwatch_core::LoopId;
use loopwatch_core::paths::is_within;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::errors::{EventLogError, Result};
use crate::log::{FileLogStore, LogStore};
use crate::types::record::LoopEvent;

/// Loop IDs are used to build artifact paths, so anything that is not a
/// plain identifier is refused before the filesystem is touched.
static LOOP_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$")
        .unwrap_or_else(|err| panic!("loop id regex is invalid: {err}"))
});

/// What a rotation did, returned to the caller and never persisted.
#[derive(Clone, Debug, Serialize)]
pub struct RotationOutcome {
    /// Whether the rotation (or no-op) completed without a failure.
    pub success: bool,
    /// Line count before rotation.
    pub entries_before: usize,
    /// Line count after rotation.
    pub entries_after: usize,
    /// Number of resolved session groups purged.
    pub sessions_purged: usize,
    /// Failure detail when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RotationOutcome {
    fn noop(entries: usize) -> Self {
        Self {
            success: true,
            entries_before: entries,
            entries_after: entries,
            sessions_purged: 0,
            error: None,
        }
    }

    fn failed(entries: usize, error: &EventLogError) -> Self {
        Self {
            success: false,
            entries_before: entries,
            entries_after: entries,
            sessions_purged: 0,
            error: Some(error.to_string()),
        }
    }
}

struct RotationPlan {
    filtered: Vec<String>,
    purged_identities: HashSet<String>,
    purged_loop_ids: Vec<LoopId>,
    removed_lines: usize,
}

/// Rotate the log if it has outgrown `max_entries` lines.
///
/// Returns `Ok` with `success: false` when a validation step failed and the
/// original content was restored from backup; returns `Err` only for I/O
/// failures before any mutation and for the restore-failed case (backup left
/// in place).
pub fn rotate(
    store: &FileLogStore,
    max_entries: usize,
    transcripts_dir: &Path,
) -> Result<RotationOutcome> {
    let lines = store.read_all()?;
    let entries_before = lines.len();

    if entries_before <= max_entries {
        debug!(entries = entries_before, max_entries, "log under ceiling, nothing to rotate");
        return Ok(RotationOutcome::noop(entries_before));
    }

    // Backup before any mutation. A failed backup aborts with the original
    // untouched.
    let backup = backup_path(store.path());
    if let Err(err) = std::fs::copy(store.path(), &backup) {
        return Err(EventLogError::BackupFailed(err.to_string()));
    }

    let Some(plan) = plan_rotation(&lines, max_entries) else {
        remove_backup(&backup);
        return Ok(RotationOutcome::noop(entries_before));
    };

    if let Err(err) = validate_plan(&lines, &plan) {
        return abort_and_restore(store, &backup, entries_before, &err);
    }

    if let Err(err) = store.atomic_replace(&plan.filtered) {
        return abort_and_restore(store, &backup, entries_before, &err);
    }

    remove_backup(&backup);

    // Post-commit, independently failable: transcript cleanup never rolls
    // back the already-committed rewrite.
    cleanup_artifacts(&plan.purged_loop_ids, transcripts_dir);

    info!(
        purged = plan.purged_identities.len(),
        removed_lines = plan.removed_lines,
        entries_after = plan.filtered.len(),
        "log rotated"
    );

    Ok(RotationOutcome {
        success: true,
        entries_before,
        entries_after: plan.filtered.len(),
        sessions_purged: plan.purged_identities.len(),
        error: None,
    })
}

fn backup_path(log_path: &Path) -> PathBuf {
    let file_name = log_path
        .file_name()
        .map_or_else(|| "log".to_owned(), |n| n.to_string_lossy().into_owned());
    log_path.with_file_name(format!("{file_name}.backup"))
}

fn remove_backup(backup: &Path) {
    if let Err(err) = std::fs::remove_file(backup) {
        warn!(backup = %backup.display(), %err, "could not remove rotation backup");
    }
}

fn abort_and_restore(
    store: &FileLogStore,
    backup: &Path,
    entries_before: usize,
    err: &EventLogError,
) -> Result<RotationOutcome> {
    warn!(%err, "rotation aborted, restoring log from backup");
    if let Err(restore_err) = std::fs::copy(backup, store.path()) {
        // The one case where the backup survives: restoring it failed.
        return Err(EventLogError::RestoreFailed {
            backup: backup.to_path_buf(),
            message: restore_err.to_string(),
        });
    }
    remove_backup(backup);
    Ok(RotationOutcome::failed(entries_before, err))
}

/// Steps 3–8: group, select, and filter. Returns `None` when there is
/// nothing safe to purge.
fn plan_rotation(lines: &[String], max_entries: usize) -> Option<RotationPlan> {
    #[derive(Default)]
    struct GroupStat {
        line_count: usize,
        start_count: usize,
        completion_count: usize,
        started_at: Option<DateTime<Utc>>,
        loop_id: Option<LoopId>,
    }

    let mut stats: HashMap<String, GroupStat> = HashMap::new();
    for line in lines {
        let Ok(event) = LoopEvent::parse_line(line) else {
            continue;
        };
        let stat = stats.entry(event.identity().to_owned()).or_default();
        stat.line_count += 1;
        if stat.loop_id.is_none() {
            stat.loop_id = event.loop_id().cloned();
        }
        match event {
            LoopEvent::Active(start) => {
                stat.start_count += 1;
                stat.started_at = Some(start.started_at);
            }
            LoopEvent::Completed(_) => stat.completion_count += 1,
        }
    }

    // A group is purgeable only when it is exactly one start plus one
    // completion. Anything with extra or duplicate lines is anomalous and is
    // skipped, never purged.
    let mut complete: Vec<(String, DateTime<Utc>, Option<LoopId>)> = stats
        .into_iter()
        .filter_map(|(identity, stat)| {
            let is_complete =
                stat.line_count == 2 && stat.start_count == 1 && stat.completion_count == 1;
            let started_at = stat.started_at?;
            is_complete.then_some((identity, started_at, stat.loop_id))
        })
        .collect();

    if complete.is_empty() {
        return None;
    }

    complete.sort_by_key(|(_, started_at, _)| *started_at);

    // Never remove more than half the log in one pass; oversized backlogs
    // compact gradually across invocations.
    let over_ceiling = lines.len() - max_entries;
    let to_remove = over_ceiling.min(lines.len() / 2);

    let mut purged_identities = HashSet::new();
    let mut purged_loop_ids = Vec::new();
    let mut removed_lines = 0usize;
    for (identity, _, loop_id) in complete {
        if removed_lines >= to_remove {
            break;
        }
        let _ = purged_identities.insert(identity);
        if let Some(loop_id) = loop_id {
            purged_loop_ids.push(loop_id);
        }
        // Groups are removed as whole units of two lines, never split.
        removed_lines += 2;
    }

    if purged_identities.is_empty() {
        return None;
    }

    let filtered: Vec<String> = lines
        .iter()
        .filter(|line| match LoopEvent::parse_line(line) {
            Ok(event) => !purged_identities.contains(event.identity()),
            // Unparsable lines are always kept, whatever the purge set says.
            Err(_) => true,
        })
        .cloned()
        .collect();

    Some(RotationPlan {
        filtered,
        purged_identities,
        purged_loop_ids,
        removed_lines,
    })
}

/// Steps 9–11: exact count, non-empty, retained lines still parse.
fn validate_plan(lines: &[String], plan: &RotationPlan) -> Result<()> {
    let expected = lines.len() - plan.removed_lines;
    if plan.filtered.len() != expected {
        return Err(EventLogError::RotationAborted(format!(
            "filtered line count {} does not match expected {expected}",
            plan.filtered.len()
        )));
    }

    if plan.filtered.is_empty() {
        return Err(EventLogError::RotationAborted(
            "rotation would empty the log".to_owned(),
        ));
    }

    let parseable: HashSet<&str> = lines
        .iter()
        .filter(|line| LoopEvent::parse_line(line).is_ok())
        .map(String::as_str)
        .collect();
    for line in &plan.filtered {
        if parseable.contains(line.as_str()) && LoopEvent::parse_line(line).is_err() {
            return Err(EventLogError::RotationAborted(
                "a retained line no longer parses after filtering".to_owned(),
            ));
        }
    }

    Ok(())
}

/// Step 13: best-effort deletion of per-loop transcript artifacts.
///
/// Only plain-identifier loop IDs are acted on, and only paths that resolve
/// inside the transcripts directory; failures are logged and ignored.
fn cleanup_artifacts(loop_ids: &[LoopId], transcripts_dir: &Path) {
    for loop_id in loop_ids {
        if !LOOP_ID_RE.is_match(loop_id.as_str()) {
            warn!(loop_id = %loop_id, "skipping artifact cleanup for non-identifier loop id");
            continue;
        }
        let artifact = transcripts_dir.join(format!("{loop_id}.jsonl"));
        if !is_within(transcripts_dir, &artifact) {
            warn!(path = %artifact.display(), "artifact path escapes transcripts dir, skipping");
            continue;
        }
        match std::fs::remove_file(&artifact) {
            Ok(()) => debug!(path = %artifact.display(), "removed transcript artifact"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %artifact.display(), %err, "could not remove transcript artifact");
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::{CompletionEvent, LoopOutcome, StartEvent};
    use chrono::TimeZone;
    use loopwatch_core::SessionId;
    use tempfile::TempDir;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 14, hour, 0, 0).unwrap()
    }

    fn start_line(loop_id: &str, hour: u32) -> String {
        LoopEvent::Active(StartEvent {
            loop_id: Some(LoopId::from(loop_id)),
            session_id: SessionId::from("sess-1"),
            project: "/p".into(),
            project_name: "p".into(),
            state_file_path: None,
            task: "work".into(),
            started_at: at(hour),
            max_iterations: 5,
            completion_promise: None,
        })
        .to_line()
        .unwrap()
    }

    fn completion_line(loop_id: &str, hour: u32) -> String {
        LoopEvent::Completed(CompletionEvent {
            loop_id: Some(LoopId::from(loop_id)),
            session_id: SessionId::from("sess-1"),
            outcome: LoopOutcome::Success,
            ended_at: at(hour),
            duration_seconds: 60,
            iterations: 1,
            error_reason: None,
        })
        .to_line()
        .unwrap()
    }

    fn store_with(dir: &TempDir, lines: &[String]) -> FileLogStore {
        let path = dir.path().join("loops.json");
        let mut body = lines.join("\n");
        body.push('\n');
        std::fs::write(&path, body).unwrap();
        FileLogStore::new(path)
    }

    fn backup_of(store: &FileLogStore) -> PathBuf {
        backup_path(store.path())
    }

    // ── No-op paths ───────────────────────────────────────────────────

    #[test]
    fn missing_file_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let store = FileLogStore::new(dir.path().join("loops.json"));
        let outcome = rotate(&store, 100, dir.path()).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.sessions_purged, 0);
        assert_eq!(outcome.entries_before, 0);
    }

    #[test]
    fn under_ceiling_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let lines = vec![start_line("loop-1", 9), completion_line("loop-1", 10)];
        let store = store_with(&dir, &lines);
        let before = std::fs::read(store.path()).unwrap();

        let outcome = rotate(&store, 100, dir.path()).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.sessions_purged, 0);
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
        assert!(!backup_of(&store).exists());
    }

    #[test]
    fn at_ceiling_exactly_is_a_noop() {
        let dir = TempDir::new().unwrap();
        let lines = vec![start_line("loop-1", 9), completion_line("loop-1", 10)];
        let store = store_with(&dir, &lines);
        let outcome = rotate(&store, 2, dir.path()).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.sessions_purged, 0);
    }

    #[test]
    fn no_complete_groups_is_a_noop_with_no_backup_left() {
        let dir = TempDir::new().unwrap();
        // Three dangling starts: over a ceiling of 2 but nothing purgeable.
        let lines = vec![
            start_line("loop-1", 9),
            start_line("loop-2", 10),
            start_line("loop-3", 11),
        ];
        let store = store_with(&dir, &lines);
        let before = std::fs::read(store.path()).unwrap();

        let outcome = rotate(&store, 2, dir.path()).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.sessions_purged, 0);
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
        assert!(!backup_of(&store).exists());
    }

    // ── Purging ───────────────────────────────────────────────────────

    #[test]
    fn purges_oldest_complete_groups_first() {
        let dir = TempDir::new().unwrap();
        let lines = vec![
            start_line("loop-old", 8),
            completion_line("loop-old", 9),
            start_line("loop-mid", 10),
            completion_line("loop-mid", 11),
            start_line("loop-new", 12),
            completion_line("loop-new", 13),
        ];
        let store = store_with(&dir, &lines);

        // 6 lines, ceiling 4: to_remove = 2 → exactly the oldest group.
        let outcome = rotate(&store, 4, dir.path()).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.sessions_purged, 1);
        assert_eq!(outcome.entries_before, 6);
        assert_eq!(outcome.entries_after, 4);

        let remaining = store.read_all().unwrap();
        assert!(remaining.iter().all(|line| !line.contains("loop-old")));
        assert!(remaining.iter().any(|line| line.contains("loop-mid")));
        assert!(remaining.iter().any(|line| line.contains("loop-new")));
        assert!(!backup_of(&store).exists());
    }

    #[test]
    fn groups_are_removed_whole_never_split() {
        let dir = TempDir::new().unwrap();
        let lines = vec![
            start_line("loop-a", 8),
            completion_line("loop-a", 9),
            start_line("loop-b", 10),
            completion_line("loop-b", 11),
            start_line("loop-c", 12),
            completion_line("loop-c", 13),
        ];
        let store = store_with(&dir, &lines);

        // to_remove = 6 - 3 = 3, so the greedy selection overshoots to 4
        // lines (two whole groups).
        let outcome = rotate(&store, 3, dir.path()).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.sessions_purged, 2);
        assert_eq!(outcome.entries_after, 2);
        let remaining = store.read_all().unwrap();
        assert!(remaining.iter().all(|line| line.contains("loop-c")));
    }

    #[test]
    fn bounded_to_half_the_log() {
        let dir = TempDir::new().unwrap();
        // 10 lines, every group complete, ceiling 0: to_remove clamps to 5,
        // greedy whole-group selection removes 6.
        let mut lines = Vec::new();
        for i in 0..5 {
            lines.push(start_line(&format!("loop-{i}"), 6 + i));
            lines.push(completion_line(&format!("loop-{i}"), 7 + i));
        }
        let store = store_with(&dir, &lines);

        let outcome = rotate(&store, 0, dir.path()).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.entries_before, 10);
        assert_eq!(outcome.entries_after, 4);
        assert_eq!(outcome.sessions_purged, 3);
    }

    #[test]
    fn post_rotation_count_is_exact() {
        let dir = TempDir::new().unwrap();
        let mut lines = Vec::new();
        for i in 0..8 {
            lines.push(start_line(&format!("loop-{i}"), 6));
            lines.push(completion_line(&format!("loop-{i}"), 7));
        }
        let store = store_with(&dir, &lines);

        let outcome = rotate(&store, 10, dir.path()).unwrap();

        assert!(outcome.success);
        assert_eq!(
            outcome.entries_after,
            outcome.entries_before - 2 * outcome.sessions_purged
        );
        assert_eq!(store.read_all().unwrap().len(), outcome.entries_after);
    }

    #[test]
    fn single_complete_group_over_zero_ceiling_refuses_to_empty() {
        let dir = TempDir::new().unwrap();
        let lines = vec![start_line("loop-1", 9), completion_line("loop-1", 10)];
        let store = store_with(&dir, &lines);
        let before = std::fs::read(store.path()).unwrap();

        // to_remove clamps to 1, the only group has 2 lines; removing it
        // would empty the file — the greedy pass still selects it, and the
        // never-empty validation refuses and restores.
        let outcome = rotate(&store, 0, dir.path()).unwrap();

        assert!(!outcome.success);
        assert!(outcome.error.as_deref().unwrap().contains("empty"));
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
        assert!(!backup_of(&store).exists());
    }

    // ── Anomalous and unparsable content ──────────────────────────────

    #[test]
    fn malformed_lines_survive_rotation_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        let garbage = "{ torn write from a concurrent appender";
        let lines = vec![
            start_line("loop-old", 8),
            completion_line("loop-old", 9),
            garbage.to_owned(),
            start_line("loop-new", 12),
            completion_line("loop-new", 13),
        ];
        let store = store_with(&dir, &lines);

        let outcome = rotate(&store, 3, dir.path()).unwrap();

        assert!(outcome.success);
        let remaining = store.read_all().unwrap();
        assert!(remaining.iter().any(|line| line == garbage));
    }

    #[test]
    fn duplicate_group_is_anomalous_and_never_purged() {
        let dir = TempDir::new().unwrap();
        let lines = vec![
            // Three lines under one identity: anomalous, skipped.
            start_line("loop-dup", 6),
            start_line("loop-dup", 7),
            completion_line("loop-dup", 8),
            start_line("loop-ok", 9),
            completion_line("loop-ok", 10),
        ];
        let store = store_with(&dir, &lines);

        let outcome = rotate(&store, 3, dir.path()).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.sessions_purged, 1);
        let remaining = store.read_all().unwrap();
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|line| line.contains("loop-dup")));
    }

    #[test]
    fn incomplete_groups_are_never_purged() {
        let dir = TempDir::new().unwrap();
        let lines = vec![
            start_line("loop-running", 6),
            start_line("loop-done", 7),
            completion_line("loop-done", 8),
        ];
        let store = store_with(&dir, &lines);

        let outcome = rotate(&store, 1, dir.path()).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.sessions_purged, 1);
        let remaining = store.read_all().unwrap();
        assert_eq!(remaining.len(), 1);
        assert!(remaining[0].contains("loop-running"));
    }

    // ── Validation and restore ────────────────────────────────────────

    #[test]
    fn validate_rejects_count_mismatch() {
        let lines = vec![start_line("loop-1", 9), completion_line("loop-1", 10)];
        let plan = RotationPlan {
            filtered: vec![lines[0].clone()],
            purged_identities: HashSet::from(["loop-1".to_owned()]),
            purged_loop_ids: vec![],
            removed_lines: 2,
        };
        let err = validate_plan(&lines, &plan).unwrap_err();
        assert!(matches!(err, EventLogError::RotationAborted(_)));
    }

    #[test]
    fn validate_rejects_empty_output() {
        let lines = vec![start_line("loop-1", 9), completion_line("loop-1", 10)];
        let plan = RotationPlan {
            filtered: vec![],
            purged_identities: HashSet::from(["loop-1".to_owned()]),
            purged_loop_ids: vec![],
            removed_lines: 2,
        };
        let err = validate_plan(&lines, &plan).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn validate_accepts_exact_plan() {
        let lines = vec![
            start_line("loop-1", 9),
            completion_line("loop-1", 10),
            start_line("loop-2", 11),
        ];
        let plan = plan_rotation(&lines, 1).unwrap();
        validate_plan(&lines, &plan).unwrap();
    }

    #[test]
    fn failed_validation_restores_original_and_removes_backup() {
        // The single-complete-group-ceiling-zero case drives the real
        // restore path end to end.
        let dir = TempDir::new().unwrap();
        let lines = vec![start_line("loop-1", 9), completion_line("loop-1", 10)];
        let store = store_with(&dir, &lines);
        let before = std::fs::read(store.path()).unwrap();

        let outcome = rotate(&store, 0, dir.path()).unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.entries_before, outcome.entries_after);
        assert_eq!(std::fs::read(store.path()).unwrap(), before);
        assert!(!backup_of(&store).exists());
    }

    #[test]
    fn stray_temp_file_does_not_corrupt_reads() {
        // A crash between temp-file write and rename leaves a *.tmp sibling
        // behind; the original must stay fully intact and parseable.
        let dir = TempDir::new().unwrap();
        let lines = vec![start_line("loop-1", 9), completion_line("loop-1", 10)];
        let store = store_with(&dir, &lines);
        std::fs::write(dir.path().join("loops.json.stray.tmp"), "half a rewr").unwrap();

        let read_back = store.read_all().unwrap();
        assert_eq!(read_back, lines);
        for line in &read_back {
            LoopEvent::parse_line(line).unwrap();
        }
    }

    // ── Artifact cleanup ──────────────────────────────────────────────

    #[test]
    fn purged_transcripts_are_deleted() {
        let dir = TempDir::new().unwrap();
        let transcripts = dir.path().join("transcripts");
        std::fs::create_dir_all(&transcripts).unwrap();
        std::fs::write(transcripts.join("loop-old.jsonl"), "{}").unwrap();
        std::fs::write(transcripts.join("loop-new.jsonl"), "{}").unwrap();

        let lines = vec![
            start_line("loop-old", 8),
            completion_line("loop-old", 9),
            start_line("loop-new", 12),
            completion_line("loop-new", 13),
        ];
        let store = store_with(&dir, &lines);

        let outcome = rotate(&store, 3, &transcripts).unwrap();

        assert!(outcome.success);
        assert!(!transcripts.join("loop-old.jsonl").exists());
        assert!(transcripts.join("loop-new.jsonl").exists());
    }

    #[test]
    fn non_identifier_loop_id_never_touches_the_filesystem() {
        let dir = TempDir::new().unwrap();
        let transcripts = dir.path().join("transcripts");
        std::fs::create_dir_all(&transcripts).unwrap();

        // If the hostile id were used naively it would resolve to this file.
        let outside = dir.path().join("precious.jsonl");
        std::fs::write(&outside, "keep me").unwrap();

        cleanup_artifacts(&[LoopId::from("../precious")], &transcripts);

        assert!(outside.exists());
    }

    #[test]
    fn missing_transcript_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let transcripts = dir.path().join("transcripts");
        std::fs::create_dir_all(&transcripts).unwrap();
        // No file for loop-ghost; cleanup must be silent about it.
        cleanup_artifacts(&[LoopId::from("loop-ghost")], &transcripts);
    }

    #[test]
    fn cleanup_failure_does_not_fail_the_rotation() {
        let dir = TempDir::new().unwrap();
        // Transcripts dir does not exist at all — removal fails, rotation
        // still succeeds.
        let transcripts = dir.path().join("never-created");
        let lines = vec![
            start_line("loop-old", 8),
            completion_line("loop-old", 9),
            start_line("loop-new", 12),
            completion_line("loop-new", 13),
        ];
        let store = store_with(&dir, &lines);

        let outcome = rotate(&store, 3, &transcripts).unwrap();
        assert!(outcome.success);
    }
}
