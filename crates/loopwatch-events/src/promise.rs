//! Completion-promise resolution.
//!
//! A loop's completion promise is the exact string the runner watches for to
//! call the task done. It arrives either as an explicit field on the start
//! record or embedded in the free-text task as a `--completion-promise=VALUE`
//! flag (bare, double- or single-quoted).
//!
//! The captured VALUE is the run of non-whitespace, non-quote characters
//! immediately after the `=` — a quoted multi-word value is truncated to its
//! first token. That truncation is long-standing observed behavior; keep it
//! until someone confirms the intent, and document it in tests rather than
//! "fixing" it.

use std::sync::LazyLock;

use regex::Regex;

static PROMISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s*--completion-promise=["']?([^\s"']+)["']?"#)
        .unwrap_or_else(|err| panic!("promise regex is invalid: {err}"))
});

/// Result of scanning a task text for an embedded completion promise.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedPromise {
    /// Task text with the flag (and surrounding extra whitespace) stripped.
    pub task: String,
    /// The captured promise value, if the flag was present.
    pub promise: Option<String>,
}

/// Scan `task` for a `--completion-promise=` flag.
///
/// On a match the flag is removed from the returned task text; otherwise the
/// text is returned unchanged (modulo outer whitespace trimming).
#[must_use]
pub fn extract_promise(task: &str) -> ExtractedPromise {
    match PROMISE_RE.captures(task) {
        Some(caps) => {
            let promise = caps
                .get(1)
                .map(|m| m.as_str().to_owned())
                .filter(|value| !value.is_empty());
            let full = caps.get(0).map_or("", |m| m.as_str());
            let task = task.replacen(full, "", 1).trim().to_owned();
            ExtractedPromise { task, promise }
        }
        None => ExtractedPromise {
            task: task.trim().to_owned(),
            promise: None,
        },
    }
}

/// Resolve the effective completion promise for a start record.
///
/// An explicit non-null field wins verbatim and the task text is left alone;
/// only when the field is absent is the task text scanned (and stripped).
#[must_use]
pub fn resolve_promise(explicit: Option<&str>, task: &str) -> ExtractedPromise {
    match explicit {
        Some(value) => ExtractedPromise {
            task: task.trim().to_owned(),
            promise: Some(value.to_owned()),
        },
        None => extract_promise(task),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
