//! The liveness oracle — "is this loop's owning process still running?"
//!
//! Liveness is a filesystem predicate: the task runner creates a marker file
//! when a loop starts and deletes it when the loop's process goes away. The
//! oracle only tests existence; whatever the runner writes into the marker
//! is its own business.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Answers whether the marker file for a loop currently exists.
pub trait LivenessOracle {
    /// `true` while the marker exists, i.e. the owning process is presumed
    /// alive.
    fn is_running(&self, marker: &Path) -> bool;
}

/// Production oracle: the marker's existence on disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLiveness;

impl LivenessOracle for FsLiveness {
    fn is_running(&self, marker: &Path) -> bool {
        marker.exists()
    }
}

/// Fixed-answer oracle for tests and dry runs: a set of paths considered
/// running.
#[derive(Clone, Debug, Default)]
pub struct StaticLiveness {
    running: HashSet<PathBuf>,
}

impl StaticLiveness {
    /// Oracle that reports every path as dead.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Oracle that reports exactly `paths` as running.
    #[must_use]
    pub fn running<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            running: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl LivenessOracle for StaticLiveness {
    fn is_running(&self, marker: &Path) -> bool {
        self.running.contains(marker)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
