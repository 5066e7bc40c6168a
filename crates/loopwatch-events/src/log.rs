//! The append-only event log store.
//!
//! [`LogStore`] is the narrow I/O contract every other component is written
//! against: append one line, read all lines, atomically replace the whole
//! file. [`FileLogStore`] is the production implementation;
//! [`MemoryLogStore`] backs pure-logic tests without a filesystem.
//!
//! The store frames lines and nothing more — it never interprets record
//! semantics. Blank lines are dropped on read; everything else is returned
//! byte-for-byte so malformed lines survive any rewrite built on
//! [`read_all`](LogStore::read_all) + [`atomic_replace`](LogStore::atomic_replace).

use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use uuid::Uuid;

use crate::errors::Result;
use crate::types::record::LoopEvent;

/// Narrow store contract: append, read, atomically replace.
pub trait LogStore {
    /// Append one newline-terminated record. Never reorders or rewrites
    /// prior content.
    fn append(&self, event: &LoopEvent) -> Result<()>;

    /// All non-blank lines, in file order. A missing file reads as empty.
    fn read_all(&self) -> Result<Vec<String>>;

    /// Replace the entire contents with `lines` such that a concurrent
    /// reader observes either the old or the new content, never a mix.
    fn atomic_replace(&self, lines: &[String]) -> Result<()>;
}

/// File-backed log store: one JSON record per line, UTF-8.
#[derive(Clone, Debug)]
pub struct FileLogStore {
    path: PathBuf,
}

impl FileLogStore {
    /// Create a store over the given log file path. The file itself is
    /// created lazily on first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The underlying log file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogStore for FileLogStore {
    fn append(&self, event: &LoopEvent) -> Result<()> {
        let line = event.to_line()?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        // One write call per record — appends of this size are atomic enough
        // at the OS level that concurrent appenders do not interleave.
        file.write_all(format!("{line}\n").as_bytes())?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(content
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(str::to_owned)
            .collect())
    }

    fn atomic_replace(&self, lines: &[String]) -> Result<()> {
        let file_name = self
            .path
            .file_name()
            .map_or_else(|| "log".to_owned(), |n| n.to_string_lossy().into_owned());
        let tmp_path = self
            .path
            .with_file_name(format!("{file_name}.{}.tmp", Uuid::now_v7()));

        let mut body = lines.join("\n");
        body.push('\n');

        {
            let mut tmp = std::fs::File::create(&tmp_path)?;
            tmp.write_all(body.as_bytes())?;
            tmp.sync_all()?;
        }

        // Same-directory rename is atomic; readers see old or new, never a
        // torn file.
        if let Err(err) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        Ok(())
    }
}

/// In-memory log store for tests and embedders that fake the filesystem.
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw lines (parseable or not).
    #[must_use]
    pub fn with_lines(lines: Vec<String>) -> Self {
        Self {
            lines: Mutex::new(lines),
        }
    }

    /// Push one raw line, bypassing serialization. Used to seed malformed
    /// content.
    pub fn push_raw(&self, line: impl Into<String>) {
        self.lines.lock().push(line.into());
    }
}

impl LogStore for MemoryLogStore {
    fn append(&self, event: &LoopEvent) -> Result<()> {
        let line = event.to_line()?;
        self.lines.lock().push(line);
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<String>> {
        Ok(self.lines.lock().clone())
    }

    fn atomic_replace(&self, lines: &[String]) -> Result<()> {
        *self.lines.lock() = lines.to_vec();
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
