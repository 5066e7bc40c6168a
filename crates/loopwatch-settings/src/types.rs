//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` to match the settings
//! JSON wire format, and `#[serde(default)]` so partial files are valid —
//! missing fields get their default value during deserialization.

use std::path::PathBuf;

use loopwatch_core::paths::default_data_dir;
use serde::{Deserialize, Serialize};

/// Root settings type for loopwatch.
///
/// Loaded from `~/.loopwatch/settings.json` with defaults applied for
/// missing fields. Environment variables can override specific values.
///
/// # JSON Format
///
/// ```json
/// {
///   "version": "0.1.0",
///   "storage": { "logFile": "/home/me/.loopwatch/loops.json" },
///   "rotation": { "maxEntries": 200 }
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoopwatchSettings {
    /// Settings schema version.
    pub version: String,
    /// File locations for the log, markers, and transcripts.
    pub storage: StorageSettings,
    /// Log rotation limits.
    pub rotation: RotationSettings,
}

impl Default for LoopwatchSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            storage: StorageSettings::default(),
            rotation: RotationSettings::default(),
        }
    }
}

/// Where the event log, liveness markers, and per-loop transcripts live.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageSettings {
    /// The append-only event log (one JSON record per line).
    pub log_file: PathBuf,
    /// Directory containing liveness marker files. Marker paths recorded in
    /// the log must resolve inside this directory to be acted on.
    pub state_dir: PathBuf,
    /// Directory containing per-loop transcript artifacts cleaned up after
    /// rotation.
    pub transcripts_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            log_file: data_dir.join("loops.json"),
            state_dir: data_dir.join("state"),
            transcripts_dir: data_dir.join("transcripts"),
        }
    }
}

/// Rotation limits.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RotationSettings {
    /// Line-count ceiling above which rotation starts purging resolved
    /// sessions.
    pub max_entries: usize,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self { max_entries: 100 }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
