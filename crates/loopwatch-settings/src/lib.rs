//! # loopwatch-settings
//!
//! Layered configuration for loopwatch.
//!
//! Settings resolve in three layers, later layers winning:
//!
//! 1. Compiled defaults ([`LoopwatchSettings::default`])
//! 2. `~/.loopwatch/settings.json`, deep-merged over the defaults
//! 3. `LOOPWATCH_*` environment variable overrides
//!
//! Every component receives its paths and limits through
//! [`LoopwatchSettings`]; nothing else in the workspace reads ambient
//! environment state, so tests construct a settings value pointing at a
//! temporary directory and never touch the real home directory.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{load_settings, load_settings_from_path, settings_path};
pub use types::{LoopwatchSettings, RotationSettings, StorageSettings};
