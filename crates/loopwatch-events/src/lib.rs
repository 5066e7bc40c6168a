//! # loopwatch-events
//!
//! The loop lifecycle core: an append-only JSONL event log, the pure
//! reconciliation pass that turns raw events plus a liveness signal into
//! ordered session records, the crash-safe rotation pass that keeps the log
//! bounded, and the marker-deleting canceller.
//!
//! Data flows one direction for reads:
//!
//! ```text
//! LogStore + LivenessOracle → reconcile() → Vec<SessionRecord>
//! ```
//!
//! Rotation and cancellation are the only writers. Rotation is the only
//! component allowed to shrink the log, and it follows a strict
//! backup → filter → validate → commit-or-restore protocol; everything else
//! only appends.

#![deny(unsafe_code)]

pub mod cancel;
pub mod errors;
pub mod liveness;
pub mod log;
pub mod promise;
pub mod reconcile;
pub mod rotate;
pub mod types;

pub use cancel::{CancelOutcome, cancel_loop};
pub use errors::{EventLogError, Result};
pub use liveness::{FsLiveness, LivenessOracle, StaticLiveness};
pub use log::{FileLogStore, LogStore, MemoryLogStore};
pub use reconcile::{load_sessions, reconcile};
pub use rotate::{RotationOutcome, rotate};
pub use types::record::{CompletionEvent, LoopEvent, LoopOutcome, StartEvent};
pub use types::session::{SessionQuery, SessionRecord, SessionStatus};
