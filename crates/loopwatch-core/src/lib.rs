//! # loopwatch-core
//!
//! Foundation types for loopwatch.
//!
//! This crate provides the shared vocabulary the other loopwatch crates
//! depend on:
//!
//! - **Branded IDs**: [`LoopId`](ids::LoopId) and [`SessionId`](ids::SessionId)
//!   as newtypes for type safety
//! - **Path helpers**: home-relative default locations and the lexical
//!   containment check used before any marker or artifact path is touched

#![deny(unsafe_code)]

pub mod ids;
pub mod paths;

pub use ids::{LoopId, SessionId};
