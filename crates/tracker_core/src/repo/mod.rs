//! Repository layer: persistence collaborators of the tracker engine.
//!
//! # Responsibility
//! - Define store contracts the engine and services read from.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Store APIs return semantic not-found errors in addition to DB errors.
//! - Read failures surface as `Err`, never as silently empty collections.

pub mod record_repo;
pub mod tracker_repo;
