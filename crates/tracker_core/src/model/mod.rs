//! Tracker domain model.
//!
//! # Responsibility
//! - Define tracker, category, completion record and filter value types.
//! - Keep view-model shapes (`TrackerCategory`, `TrackerSnapshot`) separate
//!   from persisted identity.
//!
//! # Invariants
//! - Every tracker is identified by a stable `TrackerId`.
//! - Completion records carry day granularity only.

pub mod category;
pub mod filter;
pub mod record;
pub mod tracker;
