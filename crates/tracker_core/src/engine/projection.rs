//! Completion projection for a queried day.
//!
//! # Invariants
//! - Counts are computed against the full record index, never a filtered
//!   subset, so statistics do not depend on what is visible.
//! - Every projected tracker has an explicit entry in both maps.

use crate::engine::RecordIndex;
use crate::model::tracker::{Tracker, TrackerId};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Per-tracker completion state for one day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub completed_on: HashMap<TrackerId, bool>,
    pub total_completions: HashMap<TrackerId, u32>,
}

/// Projects completion state of `trackers` on `date`.
pub fn project(trackers: &[Tracker], records: &RecordIndex, date: NaiveDate) -> Projection {
    let mut projection = Projection::default();
    for tracker in trackers {
        projection
            .completed_on
            .insert(tracker.id, records.is_completed_on(tracker.id, date));
        projection
            .total_completions
            .insert(tracker.id, records.completion_days(tracker.id));
    }
    projection
}
