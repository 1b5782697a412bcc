//! Completion record model.
//!
//! # Invariants
//! - `date` is a calendar day; there is no time-of-day component.
//! - Completion for a day is presence of at least one record for the pair.

use crate::model::tracker::TrackerId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Immutable fact: tracker `tracker_id` was completed on `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub tracker_id: TrackerId,
    pub date: NaiveDate,
}

impl CompletionRecord {
    pub fn new(tracker_id: TrackerId, date: NaiveDate) -> Self {
        Self { tracker_id, date }
    }
}
