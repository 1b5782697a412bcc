//! Category view models produced by engine queries.
//!
//! # Responsibility
//! - Hold ordered groups of trackers for presentation.
//! - Carry the per-query projection alongside the groups.
//!
//! # Invariants
//! - Categories are recomputed on every query and merged by `title`.
//! - A tracker appears in at most one group of a snapshot.

use crate::model::tracker::{Tracker, TrackerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named, ordered bucket of trackers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerCategory {
    pub title: String,
    pub trackers: Vec<Tracker>,
}

impl TrackerCategory {
    pub fn new(title: impl Into<String>, trackers: Vec<Tracker>) -> Self {
        Self {
            title: title.into(),
            trackers,
        }
    }
}

/// Result of one engine query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerSnapshot {
    /// Ordered groups; the pinned group, when present, is first.
    pub categories: Vec<TrackerCategory>,
    /// Whether each tracker is completed on the queried day.
    ///
    /// Empty for search results.
    pub completed_on: HashMap<TrackerId, bool>,
    /// Lifetime completion days per tracker.
    ///
    /// Empty for search results.
    pub total_completions: HashMap<TrackerId, u32>,
}

impl TrackerSnapshot {
    /// Returns whether the snapshot has nothing to display.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Iterates all trackers in display order.
    pub fn trackers(&self) -> impl Iterator<Item = &Tracker> {
        self.categories
            .iter()
            .flat_map(|category| category.trackers.iter())
    }

    pub fn is_completed(&self, id: TrackerId) -> bool {
        self.completed_on.get(&id).copied().unwrap_or(false)
    }

    pub fn completion_count(&self, id: TrackerId) -> u32 {
        self.total_completions.get(&id).copied().unwrap_or(0)
    }
}

/// Reserved and fallback group titles used by grouping stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupLabels {
    /// Title of the synthetic leading group of pinned trackers.
    pub pinned: String,
    /// Title used for trackers without a category.
    pub uncategorized: String,
}

impl Default for GroupLabels {
    fn default() -> Self {
        Self {
            pinned: "Pinned".to_string(),
            uncategorized: "Uncategorized".to_string(),
        }
    }
}
