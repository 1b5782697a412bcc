//! Filter stage: final narrowing of a categorized snapshot.
//!
//! # Invariants
//! - Stateless and idempotent for a fixed input.
//! - `Uncompleted` keeps only trackers with an explicit `false` entry.
//! - `Today` keeps whole groups holding at least one unpinned tracker; it
//!   does not re-check schedules, so the pinned group is always dropped.

use crate::model::category::TrackerCategory;
use crate::model::filter::TrackerFilter;
use crate::model::tracker::TrackerId;
use std::collections::HashMap;

/// Applies `filter` to ordered categories, preserving order.
pub fn apply_filter(
    categories: Vec<TrackerCategory>,
    filter: TrackerFilter,
    completed_on: &HashMap<TrackerId, bool>,
) -> Vec<TrackerCategory> {
    match filter {
        TrackerFilter::All => categories,
        TrackerFilter::Today => categories
            .into_iter()
            .filter(|category| category.trackers.iter().any(|tracker| !tracker.is_pinned))
            .collect(),
        TrackerFilter::Completed => {
            retain_trackers(categories, |id| completed_on.get(&id) == Some(&true))
        }
        TrackerFilter::Uncompleted => {
            retain_trackers(categories, |id| completed_on.get(&id) == Some(&false))
        }
    }
}

fn retain_trackers<P>(categories: Vec<TrackerCategory>, keep: P) -> Vec<TrackerCategory>
where
    P: Fn(TrackerId) -> bool,
{
    categories
        .into_iter()
        .filter_map(|mut category| {
            category.trackers.retain(|tracker| keep(tracker.id));
            (!category.trackers.is_empty()).then_some(category)
        })
        .collect()
}
