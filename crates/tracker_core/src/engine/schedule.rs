//! Schedule evaluation: is a tracker relevant on a given day.
//!
//! # Invariants
//! - Recurring habits are decided by weekday membership only.
//! - One-off events stay pending until completed, then live only on the day
//!   of their most recent completion.

use crate::engine::RecordIndex;
use crate::model::tracker::{Tracker, Weekday};
use chrono::NaiveDate;

/// Returns whether `tracker` should appear on `date`.
pub fn is_active(tracker: &Tracker, date: NaiveDate, records: &RecordIndex) -> bool {
    if tracker.is_recurring() {
        return tracker.schedule.contains(&Weekday::of(date));
    }

    match records.latest_day(tracker.id) {
        Some(latest) => latest == date,
        None => true,
    }
}

/// Keeps trackers active on `date`, preserving input order.
pub fn active_trackers(
    trackers: Vec<Tracker>,
    date: NaiveDate,
    records: &RecordIndex,
) -> Vec<Tracker> {
    trackers
        .into_iter()
        .filter(|tracker| is_active(tracker, date, records))
        .collect()
}
