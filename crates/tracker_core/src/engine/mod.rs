//! Tracker visibility & completion engine.
//!
//! # Responsibility
//! - Decide which trackers are active on a day and which are completed.
//! - Arrange trackers into ordered, labeled groups and narrow them by filter.
//!
//! # Invariants
//! - Every stage is pure: no I/O, no shared state between calls.
//! - Output ordering is deterministic for fixed inputs.

pub mod collate;
pub mod filter;
pub mod organize;
pub mod projection;
pub mod schedule;
pub mod search;

use crate::model::record::CompletionRecord;
use crate::model::tracker::TrackerId;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Completion days per tracker, built once per query from the full record set.
///
/// Duplicate (tracker, day) records collapse into one day.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    days: HashMap<TrackerId, BTreeSet<NaiveDate>>,
}

impl RecordIndex {
    pub fn from_records(records: &[CompletionRecord]) -> Self {
        let mut days: HashMap<TrackerId, BTreeSet<NaiveDate>> = HashMap::new();
        for record in records {
            days.entry(record.tracker_id)
                .or_default()
                .insert(record.date);
        }
        Self { days }
    }

    /// Distinct completion days of one tracker, oldest first.
    pub fn days_for(&self, id: TrackerId) -> Option<&BTreeSet<NaiveDate>> {
        self.days.get(&id)
    }

    pub fn is_completed_on(&self, id: TrackerId, date: NaiveDate) -> bool {
        self.days_for(id).is_some_and(|days| days.contains(&date))
    }

    pub fn latest_day(&self, id: TrackerId) -> Option<NaiveDate> {
        self.days_for(id).and_then(|days| days.last().copied())
    }

    pub fn completion_days(&self, id: TrackerId) -> u32 {
        self.days_for(id)
            .map_or(0, |days| u32::try_from(days.len()).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::RecordIndex;
    use crate::model::record::CompletionRecord;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn duplicate_records_collapse_into_one_day() {
        let id = Uuid::new_v4();
        let index = RecordIndex::from_records(&[
            CompletionRecord::new(id, day(3)),
            CompletionRecord::new(id, day(3)),
            CompletionRecord::new(id, day(1)),
        ]);
        assert_eq!(index.completion_days(id), 2);
        assert_eq!(index.latest_day(id), Some(day(3)));
        assert!(index.is_completed_on(id, day(1)));
        assert!(!index.is_completed_on(id, day(2)));
    }

    #[test]
    fn unknown_tracker_has_no_days() {
        let index = RecordIndex::default();
        let id = Uuid::new_v4();
        assert_eq!(index.completion_days(id), 0);
        assert_eq!(index.latest_day(id), None);
    }
}
