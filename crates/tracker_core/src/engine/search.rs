//! Name search over all trackers.
//!
//! Ignores schedule, date and pin state. Results are grouped by category
//! title and ordered like date queries, without a pinned group.

use crate::engine::collate::TextCollator;
use crate::engine::organize::group_by_title;
use crate::model::category::{GroupLabels, TrackerCategory};
use crate::model::tracker::Tracker;

/// Returns trackers whose name contains `term`, case-insensitively.
///
/// `term` must be non-empty; callers route an empty term to the date query.
pub fn search<F>(
    trackers: Vec<Tracker>,
    term: &str,
    category_of: F,
    labels: &GroupLabels,
    collator: &TextCollator,
) -> Vec<TrackerCategory>
where
    F: Fn(&Tracker) -> Option<String>,
{
    let needle = term.to_lowercase();
    let matches: Vec<Tracker> = trackers
        .into_iter()
        .filter(|tracker| tracker.name.to_lowercase().contains(&needle))
        .collect();
    group_by_title(matches, category_of, labels, collator)
}

#[cfg(test)]
mod tests {
    use super::search;
    use crate::engine::collate::TextCollator;
    use crate::model::category::GroupLabels;
    use crate::model::tracker::{Schedule, Tracker, TrackerKind, Weekday};
    use std::collections::HashMap;

    fn tracker(name: &str, pinned: bool) -> Tracker {
        let schedule: Schedule = [Weekday::Sun].into_iter().collect();
        let mut tracker = Tracker::new(TrackerKind::Habit, name, "#333333", "🔎", schedule);
        tracker.is_pinned = pinned;
        tracker
    }

    #[test]
    fn matches_case_insensitive_substring_including_pinned() {
        let morning = tracker("Morning Run", true);
        let evening = tracker("evening run", false);
        let reading = tracker("Reading", false);
        let mut categories = HashMap::new();
        categories.insert(morning.id, "Sport".to_string());
        categories.insert(evening.id, "Sport".to_string());

        let result = search(
            vec![reading, morning, evening],
            "RUN",
            |t| categories.get(&t.id).cloned(),
            &GroupLabels::default(),
            &TextCollator::default(),
        );

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Sport");
        let names: Vec<_> = result[0].trackers.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["evening run", "Morning Run"]);
    }

    #[test]
    fn groups_are_sorted_and_fall_back_for_missing_category() {
        let a = tracker("Tea", false);
        let b = tracker("Team sync", false);
        let mut categories = HashMap::new();
        categories.insert(b.id, "Work".to_string());

        let result = search(
            vec![b, a],
            "tea",
            |t| categories.get(&t.id).cloned(),
            &GroupLabels::default(),
            &TextCollator::default(),
        );

        let titles: Vec<_> = result.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Uncategorized", "Work"]);
    }

    #[test]
    fn no_match_yields_no_groups() {
        let result = search(
            vec![tracker("Walk", false)],
            "swim",
            |_| None,
            &GroupLabels::default(),
            &TextCollator::default(),
        );
        assert!(result.is_empty());
    }
}
