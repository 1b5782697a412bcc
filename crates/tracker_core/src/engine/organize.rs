//! Categorization and ordering of active trackers.
//!
//! # Responsibility
//! - Split pinned trackers into the synthetic leading group.
//! - Group the rest by category title and order groups and members.
//!
//! # Invariants
//! - Output is a partition: each input tracker lands in exactly one group.
//! - The pinned group, when non-empty, is always first, even if a real
//!   category carries the same title.
//! - Empty groups are never emitted.

use crate::engine::collate::TextCollator;
use crate::model::category::{GroupLabels, TrackerCategory};
use crate::model::tracker::Tracker;
use std::collections::HashMap;

/// Groups `trackers` for display.
///
/// `category_of` returns the category title of a tracker, or `None` when the
/// tracker is not filed anywhere (it then goes under `labels.uncategorized`).
pub fn organize<F>(
    trackers: Vec<Tracker>,
    category_of: F,
    labels: &GroupLabels,
    collator: &TextCollator,
) -> Vec<TrackerCategory>
where
    F: Fn(&Tracker) -> Option<String>,
{
    let (mut pinned, unpinned): (Vec<Tracker>, Vec<Tracker>) =
        trackers.into_iter().partition(|tracker| tracker.is_pinned);

    let mut categories = group_by_title(unpinned, category_of, labels, collator);

    if !pinned.is_empty() {
        sort_trackers(&mut pinned, collator);
        categories.insert(0, TrackerCategory::new(labels.pinned.clone(), pinned));
    }

    categories
}

/// Groups trackers by category title without pinned handling, sorted.
pub(crate) fn group_by_title<F>(
    trackers: Vec<Tracker>,
    category_of: F,
    labels: &GroupLabels,
    collator: &TextCollator,
) -> Vec<TrackerCategory>
where
    F: Fn(&Tracker) -> Option<String>,
{
    let mut groups: HashMap<String, Vec<Tracker>> = HashMap::new();
    for tracker in trackers {
        let title = category_of(&tracker).unwrap_or_else(|| labels.uncategorized.clone());
        groups.entry(title).or_default().push(tracker);
    }

    let mut categories: Vec<TrackerCategory> = groups
        .into_iter()
        .filter(|(_, trackers)| !trackers.is_empty())
        .map(|(title, mut trackers)| {
            sort_trackers(&mut trackers, collator);
            TrackerCategory::new(title, trackers)
        })
        .collect();
    categories.sort_by(|a, b| collator.compare(&a.title, &b.title));
    categories
}

/// Sorts by collated name, ties broken by id.
pub fn sort_trackers(trackers: &mut [Tracker], collator: &TextCollator) {
    trackers.sort_by(|a, b| {
        collator
            .compare(&a.name, &b.name)
            .then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::organize;
    use crate::engine::collate::TextCollator;
    use crate::model::category::{GroupLabels, TrackerCategory};
    use crate::model::tracker::{Schedule, Tracker, TrackerId, TrackerKind, Weekday};
    use std::collections::HashMap;

    fn tracker(name: &str, pinned: bool) -> Tracker {
        let schedule: Schedule = [Weekday::Mon].into_iter().collect();
        let mut tracker = Tracker::new(TrackerKind::Habit, name, "#111111", "💧", schedule);
        tracker.is_pinned = pinned;
        tracker
    }

    fn lookup(map: &HashMap<TrackerId, String>) -> impl Fn(&Tracker) -> Option<String> + '_ {
        move |tracker| map.get(&tracker.id).cloned()
    }

    fn titles(categories: &[TrackerCategory]) -> Vec<&str> {
        categories.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn pinned_group_comes_first_and_groups_are_alphabetical() {
        let water = tracker("Water", false);
        let run = tracker("Run", false);
        let report = tracker("Report", true);
        let mail = tracker("Mail", false);
        let mut categories = HashMap::new();
        categories.insert(water.id, "Health".to_string());
        categories.insert(run.id, "Health".to_string());
        categories.insert(report.id, "Work".to_string());
        categories.insert(mail.id, "Work".to_string());

        let result = organize(
            vec![water, run, report, mail],
            lookup(&categories),
            &GroupLabels::default(),
            &TextCollator::default(),
        );

        assert_eq!(titles(&result), vec!["Pinned", "Health", "Work"]);
        let health: Vec<_> = result[1].trackers.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(health, vec!["Run", "Water"]);
        assert_eq!(result[0].trackers[0].name, "Report");
        assert_eq!(result[2].trackers.len(), 1);
    }

    #[test]
    fn uncategorized_trackers_use_fallback_label() {
        let stray = tracker("Stray", false);
        let result = organize(
            vec![stray],
            |_| None,
            &GroupLabels::default(),
            &TextCollator::default(),
        );
        assert_eq!(titles(&result), vec!["Uncategorized"]);
    }

    #[test]
    fn pinned_group_wins_first_slot_on_title_collision() {
        let pinned = tracker("Zed", true);
        let regular = tracker("Alpha", false);
        let mut categories = HashMap::new();
        categories.insert(regular.id, "Pinned".to_string());
        categories.insert(pinned.id, "Aardvark".to_string());

        let result = organize(
            vec![regular.clone(), pinned.clone()],
            lookup(&categories),
            &GroupLabels::default(),
            &TextCollator::default(),
        );

        assert_eq!(titles(&result), vec!["Pinned", "Pinned"]);
        assert_eq!(result[0].trackers[0].id, pinned.id);
        assert_eq!(result[1].trackers[0].id, regular.id);
    }

    #[test]
    fn every_tracker_lands_in_exactly_one_group() {
        let trackers: Vec<Tracker> = (0..12)
            .map(|i| tracker(&format!("T{i}"), i % 3 == 0))
            .collect();
        let mut categories = HashMap::new();
        for (i, tracker) in trackers.iter().enumerate() {
            if i % 4 != 0 {
                categories.insert(tracker.id, format!("C{}", i % 2));
            }
        }
        let mut expected: Vec<TrackerId> = trackers.iter().map(|t| t.id).collect();

        let result = organize(
            trackers,
            lookup(&categories),
            &GroupLabels::default(),
            &TextCollator::default(),
        );

        let mut seen: Vec<TrackerId> = result
            .iter()
            .flat_map(|c| c.trackers.iter().map(|t| t.id))
            .collect();
        expected.sort();
        seen.sort();
        assert_eq!(seen, expected);
        assert!(result.iter().all(|c| !c.trackers.is_empty()));
    }

    #[test]
    fn equal_names_are_ordered_by_id() {
        let first = tracker("Same", false);
        let second = tracker("Same", false);
        let mut ids = vec![first.id, second.id];
        ids.sort();

        let result = organize(
            vec![first, second],
            |_| None,
            &GroupLabels::default(),
            &TextCollator::default(),
        );
        let got: Vec<TrackerId> = result[0].trackers.iter().map(|t| t.id).collect();
        assert_eq!(got, ids);
    }

    #[test]
    fn russian_names_and_titles_follow_collation_order() {
        let names = ["Яблоко", "Ёлка", "Бег", "Еда"];
        let trackers: Vec<Tracker> = names.iter().map(|name| tracker(name, false)).collect();
        let mut categories = HashMap::new();
        for (tracker, title) in trackers.iter().zip(["Ёмкость", "Ёмкость", "Яма", "Дом"]) {
            categories.insert(tracker.id, title.to_string());
        }

        let result = organize(
            trackers,
            lookup(&categories),
            &GroupLabels::default(),
            &TextCollator::for_locale("ru").unwrap(),
        );

        assert_eq!(titles(&result), vec!["Дом", "Ёмкость", "Яма"]);
        let yo: Vec<_> = result[1].trackers.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(yo, vec!["Ёлка", "Яблоко"]);
    }
}
