//! Tracker domain model.
//!
//! # Responsibility
//! - Define the canonical tracker definition shared by habits and events.
//! - Provide the weekday schedule type used by schedule evaluation.
//!
//! # Invariants
//! - `id` is stable and never reused for another tracker.
//! - An empty `schedule` marks a one-off event; `kind` never changes that.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every tracker.
pub type TrackerId = Uuid;

/// Day of week used in tracker schedules.
///
/// Own enum instead of `chrono::Weekday` so schedules can live in ordered
/// sets and serialize as short lowercase tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// All weekdays, Monday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Returns the weekday of a calendar day.
    pub fn of(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }

    /// Storage/CLI tag (`mon`, `tue`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mon => "mon",
            Self::Tue => "tue",
            Self::Wed => "wed",
            Self::Thu => "thu",
            Self::Fri => "fri",
            Self::Sat => "sat",
            Self::Sun => "sun",
        }
    }

    /// Parses a tag produced by [`Weekday::as_str`], case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mon" => Some(Self::Mon),
            "tue" => Some(Self::Tue),
            "wed" => Some(Self::Wed),
            "thu" => Some(Self::Thu),
            "fri" => Some(Self::Fri),
            "sat" => Some(Self::Sat),
            "sun" => Some(Self::Sun),
            _ => None,
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Mon => Self::Mon,
            chrono::Weekday::Tue => Self::Tue,
            chrono::Weekday::Wed => Self::Wed,
            chrono::Weekday::Thu => Self::Thu,
            chrono::Weekday::Fri => Self::Fri,
            chrono::Weekday::Sat => Self::Sat,
            chrono::Weekday::Sun => Self::Sun,
        }
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of weekdays a habit is due on. Empty for one-off events.
pub type Schedule = BTreeSet<Weekday>;

/// Tracker flavor chosen at creation time.
///
/// Only routes edit flows; visibility is decided by schedule emptiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerKind {
    /// Recurring habit with a weekday schedule.
    Habit,
    /// One-off irregular event.
    Event,
}

impl TrackerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Habit => "habit",
            Self::Event => "event",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "habit" => Some(Self::Habit),
            "event" => Some(Self::Event),
            _ => None,
        }
    }
}

/// Canonical tracker definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracker {
    /// Stable ID; identity is by `id` only.
    pub id: TrackerId,
    /// Display name.
    pub name: String,
    /// Opaque display color (for example `#FF8800`).
    pub color: String,
    /// Opaque display emoji.
    pub emoji: String,
    /// Due weekdays; empty for one-off events.
    pub schedule: Schedule,
    /// Pinned trackers are surfaced in the leading pinned group.
    pub is_pinned: bool,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: TrackerKind,
}

impl Tracker {
    /// Creates an unpinned tracker with a generated stable ID.
    pub fn new(
        kind: TrackerKind,
        name: impl Into<String>,
        color: impl Into<String>,
        emoji: impl Into<String>,
        schedule: Schedule,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            color: color.into(),
            emoji: emoji.into(),
            schedule,
            is_pinned: false,
            kind,
        }
    }

    /// Returns whether this tracker is a recurring habit by schedule.
    pub fn is_recurring(&self) -> bool {
        !self.schedule.is_empty()
    }
}

/// Create request for a new tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTracker {
    pub name: String,
    pub color: String,
    pub emoji: String,
    pub schedule: Schedule,
    pub kind: TrackerKind,
    /// Title of an existing category the tracker is filed under.
    pub category_title: String,
}

/// In-place edit of display attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerUpdate {
    pub name: String,
    pub color: String,
    pub emoji: String,
}

/// Encodes a schedule as a comma-separated tag list (`mon,wed`).
pub fn schedule_to_tags(schedule: &Schedule) -> String {
    schedule
        .iter()
        .map(|day| day.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Decodes a comma-separated tag list. Returns `None` on unknown tags.
pub fn schedule_from_tags(value: &str) -> Option<Schedule> {
    let mut schedule = Schedule::new();
    for tag in value.split(',').filter(|tag| !tag.trim().is_empty()) {
        schedule.insert(Weekday::parse(tag)?);
    }
    Some(schedule)
}

#[cfg(test)]
mod tests {
    use super::{schedule_from_tags, schedule_to_tags, Schedule, Weekday};
    use chrono::NaiveDate;

    #[test]
    fn weekday_of_known_dates() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        assert_eq!(Weekday::of(monday), Weekday::Mon);
        assert_eq!(Weekday::of(sunday), Weekday::Sun);
    }

    #[test]
    fn schedule_tags_are_ordered_monday_first() {
        let schedule: Schedule = [Weekday::Fri, Weekday::Mon, Weekday::Wed]
            .into_iter()
            .collect();
        assert_eq!(schedule_to_tags(&schedule), "mon,wed,fri");
        assert_eq!(schedule_from_tags("mon,wed,fri"), Some(schedule));
    }

    #[test]
    fn empty_tag_list_is_empty_schedule() {
        assert_eq!(schedule_from_tags(""), Some(Schedule::new()));
        assert_eq!(schedule_from_tags("mon,funday"), None);
    }
}
