//! User-selected narrowing filter for date queries.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Final narrowing transform applied to a categorized snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerFilter {
    /// Everything active on the day.
    #[default]
    All,
    /// Groups that hold at least one unpinned tracker.
    Today,
    /// Trackers completed on the day.
    Completed,
    /// Trackers not completed on the day.
    Uncompleted,
}

impl TrackerFilter {
    pub const ALL: [TrackerFilter; 4] = [
        TrackerFilter::All,
        TrackerFilter::Today,
        TrackerFilter::Completed,
        TrackerFilter::Uncompleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Completed => "completed",
            Self::Uncompleted => "uncompleted",
        }
    }

    /// Parses a filter tag, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "today" => Some(Self::Today),
            "completed" => Some(Self::Completed),
            "uncompleted" => Some(Self::Uncompleted),
            _ => None,
        }
    }
}

impl Display for TrackerFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::TrackerFilter;

    #[test]
    fn parse_accepts_every_tag() {
        for filter in TrackerFilter::ALL {
            assert_eq!(TrackerFilter::parse(filter.as_str()), Some(filter));
        }
        assert_eq!(
            TrackerFilter::parse(" Completed "),
            Some(TrackerFilter::Completed)
        );
        assert_eq!(TrackerFilter::parse("done"), None);
    }
}
