//! Tracker use-case service.
//!
//! # Responsibility
//! - Run the visibility pipeline: schedule → projection → grouping → filter.
//! - Route search queries and tracker/record mutations to the stores.
//! - Emit metadata-only usage events for every use-case.
//!
//! # Invariants
//! - Every query reads trackers and records fresh; nothing is cached.
//! - Completion statistics are computed on the full record set.
//! - Service APIs never bypass store contracts.

use crate::engine::collate::{CollationError, TextCollator};
use crate::engine::filter::apply_filter;
use crate::engine::organize::organize;
use crate::engine::projection::project;
use crate::engine::schedule::active_trackers;
use crate::engine::search::search;
use crate::engine::RecordIndex;
use crate::model::category::{GroupLabels, TrackerSnapshot};
use crate::model::filter::TrackerFilter;
use crate::model::tracker::{NewTracker, Tracker, TrackerId, TrackerUpdate};
use crate::repo::record_repo::RecordStore;
use crate::repo::tracker_repo::{RepoError, TrackerStore};
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for tracker use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Store-level failure, including not-found.
    Repo(RepoError),
    /// Search was called with an empty term.
    EmptySearchTerm,
    /// Completion was requested for a day after today.
    FutureDate { date: NaiveDate, today: NaiveDate },
    /// The configured ordering locale has no usable collation.
    Collation(CollationError),
    /// Background worker failed before producing a result.
    Worker(String),
}

impl ServiceError {
    /// Returns whether the referenced tracker or category is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repo(err) if err.is_not_found())
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::EmptySearchTerm => write!(f, "search term must not be empty"),
            Self::FutureDate { date, today } => write!(
                f,
                "cannot complete a tracker on {date}: it is after today ({today})"
            ),
            Self::Collation(err) => write!(f, "{err}"),
            Self::Worker(message) => write!(f, "tracker worker failed: {message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Collation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<CollationError> for ServiceError {
    fn from(value: CollationError) -> Self {
        Self::Collation(value)
    }
}

/// One presentation request: a day, a filter, and an optional search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerQuery {
    pub date: NaiveDate,
    pub filter: TrackerFilter,
    /// Non-empty term switches to name search; empty or `None` keeps the
    /// date query.
    pub search: Option<String>,
}

impl TrackerQuery {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            filter: TrackerFilter::All,
            search: None,
        }
    }
}

/// Tracker service over injected stores.
pub struct TrackerService<T: TrackerStore, R: RecordStore> {
    trackers: T,
    records: R,
    labels: GroupLabels,
    collator: TextCollator,
}

impl<T: TrackerStore, R: RecordStore> TrackerService<T, R> {
    /// Creates a service with default group labels.
    pub fn new(trackers: T, records: R) -> Self {
        Self::with_labels(trackers, records, GroupLabels::default())
    }

    pub fn with_labels(trackers: T, records: R, labels: GroupLabels) -> Self {
        Self {
            trackers,
            records,
            labels,
            collator: TextCollator::default(),
        }
    }

    /// Replaces the root-locale ordering of names and titles.
    pub fn with_collator(mut self, collator: TextCollator) -> Self {
        self.collator = collator;
        self
    }

    pub fn labels(&self) -> &GroupLabels {
        &self.labels
    }

    /// Builds the grouped, projected and filtered snapshot for one day.
    pub fn fetch_trackers(
        &self,
        date: NaiveDate,
        filter: TrackerFilter,
    ) -> ServiceResult<TrackerSnapshot> {
        let started_at = Instant::now();
        let trackers = self.trackers.fetch_all_trackers()?;
        let titles = self.trackers.category_titles()?;
        let records = self.records.fetch_all_records()?;

        let index = RecordIndex::from_records(&records);
        let projection = project(&trackers, &index, date);
        let active = active_trackers(trackers, date, &index);
        let categories = organize(
            active,
            |tracker| titles.get(&tracker.id).cloned(),
            &self.labels,
            &self.collator,
        );
        let categories = apply_filter(categories, filter, &projection.completed_on);

        let snapshot = TrackerSnapshot {
            categories,
            completed_on: projection.completed_on,
            total_completions: projection.total_completions,
        };
        info!(
            "event=trackers_fetch module=service status=ok filter={} groups={} visible={} duration_ms={}",
            filter,
            snapshot.categories.len(),
            snapshot.trackers().count(),
            started_at.elapsed().as_millis()
        );
        Ok(snapshot)
    }

    /// Searches tracker names across every tracker.
    ///
    /// The returned snapshot carries no completion state.
    pub fn search(&self, term: &str) -> ServiceResult<TrackerSnapshot> {
        if term.is_empty() {
            return Err(ServiceError::EmptySearchTerm);
        }

        let trackers = self.trackers.fetch_all_trackers()?;
        let titles = self.trackers.category_titles()?;
        let categories = search(
            trackers,
            term,
            |tracker| titles.get(&tracker.id).cloned(),
            &self.labels,
            &self.collator,
        );
        info!(
            "event=trackers_search module=service status=ok term_chars={} groups={}",
            term.chars().count(),
            categories.len()
        );
        Ok(TrackerSnapshot {
            categories,
            ..TrackerSnapshot::default()
        })
    }

    /// Runs a search when the term is non-empty, otherwise the date query.
    pub fn query(&self, query: &TrackerQuery) -> ServiceResult<TrackerSnapshot> {
        match query.search.as_deref() {
            Some(term) if !term.is_empty() => self.search(term),
            _ => self.fetch_trackers(query.date, query.filter),
        }
    }

    /// Marks a tracker completed on `date`, relative to the local current day.
    pub fn complete_tracker(&self, id: TrackerId, date: NaiveDate) -> ServiceResult<bool> {
        self.complete_tracker_as_of(id, date, Local::now().date_naive())
    }

    /// Marks a tracker completed on `date`; days after `today` are rejected.
    ///
    /// Returns `false` when the day was already recorded.
    pub fn complete_tracker_as_of(
        &self,
        id: TrackerId,
        date: NaiveDate,
        today: NaiveDate,
    ) -> ServiceResult<bool> {
        if date > today {
            warn!(
                "event=tracker_complete module=service status=rejected reason=future_date tracker_id={}",
                id
            );
            return Err(ServiceError::FutureDate { date, today });
        }

        let inserted = self
            .records
            .add_record(id, date)
            .inspect_err(|err| log_store_error("tracker_complete", id, err))?;
        info!(
            "event=tracker_complete module=service status=ok tracker_id={} inserted={}",
            id, inserted
        );
        Ok(inserted)
    }

    pub fn add_tracker(&self, request: &NewTracker) -> ServiceResult<Tracker> {
        let tracker = self.trackers.add_tracker(request)?;
        info!(
            "event=tracker_add module=service status=ok tracker_id={} kind={} schedule_days={}",
            tracker.id,
            tracker.kind.as_str(),
            tracker.schedule.len()
        );
        Ok(tracker)
    }

    pub fn update_tracker(&self, id: TrackerId, update: &TrackerUpdate) -> ServiceResult<()> {
        self.trackers
            .update_tracker(id, update)
            .inspect_err(|err| log_store_error("tracker_update", id, err))?;
        info!("event=tracker_update module=service status=ok tracker_id={id}");
        Ok(())
    }

    /// Deletes a tracker together with its completion history.
    pub fn delete_tracker(&self, id: TrackerId) -> ServiceResult<()> {
        self.trackers
            .delete_tracker(id)
            .inspect_err(|err| log_store_error("tracker_delete", id, err))?;
        info!("event=tracker_delete module=service status=ok tracker_id={id}");
        Ok(())
    }

    /// Flips the pin flag and returns the new state.
    pub fn toggle_pin(&self, id: TrackerId) -> ServiceResult<bool> {
        let pinned = self
            .trackers
            .toggle_pin(id)
            .inspect_err(|err| log_store_error("tracker_pin", id, err))?;
        info!("event=tracker_pin module=service status=ok tracker_id={id} pinned={pinned}");
        Ok(pinned)
    }

    pub fn add_category(&self, title: &str) -> ServiceResult<bool> {
        let created = self.trackers.add_category(title)?;
        info!("event=category_add module=service status=ok created={created}");
        Ok(created)
    }

    /// Every tracker ordered by name, regardless of schedule or pin state.
    pub fn list_trackers(&self) -> ServiceResult<Vec<Tracker>> {
        Ok(self.trackers.fetch_all_trackers()?)
    }

    pub fn list_categories(&self) -> ServiceResult<Vec<String>> {
        Ok(self.trackers.list_categories()?)
    }

    /// Lifetime number of completed days of one tracker.
    pub fn completion_count(&self, id: TrackerId) -> ServiceResult<u64> {
        Ok(self.records.count_for_tracker(id)?)
    }

    /// Number of completions across all trackers (statistics screen).
    pub fn total_completed(&self) -> ServiceResult<u64> {
        Ok(self.records.count_all()?)
    }
}

fn log_store_error(event: &str, id: TrackerId, err: &RepoError) {
    if err.is_not_found() {
        warn!("event={event} module=service status=not_found tracker_id={id}");
    } else {
        warn!("event={event} module=service status=error tracker_id={id} error={err}");
    }
}
