//! Asynchronous facade over [`TrackerService`].
//!
//! # Responsibility
//! - Run store-backed use-cases off the caller's thread.
//! - Hand each result back exactly once through the returned future.
//!
//! # Invariants
//! - Mutations are serialized by the connection mutex.
//! - A future resolves only after the underlying SQLite statement committed.
//! - No cancellation: callers drop superseded results themselves.

use crate::config::TrackerConfig;
use crate::db::{open_db, open_db_in_memory};
use crate::engine::collate::{TextCollator, ROOT_LOCALE};
use crate::model::category::{GroupLabels, TrackerSnapshot};
use crate::model::filter::TrackerFilter;
use crate::model::tracker::{NewTracker, Tracker, TrackerId, TrackerUpdate};
use crate::repo::record_repo::SqliteRecordStore;
use crate::repo::tracker_repo::{RepoError, SqliteTrackerStore};
use crate::service::tracker_service::{ServiceError, ServiceResult, TrackerQuery, TrackerService};
use chrono::NaiveDate;
use log::error;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

type SqliteTrackerService<'conn> =
    TrackerService<SqliteTrackerStore<'conn>, SqliteRecordStore<'conn>>;

/// Cloneable async handle; clones share one connection.
#[derive(Clone)]
pub struct AsyncTrackerService {
    conn: Arc<Mutex<Connection>>,
    labels: GroupLabels,
    locale: String,
}

impl AsyncTrackerService {
    /// Wraps a migrated connection (see `open_db`).
    pub fn new(conn: Connection) -> Self {
        Self::with_labels(conn, GroupLabels::default())
    }

    pub fn with_labels(conn: Connection, labels: GroupLabels) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            labels,
            locale: ROOT_LOCALE.to_string(),
        }
    }

    /// Orders names and titles for `tag` (for example `ru`).
    pub fn with_locale(mut self, tag: &str) -> ServiceResult<Self> {
        self.locale = TextCollator::for_locale(tag)?.locale().to_string();
        Ok(self)
    }

    /// Opens the configured database (in-memory when no path is set).
    pub fn from_config(config: &TrackerConfig) -> ServiceResult<Self> {
        let conn = match config.storage.db_path.as_ref() {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
        .map_err(RepoError::from)?;
        Self::with_labels(conn, config.labels.clone())
            .with_locale(&config.sorting.locale)
    }

    pub async fn fetch_trackers(
        &self,
        date: NaiveDate,
        filter: TrackerFilter,
    ) -> ServiceResult<TrackerSnapshot> {
        self.run("trackers_fetch", move |service| {
            service.fetch_trackers(date, filter)
        })
        .await
    }

    pub async fn search(&self, term: impl Into<String>) -> ServiceResult<TrackerSnapshot> {
        let term = term.into();
        self.run("trackers_search", move |service| service.search(&term))
            .await
    }

    pub async fn query(&self, query: TrackerQuery) -> ServiceResult<TrackerSnapshot> {
        self.run("trackers_query", move |service| service.query(&query))
            .await
    }

    pub async fn complete_tracker(&self, id: TrackerId, date: NaiveDate) -> ServiceResult<bool> {
        self.run("tracker_complete", move |service| {
            service.complete_tracker(id, date)
        })
        .await
    }

    pub async fn add_tracker(&self, request: NewTracker) -> ServiceResult<Tracker> {
        self.run("tracker_add", move |service| service.add_tracker(&request))
            .await
    }

    pub async fn update_tracker(&self, id: TrackerId, update: TrackerUpdate) -> ServiceResult<()> {
        self.run("tracker_update", move |service| {
            service.update_tracker(id, &update)
        })
        .await
    }

    pub async fn delete_tracker(&self, id: TrackerId) -> ServiceResult<()> {
        self.run("tracker_delete", move |service| service.delete_tracker(id))
            .await
    }

    pub async fn toggle_pin(&self, id: TrackerId) -> ServiceResult<bool> {
        self.run("tracker_pin", move |service| service.toggle_pin(id))
            .await
    }

    pub async fn add_category(&self, title: impl Into<String>) -> ServiceResult<bool> {
        let title = title.into();
        self.run("category_add", move |service| service.add_category(&title))
            .await
    }

    pub async fn list_trackers(&self) -> ServiceResult<Vec<Tracker>> {
        self.run("tracker_list", |service| service.list_trackers())
            .await
    }

    pub async fn list_categories(&self) -> ServiceResult<Vec<String>> {
        self.run("category_list", |service| service.list_categories())
            .await
    }

    pub async fn completion_count(&self, id: TrackerId) -> ServiceResult<u64> {
        self.run("tracker_stats", move |service| service.completion_count(id))
            .await
    }

    pub async fn total_completed(&self) -> ServiceResult<u64> {
        self.run("stats_total", |service| service.total_completed())
            .await
    }

    async fn run<T, F>(&self, event: &'static str, op: F) -> ServiceResult<T>
    where
        T: Send + 'static,
        F: for<'conn> FnOnce(&SqliteTrackerService<'conn>) -> ServiceResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let labels = self.labels.clone();
        let locale = self.locale.clone();

        let joined = tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| poisoned_connection())?;
            let service = TrackerService::with_labels(
                SqliteTrackerStore::try_new(&guard)?,
                SqliteRecordStore::try_new(&guard)?,
                labels,
            )
            .with_collator(TextCollator::for_locale(&locale)?);
            op(&service)
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(err) => {
                error!(
                    "event={event} module=async_service status=error error_code=join_failed error={err}"
                );
                Err(ServiceError::Worker(format!("{event}: {err}")))
            }
        }
    }
}

fn poisoned_connection() -> ServiceError {
    ServiceError::Worker("tracker connection mutex poisoned".to_string())
}
