//! Core domain logic for the habit tracker.
//! This crate owns tracker visibility, completion and grouping rules.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{load_config, ConfigError, TrackerConfig};
pub use engine::collate::{CollationError, TextCollator};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{GroupLabels, TrackerCategory, TrackerSnapshot};
pub use model::filter::TrackerFilter;
pub use model::record::CompletionRecord;
pub use model::tracker::{
    NewTracker, Schedule, Tracker, TrackerId, TrackerKind, TrackerUpdate, Weekday,
};
pub use repo::record_repo::{RecordStore, SqliteRecordStore};
pub use repo::tracker_repo::{RepoError, RepoResult, SqliteTrackerStore, TrackerStore};
pub use service::async_service::AsyncTrackerService;
pub use service::tracker_service::{ServiceError, ServiceResult, TrackerQuery, TrackerService};
