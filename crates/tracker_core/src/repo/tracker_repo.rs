//! Tracker/category repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and pin toggling over `trackers` storage.
//! - Resolve the category title each tracker is filed under.
//!
//! # Invariants
//! - Mutations of a missing tracker return `RepoError::TrackerNotFound`.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Deleting a tracker cascades to its completion records.

use crate::db::{schema_status, DbError, SchemaStatus, SCHEMA_VERSION};
use crate::model::tracker::{
    schedule_from_tags, schedule_to_tags, NewTracker, Tracker, TrackerId, TrackerKind,
    TrackerUpdate,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TRACKER_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    color,
    emoji,
    schedule,
    kind,
    is_pinned
FROM trackers";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by tracker and record stores.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap failure.
    Db(DbError),
    /// Referenced tracker does not exist.
    TrackerNotFound(TrackerId),
    /// Referenced category title does not exist.
    CategoryNotFound(String),
    /// Persisted row cannot be decoded into a domain value.
    InvalidData(String),
    /// Connection was not opened through `open_db`/`open_db_in_memory`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl RepoError {
    /// Returns whether this is a not-found style failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TrackerNotFound(_) | Self::CategoryNotFound(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::TrackerNotFound(id) => write!(f, "tracker not found: {id}"),
            Self::CategoryNotFound(title) => write!(f, "category not found: `{title}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted tracker data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for tracker definitions and their categories.
pub trait TrackerStore {
    /// All trackers ordered by name.
    fn fetch_all_trackers(&self) -> RepoResult<Vec<Tracker>>;
    /// Category title of one tracker, `None` when unfiled or unknown.
    fn category_title(&self, id: TrackerId) -> RepoResult<Option<String>>;
    /// Category titles of every filed tracker in one read.
    fn category_titles(&self) -> RepoResult<HashMap<TrackerId, String>>;
    fn add_tracker(&self, request: &NewTracker) -> RepoResult<Tracker>;
    fn update_tracker(&self, id: TrackerId, update: &TrackerUpdate) -> RepoResult<()>;
    fn delete_tracker(&self, id: TrackerId) -> RepoResult<()>;
    /// Flips the pin flag and returns the new value.
    fn toggle_pin(&self, id: TrackerId) -> RepoResult<bool>;
    /// Creates a category; returns `false` when the title already exists.
    fn add_category(&self, title: &str) -> RepoResult<bool>;
    /// Category titles ordered case-insensitively.
    fn list_categories(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed tracker store.
pub struct SqliteTrackerStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTrackerStore<'conn> {
    /// Constructs a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TrackerStore for SqliteTrackerStore<'_> {
    fn fetch_all_trackers(&self) -> RepoResult<Vec<Tracker>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TRACKER_SELECT_SQL} ORDER BY name ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut trackers = Vec::new();
        while let Some(row) = rows.next()? {
            trackers.push(parse_tracker_row(row)?);
        }
        Ok(trackers)
    }

    fn category_title(&self, id: TrackerId) -> RepoResult<Option<String>> {
        let title = self
            .conn
            .query_row(
                "SELECT c.title
                 FROM trackers t
                 INNER JOIN categories c ON c.id = t.category_id
                 WHERE t.uuid = ?1;",
                [id.to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(title)
    }

    fn category_titles(&self) -> RepoResult<HashMap<TrackerId, String>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.uuid, c.title
             FROM trackers t
             INNER JOIN categories c ON c.id = t.category_id;",
        )?;
        let mut rows = stmt.query([])?;
        let mut titles = HashMap::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            titles.insert(parse_uuid(&uuid_text)?, row.get(1)?);
        }
        Ok(titles)
    }

    fn add_tracker(&self, request: &NewTracker) -> RepoResult<Tracker> {
        let category_id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM categories WHERE title = ?1;",
                [request.category_title.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(category_id) = category_id else {
            return Err(RepoError::CategoryNotFound(request.category_title.clone()));
        };

        let tracker = Tracker::new(
            request.kind,
            request.name.clone(),
            request.color.clone(),
            request.emoji.clone(),
            request.schedule.clone(),
        );
        self.conn.execute(
            "INSERT INTO trackers (
                uuid,
                name,
                color,
                emoji,
                schedule,
                kind,
                is_pinned,
                category_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                tracker.id.to_string(),
                tracker.name.as_str(),
                tracker.color.as_str(),
                tracker.emoji.as_str(),
                schedule_to_tags(&tracker.schedule),
                tracker.kind.as_str(),
                bool_to_int(tracker.is_pinned),
                category_id,
            ],
        )?;

        Ok(tracker)
    }

    fn update_tracker(&self, id: TrackerId, update: &TrackerUpdate) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE trackers
             SET
                name = ?1,
                color = ?2,
                emoji = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                update.name.as_str(),
                update.color.as_str(),
                update.emoji.as_str(),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::TrackerNotFound(id));
        }
        Ok(())
    }

    fn delete_tracker(&self, id: TrackerId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM trackers WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::TrackerNotFound(id));
        }
        Ok(())
    }

    fn toggle_pin(&self, id: TrackerId) -> RepoResult<bool> {
        let pinned: Option<i64> = self
            .conn
            .query_row(
                "UPDATE trackers
                 SET
                    is_pinned = 1 - is_pinned,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?1
                 RETURNING is_pinned;",
                [id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        match pinned {
            Some(value) => int_to_bool(value, "trackers.is_pinned"),
            None => Err(RepoError::TrackerNotFound(id)),
        }
    }

    fn add_category(&self, title: &str) -> RepoResult<bool> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO categories (title) VALUES (?1);",
            [title],
        )?;
        Ok(changed == 1)
    }

    fn list_categories(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT title FROM categories ORDER BY title COLLATE NOCASE, title;")?;
        let mut rows = stmt.query([])?;
        let mut titles = Vec::new();
        while let Some(row) = rows.next()? {
            titles.push(row.get(0)?);
        }
        Ok(titles)
    }
}

/// Rejects connections that did not go through migration bootstrap.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    match schema_status(conn)? {
        SchemaStatus::Current => Ok(()),
        status => Err(RepoError::UninitializedConnection {
            expected_version: SCHEMA_VERSION,
            actual_version: status.found(),
        }),
    }
}

pub(crate) fn parse_uuid(value: &str) -> RepoResult<TrackerId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{value}` in trackers.uuid"))
    })
}

fn parse_tracker_row(row: &Row<'_>) -> RepoResult<Tracker> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text)?;

    let schedule_text: String = row.get("schedule")?;
    let schedule = schedule_from_tags(&schedule_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid schedule `{schedule_text}` in trackers.schedule"
        ))
    })?;

    let kind_text: String = row.get("kind")?;
    let kind = TrackerKind::parse(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid tracker kind `{kind_text}` in trackers.kind"
        ))
    })?;

    Ok(Tracker {
        id,
        name: row.get("name")?,
        color: row.get("color")?,
        emoji: row.get("emoji")?,
        schedule,
        is_pinned: int_to_bool(row.get("is_pinned")?, "trackers.is_pinned")?,
        kind,
    })
}

fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
