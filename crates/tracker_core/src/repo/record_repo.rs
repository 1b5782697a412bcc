//! Completion record repository contracts and SQLite implementation.
//!
//! # Invariants
//! - At most one record exists per (tracker, day); repeated completion of the
//!   same day is a no-op reported as `Ok(false)`.
//! - Records are append-only here; they disappear only with their tracker.

use crate::model::record::CompletionRecord;
use crate::model::tracker::TrackerId;
use crate::repo::tracker_repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Repository interface for completion records.
pub trait RecordStore {
    /// Records of every tracker on one day.
    fn fetch_records(&self, date: NaiveDate) -> RepoResult<Vec<CompletionRecord>>;
    /// Full record history, oldest day first.
    fn fetch_all_records(&self) -> RepoResult<Vec<CompletionRecord>>;
    /// Appends a completion; returns `false` when the day was already recorded.
    fn add_record(&self, tracker_id: TrackerId, date: NaiveDate) -> RepoResult<bool>;
    /// Number of records of one tracker.
    fn count_for_tracker(&self, tracker_id: TrackerId) -> RepoResult<u64>;
    /// Number of records across all trackers.
    fn count_all(&self) -> RepoResult<u64>;
}

/// SQLite-backed completion record store.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Constructs a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn fetch_records(&self, date: NaiveDate) -> RepoResult<Vec<CompletionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT tracker_uuid, day
             FROM tracker_records
             WHERE day = ?1
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([day_to_db(date)])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }

    fn fetch_all_records(&self) -> RepoResult<Vec<CompletionRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT tracker_uuid, day
             FROM tracker_records
             ORDER BY day ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }
        Ok(records)
    }

    fn add_record(&self, tracker_id: TrackerId, date: NaiveDate) -> RepoResult<bool> {
        let tracker_uuid = tracker_id.to_string();
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM trackers WHERE uuid = ?1);",
            [tracker_uuid.as_str()],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::TrackerNotFound(tracker_id));
        }

        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO tracker_records (tracker_uuid, day) VALUES (?1, ?2);",
            params![tracker_uuid, day_to_db(date)],
        )?;
        Ok(changed == 1)
    }

    fn count_for_tracker(&self, tracker_id: TrackerId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tracker_records WHERE tracker_uuid = ?1;",
            [tracker_id.to_string()],
            |row| row.get(0),
        )?;
        count_to_u64(count)
    }

    fn count_all(&self) -> RepoResult<u64> {
        let sql = "SELECT COUNT(*) FROM tracker_records;";
        let count: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
        count_to_u64(count)
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<CompletionRecord> {
    let uuid_text: String = row.get("tracker_uuid")?;
    let day_text: String = row.get("day")?;
    let date = NaiveDate::parse_from_str(&day_text, DAY_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid day `{day_text}` in tracker_records.day"))
    })?;
    Ok(CompletionRecord::new(parse_uuid(&uuid_text)?, date))
}

fn day_to_db(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

fn count_to_u64(count: i64) -> RepoResult<u64> {
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative record count `{count}`")))
}
