//! Tracker storage: connection bootstrap and schema versioning.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - Stores only accept connections at exactly [`SCHEMA_VERSION`].

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::{schema_status, SchemaStatus, SCHEMA_VERSION};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// Connecting or configuring the connection failed.
    Sqlite(rusqlite::Error),
    /// The database was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// One schema step failed. Steps before it stay committed.
    Migration {
        version: u32,
        step: &'static str,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "tracker database is at schema {found}, this build only knows up to {supported}"
            ),
            Self::Migration {
                version,
                step,
                source,
            } => write!(f, "schema step {version} ({step}) failed: {source}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
