//! Tracker schema steps and the `user_version` upgrader.
//!
//! Each step runs in its own transaction together with its
//! `user_version` bump, so an interrupted upgrade resumes at the first
//! missing step.

use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "trackers_categories_records",
        sql: include_str!("sql/0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        name: "record_day_index",
        sql: include_str!("sql/0002_record_day_index.sql"),
    },
];

/// Schema version produced by a fully upgraded database.
pub const SCHEMA_VERSION: u32 = STEPS[STEPS.len() - 1].version;

/// Where a connection's schema stands relative to this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Current,
    /// Upgradable; `found` is below [`SCHEMA_VERSION`].
    Behind { found: u32 },
    /// Written by a newer build; never touched.
    Ahead { found: u32 },
}

impl SchemaStatus {
    /// Version stored in the database.
    pub fn found(self) -> u32 {
        match self {
            Self::Current => SCHEMA_VERSION,
            Self::Behind { found } | Self::Ahead { found } => found,
        }
    }
}

/// Reads the schema version of `conn` and classifies it.
pub fn schema_status(conn: &Connection) -> DbResult<SchemaStatus> {
    let found: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(match found {
        SCHEMA_VERSION => SchemaStatus::Current,
        found if found < SCHEMA_VERSION => SchemaStatus::Behind { found },
        found => SchemaStatus::Ahead { found },
    })
}

/// Runs every step above the stored version; returns how many ran.
pub(super) fn upgrade(conn: &mut Connection) -> DbResult<usize> {
    let found = match schema_status(conn)? {
        SchemaStatus::Current => return Ok(0),
        SchemaStatus::Ahead { found } => {
            return Err(DbError::SchemaTooNew {
                found,
                supported: SCHEMA_VERSION,
            });
        }
        SchemaStatus::Behind { found } => found,
    };

    let pending = STEPS.iter().filter(|step| step.version > found);
    let mut applied = 0;
    for step in pending {
        apply_step(conn, step).map_err(|source| {
            error!(
                "event=db_migrate module=db status=error version={} step={} error={source}",
                step.version, step.name
            );
            DbError::Migration {
                version: step.version,
                step: step.name,
                source,
            }
        })?;
        info!(
            "event=db_migrate module=db status=ok version={} step={}",
            step.version, step.name
        );
        applied += 1;
    }
    Ok(applied)
}

fn apply_step(conn: &mut Connection, step: &SchemaStep) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.version)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::{SchemaStatus, SCHEMA_VERSION, STEPS};

    #[test]
    fn step_versions_are_contiguous_from_one() {
        for (index, step) in STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "step {}", step.name);
        }
        assert_eq!(SCHEMA_VERSION as usize, STEPS.len());
    }

    #[test]
    fn status_reports_stored_version() {
        assert_eq!(SchemaStatus::Current.found(), SCHEMA_VERSION);
        assert_eq!(SchemaStatus::Behind { found: 1 }.found(), 1);
        assert_eq!(SchemaStatus::Ahead { found: 9 }.found(), 9);
    }
}
