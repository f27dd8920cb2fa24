//! Versioned schema migrations tracked through `PRAGMA user_version`.

mod v001_observations;
mod v002_supersession_training;
mod v003_learned_model_weights;

use rusqlite::Connection;
use tracing::{debug, info, warn};

use reverie_core::errors::{ReverieError, ReverieResult, StorageError};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> ReverieResult<()>;

const MIGRATIONS: [(u32, MigrationFn); 3] = [
    (1, v001_observations::migrate),
    (2, v002_supersession_training::migrate),
    (3, v003_learned_model_weights::migrate),
];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 3;

pub fn current_version(conn: &Connection) -> ReverieResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Apply every migration newer than the stored version, each in its own transaction.
pub fn run_migrations(conn: &Connection) -> ReverieResult<u32> {
    apply(conn, &MIGRATIONS)
}

fn apply(conn: &Connection, migrations: &[(u32, MigrationFn)]) -> ReverieResult<u32> {
    let mut version = current_version(conn)?;
    for &(target, migrate) in migrations {
        if target <= version {
            continue;
        }
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| to_storage_err(format!("migration begin: {e}")))?;
        let applied = migrate(&tx).and_then(|()| {
            tx.pragma_update(None, "user_version", target)
                .map_err(|e| to_storage_err(e.to_string()))
        });
        if let Err(e) = applied {
            if let Err(rollback) = tx.rollback() {
                warn!(version = target, error = %rollback, "migration rollback failed");
            }
            return Err(ReverieError::StorageError(StorageError::MigrationFailed {
                version: target,
                reason: e.to_string(),
            }));
        }
        tx.commit().map_err(|e| to_storage_err(format!("migration commit: {e}")))?;
        info!(version = target, "applied schema migration");
        version = target;
    }
    debug!(version, "schema up to date");
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_marker(conn: &Connection) -> ReverieResult<()> {
        conn.execute_batch("CREATE TABLE marker (id INTEGER PRIMARY KEY);")
            .map_err(|e| to_storage_err(e.to_string()))
    }

    fn half_then_fail(conn: &Connection) -> ReverieResult<()> {
        conn.execute_batch("CREATE TABLE partial (id INTEGER PRIMARY KEY);")
            .map_err(|e| to_storage_err(e.to_string()))?;
        Err(to_storage_err("boom".to_string()))
    }

    fn noop(_: &Connection) -> ReverieResult<()> {
        Ok(())
    }

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count > 0
    }

    #[test]
    fn fresh_database_reaches_latest_version() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), LATEST_VERSION);
        assert_eq!(current_version(&conn).unwrap(), LATEST_VERSION);
        assert_eq!(run_migrations(&conn).unwrap(), LATEST_VERSION);
    }

    #[test]
    fn failed_migration_rolls_back_and_keeps_earlier_ones() {
        let conn = Connection::open_in_memory().unwrap();
        let steps: [(u32, MigrationFn); 2] = [(1, create_marker), (2, half_then_fail)];

        let err = apply(&conn, &steps).unwrap_err();
        match err {
            ReverieError::StorageError(StorageError::MigrationFailed { version, reason }) => {
                assert_eq!(version, 2);
                assert!(reason.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(current_version(&conn).unwrap(), 1);
        assert!(table_exists(&conn, "marker"));
        assert!(!table_exists(&conn, "partial"));

        // A later run resumes from the last committed version.
        let fixed: [(u32, MigrationFn); 2] = [(1, create_marker), (2, noop)];
        assert_eq!(apply(&conn, &fixed).unwrap(), 2);
    }
}
