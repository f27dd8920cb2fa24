//! v002: append-only log of labelled supersession examples.

use rusqlite::Connection;

use reverie_core::errors::ReverieResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ReverieResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS supersession_training (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            older_id                INTEGER NOT NULL,
            newer_id                INTEGER NOT NULL,
            semantic_similarity     REAL NOT NULL,
            topic_match             INTEGER NOT NULL,
            file_overlap            REAL NOT NULL,
            type_match              REAL NOT NULL,
            time_delta_hours        REAL NOT NULL,
            priority_score          REAL NOT NULL,
            older_reference_count   INTEGER NOT NULL,
            label                   INTEGER NOT NULL,
            confidence              REAL NOT NULL,
            created_at_epoch        INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_training_created ON supersession_training(created_at_epoch);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
