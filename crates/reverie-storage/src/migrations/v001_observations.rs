//! v001: observations table with consolidation and lifecycle columns.

use rusqlite::Connection;

use reverie_core::errors::ReverieResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ReverieResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS observations (
            id                              INTEGER PRIMARY KEY AUTOINCREMENT,
            project                         TEXT NOT NULL,
            session_id                      TEXT,
            type                            TEXT NOT NULL,
            title                           TEXT,
            subtitle                        TEXT,
            narrative                       TEXT,
            facts                           TEXT,
            concepts                        TEXT,
            files_read                      TEXT,
            files_modified                  TEXT,
            created_at_epoch                INTEGER NOT NULL,
            superseded_by                   INTEGER,
            deprecated                      INTEGER NOT NULL DEFAULT 0,
            deprecated_at_epoch             INTEGER,
            deprecation_reason              TEXT,
            memory_tier                     TEXT NOT NULL DEFAULT 'working',
            memory_tier_updated_at_epoch    INTEGER,
            reference_count                 INTEGER NOT NULL DEFAULT 0,
            last_accessed_at_epoch          INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_observations_project_created
            ON observations(project, created_at_epoch);
        CREATE INDEX IF NOT EXISTS idx_observations_session ON observations(session_id);
        CREATE INDEX IF NOT EXISTS idx_observations_superseded ON observations(superseded_by);
        CREATE INDEX IF NOT EXISTS idx_observations_tier ON observations(project, memory_tier);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
