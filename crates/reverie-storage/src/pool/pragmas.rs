//! PRAGMA configuration applied to every SQLite connection.
//!
//! WAL mode, NORMAL sync, 5s busy_timeout.

use rusqlite::Connection;

use reverie_core::errors::ReverieResult;

use crate::to_storage_err;

/// Pragmas for the write connection.
pub fn apply_pragmas(conn: &Connection) -> ReverieResult<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -16000;
        PRAGMA busy_timeout = 5000;
        PRAGMA foreign_keys = ON;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Pragmas for read connections. journal_mode is a property of the file, set by the writer.
pub fn apply_read_pragmas(conn: &Connection) -> ReverieResult<()> {
    conn.execute_batch(
        "
        PRAGMA cache_size = -16000;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Whether WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> ReverieResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}
