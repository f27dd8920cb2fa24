//! The single serialized write connection.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use reverie_core::errors::ReverieResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// Exclusive writer. Every mutation goes through here, one at a time.
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path) -> ReverieResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> ReverieResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run `f` while holding the writer lock.
    pub fn with_conn_sync<F, T>(&self, f: F) -> ReverieResult<T>
    where
        F: FnOnce(&Connection) -> ReverieResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("write connection lock poisoned: {e}")))?;
        f(&guard)
    }
}
