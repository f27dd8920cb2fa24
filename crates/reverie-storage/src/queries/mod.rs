pub mod lifecycle_ops;
pub mod observation_crud;
pub mod observation_query;
pub mod training_ops;
pub mod weights_ops;

use chrono::{DateTime, Utc};

use reverie_core::errors::{ReverieError, ReverieResult, StorageError};

pub(crate) fn to_epoch_ms(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_epoch_ms(table: &str, ms: i64) -> ReverieResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| {
        ReverieError::StorageError(StorageError::CorruptRow {
            table: table.to_string(),
            details: format!("timestamp out of range: {ms}"),
        })
    })
}

/// SQLite `LIMIT` value; saturates so `usize::MAX` reads as unbounded.
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
