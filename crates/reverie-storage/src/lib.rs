//! # reverie-storage
//!
//! SQLite-backed implementation of the observation and model stores.
//! One write connection, a small read pool, versioned migrations.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use reverie_core::errors::{ReverieError, StorageError};

/// Wrap a SQLite failure message in the workspace error type.
pub fn to_storage_err(message: String) -> ReverieError {
    ReverieError::StorageError(StorageError::SqliteError { message })
}
