//! v003: versioned weight rows for the confidence model.

use rusqlite::Connection;

use reverie_core::errors::ReverieResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> ReverieResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS learned_model_weights (
            id                          INTEGER PRIMARY KEY AUTOINCREMENT,
            weight_semantic_similarity  REAL NOT NULL,
            weight_topic_match          REAL NOT NULL,
            weight_file_overlap         REAL NOT NULL,
            weight_type_match           REAL NOT NULL,
            weight_time_decay           REAL NOT NULL,
            weight_priority_boost       REAL NOT NULL,
            weight_reference_decay      REAL NOT NULL,
            weight_bias                 REAL NOT NULL,
            examples_used               INTEGER NOT NULL,
            loss                        REAL NOT NULL,
            accuracy                    REAL NOT NULL,
            trained_at_epoch            INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_weights_trained ON learned_model_weights(trained_at_epoch);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
