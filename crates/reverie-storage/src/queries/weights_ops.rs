//! Versioned weight rows. The newest row is authoritative.

use rusqlite::{params, Connection, OptionalExtension};

use reverie_core::errors::ReverieResult;
use reverie_core::models::{FeatureWeights, ModelWeights};

use super::{from_epoch_ms, to_epoch_ms};
use crate::to_storage_err;

pub fn append_weights(conn: &Connection, model: &ModelWeights) -> ReverieResult<()> {
    let w = &model.weights;
    conn.execute(
        "INSERT INTO learned_model_weights (
            weight_semantic_similarity, weight_topic_match, weight_file_overlap,
            weight_type_match, weight_time_decay, weight_priority_boost,
            weight_reference_decay, weight_bias, examples_used, loss, accuracy,
            trained_at_epoch
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            w.semantic_similarity,
            w.topic_match,
            w.file_overlap,
            w.type_match,
            w.time_decay,
            w.priority_boost,
            w.reference_decay,
            w.bias,
            model.examples_used as i64,
            model.loss,
            model.accuracy,
            to_epoch_ms(model.trained_at),
        ],
    )
    .map_err(|e| to_storage_err(format!("append_weights: {e}")))?;
    Ok(())
}

pub fn latest_weights(conn: &Connection) -> ReverieResult<Option<ModelWeights>> {
    let row = conn
        .query_row(
            "SELECT weight_semantic_similarity, weight_topic_match, weight_file_overlap,
                    weight_type_match, weight_time_decay, weight_priority_boost,
                    weight_reference_decay, weight_bias, examples_used, loss, accuracy,
                    trained_at_epoch
             FROM learned_model_weights
             ORDER BY trained_at_epoch DESC, id DESC
             LIMIT 1",
            [],
            |row| {
                Ok((
                    FeatureWeights {
                        semantic_similarity: row.get(0)?,
                        topic_match: row.get(1)?,
                        file_overlap: row.get(2)?,
                        type_match: row.get(3)?,
                        time_decay: row.get(4)?,
                        priority_boost: row.get(5)?,
                        reference_decay: row.get(6)?,
                        bias: row.get(7)?,
                    },
                    row.get::<_, i64>(8)?,
                    row.get::<_, f64>(9)?,
                    row.get::<_, f64>(10)?,
                    row.get::<_, i64>(11)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    row.map(|(weights, examples, loss, accuracy, trained)| {
        Ok(ModelWeights {
            weights,
            examples_used: examples.max(0) as usize,
            loss,
            accuracy,
            trained_at: from_epoch_ms("learned_model_weights", trained)?,
        })
    })
    .transpose()
}
