//! Append-only supersession training log.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use reverie_core::errors::ReverieResult;
use reverie_core::models::{FeatureVector, TrainingExample};

use super::{from_epoch_ms, sql_limit, to_epoch_ms};
use crate::to_storage_err;

pub fn append_example(conn: &Connection, example: &TrainingExample) -> ReverieResult<()> {
    let f = &example.features;
    conn.execute(
        "INSERT INTO supersession_training (
            older_id, newer_id, semantic_similarity, topic_match, file_overlap,
            type_match, time_delta_hours, priority_score, older_reference_count,
            label, confidence, created_at_epoch
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            example.older_id,
            example.newer_id,
            f.semantic_similarity,
            f.topic_match as i32,
            f.file_overlap,
            f.type_match,
            f.time_delta_hours,
            f.priority_score,
            f.older_reference_count as i64,
            example.label as i32,
            example.confidence,
            to_epoch_ms(example.created_at),
        ],
    )
    .map_err(|e| to_storage_err(format!("append_example: {e}")))?;
    Ok(())
}

/// The `limit` most recent examples, oldest first.
pub fn recent_examples(conn: &Connection, limit: usize) -> ReverieResult<Vec<TrainingExample>> {
    let mut stmt = conn
        .prepare(
            "SELECT older_id, newer_id, semantic_similarity, topic_match, file_overlap,
                    type_match, time_delta_hours, priority_score, older_reference_count,
                    label, confidence, created_at_epoch
             FROM supersession_training
             ORDER BY id DESC
             LIMIT ?1",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![sql_limit(limit)], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                FeatureVector {
                    semantic_similarity: row.get(2)?,
                    topic_match: row.get::<_, i32>(3)? != 0,
                    file_overlap: row.get(4)?,
                    type_match: row.get(5)?,
                    time_delta_hours: row.get(6)?,
                    priority_score: row.get(7)?,
                    older_reference_count: row.get::<_, i64>(8)?.max(0) as u64,
                },
                row.get::<_, i32>(9)? != 0,
                row.get::<_, f64>(10)?,
                row.get::<_, i64>(11)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (older_id, newer_id, features, label, confidence, created) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        out.push(TrainingExample {
            older_id,
            newer_id,
            features,
            label,
            confidence,
            created_at: from_epoch_ms("supersession_training", created)?,
        });
    }
    out.reverse();
    Ok(out)
}

pub fn count_since(conn: &Connection, since: DateTime<Utc>) -> ReverieResult<usize> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM supersession_training WHERE created_at_epoch >= ?1",
            params![to_epoch_ms(since)],
            |row| row.get(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count.max(0) as usize)
}
