//! Insert, get, and row decoding for observations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use reverie_core::errors::{ReverieError, ReverieResult, StorageError};
use reverie_core::observation::{MemoryTier, Observation, ObservationId, ObservationType};

use super::{from_epoch_ms, to_epoch_ms};
use crate::to_storage_err;

/// Columns read by every observation query, in decode order (20 columns).
pub(crate) const OBSERVATION_COLUMNS: &str = "id, project, session_id, type, title, subtitle,
     narrative, facts, concepts, files_read, files_modified, created_at_epoch,
     superseded_by, deprecated, deprecated_at_epoch, deprecation_reason,
     memory_tier, memory_tier_updated_at_epoch, reference_count, last_accessed_at_epoch";

pub(crate) const OBSERVATION_COLUMN_COUNT: usize = 20;

/// Insert an observation. A non-positive id is left for SQLite to assign.
pub fn insert_observation(conn: &Connection, obs: &Observation) -> ReverieResult<ObservationId> {
    let id = (obs.id > 0).then_some(obs.id);
    conn.execute(
        "INSERT INTO observations (
            id, project, session_id, type, title, subtitle, narrative,
            facts, concepts, files_read, files_modified, created_at_epoch,
            superseded_by, deprecated, deprecated_at_epoch, deprecation_reason,
            memory_tier, memory_tier_updated_at_epoch, reference_count, last_accessed_at_epoch
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20
        )",
        params![
            id,
            obs.project,
            obs.session_id,
            obs.observation_type.as_str(),
            obs.title,
            obs.subtitle,
            obs.narrative,
            encode_list(&obs.facts)?,
            encode_list(&obs.concepts)?,
            encode_list(&obs.files_read)?,
            encode_list(&obs.files_modified)?,
            to_epoch_ms(obs.created_at),
            obs.superseded_by,
            obs.deprecated as i32,
            obs.deprecated_at.map(to_epoch_ms),
            obs.deprecation_reason,
            obs.memory_tier.as_str(),
            obs.memory_tier_updated_at.map(to_epoch_ms),
            obs.reference_count as i64,
            obs.last_accessed_at.map(to_epoch_ms),
        ],
    )
    .map_err(|e| to_storage_err(format!("insert_observation: {e}")))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_observation(conn: &Connection, id: ObservationId) -> ReverieResult<Option<Observation>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {OBSERVATION_COLUMNS} FROM observations WHERE id = ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let result = stmt
        .query_row(params![id], |row| Ok(row_to_observation(row, 0)))
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    result.transpose()
}

/// Empty lists are stored as NULL.
fn encode_list(items: &[String]) -> ReverieResult<Option<String>> {
    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(items)?))
}

/// NULL or malformed JSON reads back as an empty list.
fn decode_list(raw: Option<String>) -> Vec<String> {
    raw.and_then(|s| serde_json::from_str::<Vec<String>>(&s).ok())
        .unwrap_or_default()
}

fn corrupt(details: String) -> ReverieError {
    ReverieError::StorageError(StorageError::CorruptRow {
        table: "observations".to_string(),
        details,
    })
}

/// Decode an observation starting at column `offset`.
pub(crate) fn row_to_observation(row: &Row<'_>, offset: usize) -> ReverieResult<Observation> {
    let col = |i: usize| offset + i;
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());

    let type_str: String = row.get(col(3)).map_err(get_err)?;
    let observation_type: ObservationType = type_str
        .parse()
        .map_err(|_| corrupt(format!("unknown observation type '{type_str}'")))?;
    let tier_str: String = row.get(col(16)).map_err(get_err)?;
    let memory_tier: MemoryTier = tier_str
        .parse()
        .map_err(|_| corrupt(format!("unknown memory tier '{tier_str}'")))?;

    let opt_time = |i: usize| -> ReverieResult<Option<chrono::DateTime<chrono::Utc>>> {
        let raw: Option<i64> = row.get(col(i)).map_err(get_err)?;
        raw.map(|ms| from_epoch_ms("observations", ms)).transpose()
    };

    Ok(Observation {
        id: row.get(col(0)).map_err(get_err)?,
        project: row.get(col(1)).map_err(get_err)?,
        session_id: row.get(col(2)).map_err(get_err)?,
        observation_type,
        title: row.get(col(4)).map_err(get_err)?,
        subtitle: row.get(col(5)).map_err(get_err)?,
        narrative: row.get(col(6)).map_err(get_err)?,
        facts: decode_list(row.get(col(7)).map_err(get_err)?),
        concepts: decode_list(row.get(col(8)).map_err(get_err)?),
        files_read: decode_list(row.get(col(9)).map_err(get_err)?),
        files_modified: decode_list(row.get(col(10)).map_err(get_err)?),
        created_at: from_epoch_ms("observations", row.get(col(11)).map_err(get_err)?)?,
        superseded_by: row.get(col(12)).map_err(get_err)?,
        deprecated: row.get::<_, i32>(col(13)).map_err(get_err)? != 0,
        deprecated_at: opt_time(14)?,
        deprecation_reason: row.get(col(15)).map_err(get_err)?,
        memory_tier,
        memory_tier_updated_at: opt_time(17)?,
        reference_count: row.get::<_, i64>(col(18)).map_err(get_err)?.max(0) as u64,
        last_accessed_at: opt_time(19)?,
    })
}
