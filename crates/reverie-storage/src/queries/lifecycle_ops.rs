//! Supersession, deprecation, tier, and access-tracking writes.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use reverie_core::errors::ReverieResult;
use reverie_core::observation::{MemoryTier, ObservationId};

use super::to_epoch_ms;
use crate::to_storage_err;

/// Link `older` to `newer` only if it has no superseder yet. Returns whether a row changed.
pub fn mark_superseded(
    conn: &Connection,
    older: ObservationId,
    newer: ObservationId,
) -> ReverieResult<bool> {
    let rows = conn
        .execute(
            "UPDATE observations SET superseded_by = ?2
             WHERE id = ?1 AND superseded_by IS NULL",
            params![older, newer],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows > 0)
}

pub fn deprecate(
    conn: &Connection,
    id: ObservationId,
    reason: &str,
    at: DateTime<Utc>,
) -> ReverieResult<bool> {
    let rows = conn
        .execute(
            "UPDATE observations
             SET deprecated = 1, deprecated_at_epoch = ?2, deprecation_reason = ?3
             WHERE id = ?1",
            params![id, to_epoch_ms(at), reason],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows > 0)
}

pub fn set_memory_tier(
    conn: &Connection,
    id: ObservationId,
    tier: MemoryTier,
    at: DateTime<Utc>,
) -> ReverieResult<bool> {
    let rows = conn
        .execute(
            "UPDATE observations SET memory_tier = ?2, memory_tier_updated_at_epoch = ?3
             WHERE id = ?1",
            params![id, tier.as_str(), to_epoch_ms(at)],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows > 0)
}

pub fn increment_reference_count(
    conn: &Connection,
    id: ObservationId,
    at: DateTime<Utc>,
) -> ReverieResult<bool> {
    let rows = conn
        .execute(
            "UPDATE observations
             SET reference_count = reference_count + 1, last_accessed_at_epoch = ?2
             WHERE id = ?1",
            params![id, to_epoch_ms(at)],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows > 0)
}

pub fn update_last_accessed(
    conn: &Connection,
    id: ObservationId,
    at: DateTime<Utc>,
) -> ReverieResult<bool> {
    let rows = conn
        .execute(
            "UPDATE observations SET last_accessed_at_epoch = ?2 WHERE id = ?1",
            params![id, to_epoch_ms(at)],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(rows > 0)
}
