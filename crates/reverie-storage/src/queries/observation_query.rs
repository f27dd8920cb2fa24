//! Read queries over observations: active windows, sessions, tiers, supersession pairs.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Params};

use reverie_core::errors::ReverieResult;
use reverie_core::models::TierStats;
use reverie_core::observation::{MemoryTier, Observation};

use super::observation_crud::{row_to_observation, OBSERVATION_COLUMNS, OBSERVATION_COLUMN_COUNT};
use super::{sql_limit, to_epoch_ms};
use crate::to_storage_err;

const ACTIVE: &str = "deprecated = 0 AND superseded_by IS NULL";

fn collect_observations<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> ReverieResult<Vec<Observation>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, |row| Ok(row_to_observation(row, 0)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(out)
}

/// Active observations of a project created strictly after `after`, oldest first.
pub fn active_since(
    conn: &Connection,
    project: &str,
    after: DateTime<Utc>,
    limit: usize,
) -> ReverieResult<Vec<Observation>> {
    collect_observations(
        conn,
        &format!(
            "SELECT {OBSERVATION_COLUMNS} FROM observations
             WHERE project = ?1 AND {ACTIVE} AND created_at_epoch > ?2
             ORDER BY created_at_epoch ASC, id ASC
             LIMIT ?3"
        ),
        params![project, to_epoch_ms(after), sql_limit(limit)],
    )
}

pub fn by_session(conn: &Connection, session_id: &str) -> ReverieResult<Vec<Observation>> {
    collect_observations(
        conn,
        &format!(
            "SELECT {OBSERVATION_COLUMNS} FROM observations
             WHERE session_id = ?1 AND {ACTIVE}
             ORDER BY created_at_epoch ASC, id ASC"
        ),
        params![session_id],
    )
}

pub fn non_deprecated(conn: &Connection, project: &str) -> ReverieResult<Vec<Observation>> {
    collect_observations(
        conn,
        &format!(
            "SELECT {OBSERVATION_COLUMNS} FROM observations
             WHERE project = ?1 AND deprecated = 0
             ORDER BY id ASC"
        ),
        params![project],
    )
}

pub fn by_memory_tier(
    conn: &Connection,
    project: &str,
    tier: MemoryTier,
    limit: usize,
) -> ReverieResult<Vec<Observation>> {
    collect_observations(
        conn,
        &format!(
            "SELECT {OBSERVATION_COLUMNS} FROM observations
             WHERE project = ?1 AND memory_tier = ?2 AND deprecated = 0
             ORDER BY created_at_epoch DESC, id DESC
             LIMIT ?3"
        ),
        params![project, tier.as_str(), sql_limit(limit)],
    )
}

/// Superseded observations still awaiting deprecation, newest first.
pub fn superseded(conn: &Connection, project: &str, limit: usize) -> ReverieResult<Vec<Observation>> {
    collect_observations(
        conn,
        &format!(
            "SELECT {OBSERVATION_COLUMNS} FROM observations
             WHERE project = ?1 AND superseded_by IS NOT NULL AND deprecated = 0
             ORDER BY created_at_epoch DESC, id DESC
             LIMIT ?2"
        ),
        params![project, sql_limit(limit)],
    )
}

/// Superseded, non-deprecated observations created before `before`. `None` spans all projects.
pub fn superseded_before(
    conn: &Connection,
    project: Option<&str>,
    before: DateTime<Utc>,
) -> ReverieResult<Vec<Observation>> {
    collect_observations(
        conn,
        &format!(
            "SELECT {OBSERVATION_COLUMNS} FROM observations
             WHERE superseded_by IS NOT NULL AND deprecated = 0
               AND created_at_epoch < ?1
               AND (?2 IS NULL OR project = ?2)
             ORDER BY created_at_epoch ASC, id ASC"
        ),
        params![to_epoch_ms(before), project],
    )
}

/// `(older, newer)` for every superseded, non-deprecated observation whose superseder exists,
/// most recent older observation first.
pub fn supersession_pairs(
    conn: &Connection,
    project: Option<&str>,
    limit: usize,
) -> ReverieResult<Vec<(Observation, Observation)>> {
    let older_cols = prefixed_columns("o");
    let newer_cols = prefixed_columns("n");
    let sql = format!(
        "SELECT {older_cols}, {newer_cols}
         FROM observations o
         JOIN observations n ON n.id = o.superseded_by
         WHERE o.deprecated = 0 AND (?1 IS NULL OR o.project = ?1)
         ORDER BY o.created_at_epoch DESC, o.id DESC
         LIMIT ?2"
    );
    let mut stmt = conn.prepare(&sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![project, sql_limit(limit)], |row| {
            Ok((
                row_to_observation(row, 0),
                row_to_observation(row, OBSERVATION_COLUMN_COUNT),
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        let (older, newer) = row.map_err(|e| to_storage_err(e.to_string()))?;
        out.push((older?, newer?));
    }
    Ok(out)
}

fn prefixed_columns(alias: &str) -> String {
    OBSERVATION_COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn list_projects(conn: &Connection) -> ReverieResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT project FROM observations ORDER BY project ASC")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Counts per tier over non-deprecated observations. Unknown tier strings are ignored.
pub fn memory_tier_counts(conn: &Connection, project: &str) -> ReverieResult<TierStats> {
    let mut stmt = conn
        .prepare(
            "SELECT memory_tier, COUNT(*) FROM observations
             WHERE project = ?1 AND deprecated = 0
             GROUP BY memory_tier",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![project], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut stats = TierStats::default();
    for row in rows {
        let (tier, count) = row.map_err(|e| to_storage_err(e.to_string()))?;
        if let Ok(tier) = tier.parse::<MemoryTier>() {
            stats.add(tier, count.max(0) as usize);
        }
    }
    Ok(stats)
}
