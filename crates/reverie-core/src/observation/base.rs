use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tier::MemoryTier;
use super::types::ObservationType;

/// Stable integer identity assigned by the store.
pub type ObservationId = i64;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
const MILLIS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// A single recorded unit of work or insight from a coding session.
///
/// The store owns the record. The consolidation engine only touches the
/// supersession, deprecation, and lifecycle fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub id: ObservationId,
    pub project: String,
    /// Session that produced this observation, if known.
    pub session_id: Option<String>,
    pub observation_type: ObservationType,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub narrative: Option<String>,
    pub facts: Vec<String>,
    pub concepts: Vec<String>,
    pub files_read: Vec<String>,
    pub files_modified: Vec<String>,
    /// Immutable creation time.
    pub created_at: DateTime<Utc>,
    /// Set once, never cleared.
    pub superseded_by: Option<ObservationId>,
    pub deprecated: bool,
    pub deprecated_at: Option<DateTime<Utc>>,
    pub deprecation_reason: Option<String>,
    pub memory_tier: MemoryTier,
    pub memory_tier_updated_at: Option<DateTime<Utc>>,
    /// Non-decreasing, bumped by external access events.
    pub reference_count: u64,
    pub last_accessed_at: Option<DateTime<Utc>>,
}

impl Observation {
    /// Active means neither deprecated nor superseded.
    pub fn is_active(&self) -> bool {
        !self.deprecated && self.superseded_by.is_none()
    }

    pub fn is_superseded(&self) -> bool {
        self.superseded_by.is_some()
    }

    /// Narrative if present and non-empty, otherwise the title.
    pub fn query_text(&self) -> Option<&str> {
        self.narrative
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.title.as_deref().filter(|s| !s.trim().is_empty()))
    }

    /// Fractional days elapsed since creation.
    pub fn days_since_creation(&self, now: DateTime<Utc>) -> f64 {
        (now - self.created_at).num_milliseconds() as f64 / MILLIS_PER_DAY
    }

    /// Fractional days since last access, falling back to creation time.
    pub fn days_since_last_access(&self, now: DateTime<Utc>) -> f64 {
        match self.last_accessed_at {
            Some(at) => (now - at).num_milliseconds() as f64 / MILLIS_PER_DAY,
            None => self.days_since_creation(now),
        }
    }

    /// Hours from `earlier`'s creation to this observation's creation.
    pub fn hours_after(&self, earlier: &Observation) -> f64 {
        (self.created_at - earlier.created_at).num_milliseconds() as f64 / MILLIS_PER_HOUR
    }
}

/// Identity equality: two observations are equal if they share an id.
impl PartialEq for Observation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
