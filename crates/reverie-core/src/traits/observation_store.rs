use chrono::{DateTime, Utc};

use crate::errors::ReverieResult;
use crate::models::TierStats;
use crate::observation::{MemoryTier, Observation, ObservationId};

/// Persistence contract for observations and their consolidation state.
pub trait IObservationStore: Send + Sync {
    // --- CRUD ---
    /// Insert an observation. A non-positive id lets the store assign one.
    fn insert(&self, observation: &Observation) -> ReverieResult<ObservationId>;
    fn get(&self, id: ObservationId) -> ReverieResult<Option<Observation>>;

    // --- Query ---
    /// Active observations of a project created after `after`, oldest first.
    fn get_active_observations(
        &self,
        project: &str,
        after: DateTime<Utc>,
        limit: usize,
    ) -> ReverieResult<Vec<Observation>>;
    /// Active observations recorded in one session, oldest first.
    fn get_session_observations(&self, session_id: &str) -> ReverieResult<Vec<Observation>>;
    fn get_non_deprecated_observations(&self, project: &str) -> ReverieResult<Vec<Observation>>;
    /// Non-deprecated observations in one tier, newest first.
    fn get_observations_by_memory_tier(
        &self,
        project: &str,
        tier: MemoryTier,
        limit: usize,
    ) -> ReverieResult<Vec<Observation>>;
    /// Superseded observations not yet deprecated, newest first.
    fn get_superseded_observations(
        &self,
        project: &str,
        limit: usize,
    ) -> ReverieResult<Vec<Observation>>;
    /// Superseded, non-deprecated observations created before `before`.
    fn get_superseded_before(
        &self,
        project: Option<&str>,
        before: DateTime<Utc>,
    ) -> ReverieResult<Vec<Observation>>;
    /// `(older, newer)` pairs for every superseded, non-deprecated observation,
    /// most recently created older observation first.
    fn get_supersession_pairs(
        &self,
        project: Option<&str>,
        limit: usize,
    ) -> ReverieResult<Vec<(Observation, Observation)>>;
    fn list_projects(&self) -> ReverieResult<Vec<String>>;

    // --- Mutation ---
    /// Link `older` to `newer` unless it already has a superseder. Returns whether a row changed.
    fn mark_superseded(&self, older: ObservationId, newer: ObservationId) -> ReverieResult<bool>;
    /// Returns false for an unknown id.
    fn deprecate(
        &self,
        id: ObservationId,
        reason: &str,
        at: DateTime<Utc>,
    ) -> ReverieResult<bool>;
    fn set_memory_tier(
        &self,
        id: ObservationId,
        tier: MemoryTier,
        at: DateTime<Utc>,
    ) -> ReverieResult<bool>;
    /// Bump the reference count and stamp `last_accessed_at`.
    fn increment_reference_count(&self, id: ObservationId, at: DateTime<Utc>)
        -> ReverieResult<bool>;
    fn update_last_accessed(&self, id: ObservationId, at: DateTime<Utc>) -> ReverieResult<bool>;

    // --- Aggregation ---
    /// Counts per tier over non-deprecated observations.
    fn memory_tier_counts(&self, project: &str) -> ReverieResult<TierStats>;
}
