//! Writes detected supersessions and deprecations through the observation store.
//!
//! Every write is guarded so repeating it is a no-op. A failed single write is
//! logged and reported, never propagated, so a pass can continue.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use reverie_core::errors::{ReverieError, ReverieResult};
use reverie_core::models::{ApplyOutcome, SupersessionCandidate};
use reverie_core::observation::{Observation, ObservationId};
use reverie_core::traits::IObservationStore;

use crate::algorithms::window::days_before;

pub struct ConsolidationApplier {
    store: Arc<dyn IObservationStore>,
}

impl ConsolidationApplier {
    pub fn new(store: Arc<dyn IObservationStore>) -> Self {
        Self { store }
    }

    /// Link `candidate.older_id` to `candidate.newer_id` unless it already has a superseder.
    pub fn apply_supersession(&self, candidate: &SupersessionCandidate, dry_run: bool) -> ApplyOutcome {
        if dry_run {
            info!(
                older_id = candidate.older_id,
                newer_id = candidate.newer_id,
                confidence = candidate.confidence,
                priority_tier = %candidate.priority_tier,
                reason = %candidate.reason,
                "dry run: would apply supersession"
            );
            return ApplyOutcome::DryRun;
        }

        match self.store.mark_superseded(candidate.older_id, candidate.newer_id) {
            Ok(true) => {
                info!(
                    older_id = candidate.older_id,
                    newer_id = candidate.newer_id,
                    confidence = candidate.confidence,
                    priority_tier = %candidate.priority_tier,
                    "supersession applied"
                );
                ApplyOutcome::Applied
            }
            Ok(false) => self.unchanged_outcome(candidate.older_id),
            Err(e) => {
                error!(
                    older_id = candidate.older_id,
                    newer_id = candidate.newer_id,
                    error = %e,
                    "failed to apply supersession"
                );
                ApplyOutcome::Failed
            }
        }
    }

    // The guarded update matched nothing: either already linked or no such row.
    fn unchanged_outcome(&self, older_id: ObservationId) -> ApplyOutcome {
        match self.require(older_id) {
            Ok(existing) if existing.is_superseded() => {
                debug!(
                    older_id,
                    superseded_by = ?existing.superseded_by,
                    "observation already superseded"
                );
                ApplyOutcome::AlreadySuperseded
            }
            Ok(_) => {
                error!(older_id, "supersession target changed during the update");
                ApplyOutcome::Failed
            }
            Err(e) => {
                error!(older_id, error = %e, "failed to resolve supersession target");
                ApplyOutcome::Failed
            }
        }
    }

    fn require(&self, id: ObservationId) -> ReverieResult<Observation> {
        self.store.get(id)?.ok_or(ReverieError::ObservationNotFound { id })
    }

    /// Mark one observation deprecated. False, logged, on failure or unknown id.
    pub fn deprecate_observation(&self, id: ObservationId, reason: &str) -> bool {
        match self.store.deprecate(id, reason, Utc::now()) {
            Ok(true) => {
                info!(observation_id = id, reason, "observation deprecated");
                true
            }
            Ok(false) => {
                warn!(observation_id = id, "cannot deprecate unknown observation");
                false
            }
            Err(e) => {
                error!(observation_id = id, error = %e, "failed to deprecate observation");
                false
            }
        }
    }

    pub fn get_superseded_observations(
        &self,
        project: &str,
        limit: usize,
    ) -> ReverieResult<Vec<Observation>> {
        self.store.get_superseded_observations(project, limit)
    }

    /// Deprecate superseded rows created more than `after_days` ago.
    /// Returns how many were deprecated, or would be on a dry run.
    pub fn deprecate_old_superseded(
        &self,
        project: Option<&str>,
        after_days: u32,
        dry_run: bool,
    ) -> ReverieResult<usize> {
        let cutoff = days_before(Utc::now(), after_days);
        let stale = self.store.get_superseded_before(project, cutoff)?;
        if dry_run {
            info!(
                project = project.unwrap_or("*"),
                count = stale.len(),
                after_days,
                "dry run: would deprecate superseded observations"
            );
            return Ok(stale.len());
        }

        let reason = format!("Superseded for more than {after_days} days");
        let deprecated = stale
            .iter()
            .filter(|obs| self.deprecate_observation(obs.id, &reason))
            .count();
        debug!(
            project = project.unwrap_or("*"),
            candidates = stale.len(),
            deprecated,
            "old superseded observations deprecated"
        );
        Ok(deprecated)
    }
}
