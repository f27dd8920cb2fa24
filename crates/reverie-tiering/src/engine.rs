//! MemoryTierEngine: classification plus the tier and access-tracking writes.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use reverie_core::config::MemoryTierConfig;
use reverie_core::errors::ReverieResult;
use reverie_core::models::{MemoryTierClassification, TierStats};
use reverie_core::observation::{MemoryTier, Observation, ObservationId};
use reverie_core::traits::IObservationStore;
use reverie_observability::tiering_span;

use crate::rules::classify_at;

/// Engine that classifies observations into memory tiers.
pub struct MemoryTierEngine {
    store: Arc<dyn IObservationStore>,
    config: MemoryTierConfig,
}

impl MemoryTierEngine {
    pub fn new(store: Arc<dyn IObservationStore>, config: MemoryTierConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &MemoryTierConfig {
        &self.config
    }

    pub fn classify(&self, observation: &Observation) -> MemoryTierClassification {
        classify_at(observation, &self.config, Utc::now())
    }

    /// Persist a classification if it changes the stored tier. Returns whether a row changed.
    pub fn apply(&self, classification: &MemoryTierClassification) -> ReverieResult<bool> {
        if !classification.is_change() {
            return Ok(false);
        }
        let changed = self.store.set_memory_tier(
            classification.observation_id,
            classification.tier,
            Utc::now(),
        )?;
        if changed {
            debug!(
                observation_id = classification.observation_id,
                from = %classification.previous_tier,
                to = %classification.tier,
                reason = %classification.reason,
                "memory tier updated"
            );
        }
        Ok(changed)
    }

    /// Reclassify every non-deprecated observation of a project. Returns rows changed.
    /// A failed write is logged and skipped.
    pub fn batch_classify(&self, project: &str) -> ReverieResult<usize> {
        self.batch_classify_with(project, &self.config)
    }

    /// Same as [`batch_classify`](Self::batch_classify) under an explicit config.
    pub fn batch_classify_with(&self, project: &str, config: &MemoryTierConfig) -> ReverieResult<usize> {
        if !config.reclassification_active() {
            debug!(project, "memory tier reclassification disabled");
            return Ok(0);
        }
        let span = tiering_span!(project);
        let _guard = span.enter();

        let observations = self.store.get_non_deprecated_observations(project)?;
        let now = Utc::now();
        let mut updated = 0;
        for observation in &observations {
            let classification = classify_at(observation, config, now);
            match self.apply(&classification) {
                Ok(true) => updated += 1,
                Ok(false) => {}
                Err(e) => error!(
                    observation_id = observation.id,
                    error = %e,
                    "failed to update memory tier"
                ),
            }
        }
        info!(
            project,
            evaluated = observations.len(),
            updated,
            "memory tiers reclassified"
        );
        Ok(updated)
    }

    pub fn by_tier(
        &self,
        project: &str,
        tier: MemoryTier,
        limit: usize,
    ) -> ReverieResult<Vec<Observation>> {
        self.store.get_observations_by_memory_tier(project, tier, limit)
    }

    pub fn stats(&self, project: &str) -> ReverieResult<TierStats> {
        self.store.memory_tier_counts(project)
    }

    pub fn increment_reference_count(&self, id: ObservationId) -> ReverieResult<bool> {
        self.store.increment_reference_count(id, Utc::now())
    }

    pub fn update_last_accessed(&self, id: ObservationId) -> ReverieResult<bool> {
        self.store.update_last_accessed(id, Utc::now())
    }
}
