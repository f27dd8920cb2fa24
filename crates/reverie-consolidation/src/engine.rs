//! ConsolidationEngine: the single entry point the scheduler and hooks call.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use reverie_core::config::{PriorityConfig, ReverieConfig, SleepCycleConfig, SupersessionConfig};
use reverie_core::constants::BOOTSTRAP_EXAMPLE_CONFIDENCE;
use reverie_core::errors::ReverieResult;
use reverie_core::models::{
    ApplyOutcome, CycleSummary, LearnedModelStats, MemoryTierClassification, ModelWeights,
    SupersessionCandidate, SupersessionResult, TierStats, TrainingExample,
};
use reverie_core::observation::{MemoryTier, Observation, ObservationId};
use reverie_core::traits::{IModelStore, IObservationStore, ISimilarityProvider};
use reverie_learning::{extract_features, SupersessionModel};
use reverie_storage::StorageEngine;
use reverie_tiering::MemoryTierEngine;

use crate::algorithms::similarity::SimilarityScorer;
use crate::applier::ConsolidationApplier;
use crate::cycle;
use crate::detector::SupersessionDetector;

/// Detection, application, tiering, and the confidence model behind one facade.
///
/// Holds no cross-pass lock. The caller runs at most one pass per project at a time.
pub struct ConsolidationEngine {
    config: ReverieConfig,
    store: Arc<dyn IObservationStore>,
    model: SupersessionModel,
    tiers: MemoryTierEngine,
    applier: ConsolidationApplier,
    similarity: Option<Arc<dyn ISimilarityProvider>>,
}

impl ConsolidationEngine {
    /// An engine whose confidence model is not persisted.
    pub fn new(config: ReverieConfig, store: Arc<dyn IObservationStore>) -> Self {
        let model = SupersessionModel::new(config.learned_model.clone());
        Self::assemble(config, store, model)
    }

    /// An engine whose model loads from and appends to `model_store`.
    pub fn with_model_store(
        config: ReverieConfig,
        store: Arc<dyn IObservationStore>,
        model_store: Arc<dyn IModelStore>,
    ) -> ReverieResult<Self> {
        let model = SupersessionModel::with_store(config.learned_model.clone(), model_store)?;
        Ok(Self::assemble(config, store, model))
    }

    /// Observations and model state in one SQLite database.
    pub fn with_storage(config: ReverieConfig, storage: Arc<StorageEngine>) -> ReverieResult<Self> {
        Self::with_model_store(config, storage.clone(), storage)
    }

    /// Open the database named by `config.storage` and build an engine on it.
    pub fn open(config: ReverieConfig) -> ReverieResult<Self> {
        let storage = Arc::new(StorageEngine::open_with_config(&config.storage)?);
        Self::with_storage(config, storage)
    }

    fn assemble(
        config: ReverieConfig,
        store: Arc<dyn IObservationStore>,
        model: SupersessionModel,
    ) -> Self {
        let tiers = MemoryTierEngine::new(store.clone(), config.memory_tier.clone());
        let applier = ConsolidationApplier::new(store.clone());
        Self {
            config,
            store,
            model,
            tiers,
            applier,
            similarity: None,
        }
    }

    /// Use a vector-similarity provider instead of the text heuristic.
    pub fn with_similarity_provider(mut self, provider: Arc<dyn ISimilarityProvider>) -> Self {
        info!(provider = provider.name(), "similarity provider attached");
        self.similarity = Some(provider);
        self
    }

    pub fn config(&self) -> &ReverieConfig {
        &self.config
    }

    pub fn model(&self) -> &SupersessionModel {
        &self.model
    }

    pub(crate) fn store(&self) -> &dyn IObservationStore {
        self.store.as_ref()
    }

    pub(crate) fn tiers(&self) -> &MemoryTierEngine {
        &self.tiers
    }

    pub(crate) fn applier(&self) -> &ConsolidationApplier {
        &self.applier
    }

    pub(crate) fn detector_with<'a>(
        &'a self,
        supersession: &'a SupersessionConfig,
        priority: &'a PriorityConfig,
    ) -> SupersessionDetector<'a> {
        SupersessionDetector::new(
            self.store.as_ref(),
            supersession,
            priority,
            &self.model,
            self.similarity.as_deref(),
        )
    }

    fn detector(&self) -> SupersessionDetector<'_> {
        self.detector_with(&self.config.supersession, &self.config.priority)
    }

    // ── Detection ──

    pub fn detect_batch(
        &self,
        project: &str,
        lookback_days: u32,
        limit: usize,
    ) -> ReverieResult<SupersessionResult> {
        self.detector().detect_batch(project, lookback_days, limit)
    }

    pub fn detect_for_session(
        &self,
        session_id: &str,
        lookback_days: u32,
    ) -> ReverieResult<SupersessionResult> {
        self.detector().detect_for_session(session_id, lookback_days)
    }

    pub fn check_supersession_pair(
        &self,
        older: &Observation,
        newer: &Observation,
    ) -> Option<SupersessionCandidate> {
        self.detector().check_pair(older, newer)
    }

    // ── Application ──

    pub fn apply_supersession(&self, candidate: &SupersessionCandidate, dry_run: bool) -> ApplyOutcome {
        self.applier.apply_supersession(candidate, dry_run)
    }

    pub fn deprecate_observation(&self, id: ObservationId, reason: &str) -> bool {
        self.applier.deprecate_observation(id, reason)
    }

    pub fn get_superseded_observations(
        &self,
        project: &str,
        limit: usize,
    ) -> ReverieResult<Vec<Observation>> {
        self.applier.get_superseded_observations(project, limit)
    }

    pub fn deprecate_old_superseded(
        &self,
        project: Option<&str>,
        after_days: u32,
        dry_run: bool,
    ) -> ReverieResult<usize> {
        self.applier.deprecate_old_superseded(project, after_days, dry_run)
    }

    // ── Memory tiers ──

    pub fn classify_memory_tier(&self, observation: &Observation) -> MemoryTierClassification {
        self.tiers.classify(observation)
    }

    /// Persist a classification when it changes the tier. False, logged, on failure.
    pub fn apply_memory_tier_classification(&self, classification: &MemoryTierClassification) -> bool {
        match self.tiers.apply(classification) {
            Ok(changed) => changed,
            Err(e) => {
                error!(
                    observation_id = classification.observation_id,
                    error = %e,
                    "failed to apply memory tier"
                );
                false
            }
        }
    }

    pub fn batch_classify_memory_tiers(&self, project: &str) -> ReverieResult<usize> {
        self.tiers.batch_classify(project)
    }

    pub fn get_observations_by_memory_tier(
        &self,
        project: &str,
        tier: MemoryTier,
        limit: usize,
    ) -> ReverieResult<Vec<Observation>> {
        self.tiers.by_tier(project, tier, limit)
    }

    pub fn get_memory_tier_stats(&self, project: &str) -> ReverieResult<TierStats> {
        self.tiers.stats(project)
    }

    pub fn increment_reference_count(&self, id: ObservationId) -> ReverieResult<bool> {
        self.tiers.increment_reference_count(id)
    }

    pub fn update_last_accessed(&self, id: ObservationId) -> ReverieResult<bool> {
        self.tiers.update_last_accessed(id)
    }

    // ── Confidence model ──

    /// Record feedback on a candidate. Returns whether the example was kept.
    pub fn record_training_example(&self, candidate: &SupersessionCandidate, label: bool) -> bool {
        self.model.add_training_example(TrainingExample {
            older_id: candidate.older_id,
            newer_id: candidate.newer_id,
            features: candidate.features,
            label,
            confidence: candidate.confidence,
            created_at: Utc::now(),
        })
    }

    pub fn train_learned_model(&self) -> ReverieResult<ModelWeights> {
        self.model.train()
    }

    pub fn get_learned_model_stats(&self) -> ReverieResult<LearnedModelStats> {
        self.model.stats()
    }

    pub fn set_learned_model_enabled(&self, enabled: bool) {
        self.model.set_enabled(enabled);
    }

    pub fn reset_learned_model(&self) -> ReverieResult<()> {
        self.model.reset()
    }

    /// Seed the model with positive examples from supersessions already in the store.
    /// Returns how many examples were recorded.
    pub fn generate_training_data_from_existing_supersessions(
        &self,
        project: Option<&str>,
        limit: usize,
    ) -> ReverieResult<usize> {
        let pairs = self.store.get_supersession_pairs(project, limit)?;
        let similarity =
            SimilarityScorer::new(self.similarity.as_deref(), self.config.supersession.similarity_top_k);
        let now = Utc::now();

        let mut generated = 0;
        for (older, newer) in &pairs {
            let semantic = similarity.score(older, newer);
            let features = extract_features(older, newer, semantic, &self.config.priority.weights);
            if !features.is_finite() {
                warn!(
                    older_id = older.id,
                    newer_id = newer.id,
                    "skipping supersession pair with unusable features"
                );
                continue;
            }
            let recorded = self.model.add_training_example(TrainingExample {
                older_id: older.id,
                newer_id: newer.id,
                features,
                label: true,
                confidence: BOOTSTRAP_EXAMPLE_CONFIDENCE,
                created_at: now,
            });
            if recorded {
                generated += 1;
            } else {
                debug!(older_id = older.id, newer_id = newer.id, "training example not recorded");
            }
        }

        info!(
            project = project.unwrap_or("*"),
            pairs = pairs.len(),
            generated,
            "training data generated from existing supersessions"
        );
        Ok(generated)
    }

    // ── Sleep cycle ──

    pub fn run_cycle(
        &self,
        config: &SleepCycleConfig,
        project: Option<&str>,
    ) -> ReverieResult<CycleSummary> {
        cycle::run_cycle(self, config, project)
    }
}
