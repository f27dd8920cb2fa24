//! SupersessionModel: predicts supersession confidence and retrains online.

pub mod sgd;

use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use reverie_core::config::LearnedModelConfig;
use reverie_core::constants::RECENT_EXAMPLES_WINDOW_DAYS;
use reverie_core::errors::{ModelError, ReverieResult};
use reverie_core::models::{
    FeatureVector, FeatureWeights, LearnedModelStats, ModelWeights, Prediction, TrainingExample,
    WeightSource,
};
use reverie_core::traits::IModelStore;
use reverie_observability::training_span;

struct ModelState {
    config: LearnedModelConfig,
    /// Most recent weight row trained on at least one example.
    learned: Option<ModelWeights>,
    buffer: VecDeque<TrainingExample>,
    total_examples_seen: u64,
}

impl ModelState {
    fn uses_learned(&self) -> bool {
        match &self.learned {
            Some(row) if self.config.enabled => {
                row.examples_used >= self.config.min_examples_before_use
                    || !self.config.fallback_to_fixed
            }
            _ => false,
        }
    }

    fn active_weights(&self) -> (FeatureWeights, WeightSource) {
        match &self.learned {
            Some(row) if self.uses_learned() => (row.weights, WeightSource::Learned),
            _ => (self.config.default_weights, WeightSource::Fixed),
        }
    }

    /// Starting point for training and the weights reported in stats.
    fn current_weights(&self) -> FeatureWeights {
        self.learned
            .as_ref()
            .map(|row| row.weights)
            .unwrap_or(self.config.default_weights)
    }

    fn push(&mut self, example: TrainingExample) {
        let cap = self.config.max_training_examples.max(1);
        while self.buffer.len() >= cap {
            self.buffer.pop_front();
        }
        self.buffer.push_back(example);
    }
}

/// The supersession confidence model.
///
/// Predictions take a read lock; training, recording, and reset take the write lock.
pub struct SupersessionModel {
    state: RwLock<ModelState>,
    store: Option<Arc<dyn IModelStore>>,
}

impl SupersessionModel {
    /// A model without persistence.
    pub fn new(config: LearnedModelConfig) -> Self {
        Self {
            state: RwLock::new(ModelState {
                config,
                learned: None,
                buffer: VecDeque::new(),
                total_examples_seen: 0,
            }),
            store: None,
        }
    }

    /// A model backed by a store. Loads the latest weight row and warms the
    /// buffer with the most recent persisted examples.
    pub fn with_store(config: LearnedModelConfig, store: Arc<dyn IModelStore>) -> ReverieResult<Self> {
        let learned = store.latest_model_weights()?.filter(ModelWeights::is_learned);
        let warm = store.recent_training_examples(config.max_training_examples)?;
        debug!(
            learned = learned.is_some(),
            warmed = warm.len(),
            "confidence model loaded"
        );
        let model = Self {
            state: RwLock::new(ModelState {
                config,
                learned,
                buffer: VecDeque::new(),
                total_examples_seen: warm.len() as u64,
            }),
            store: Some(store),
        };
        {
            let mut state = model.write();
            for example in warm {
                state.push(example);
            }
        }
        Ok(model)
    }

    fn read(&self) -> RwLockReadGuard<'_, ModelState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ModelState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Score a feature vector.
    pub fn predict(&self, features: &FeatureVector) -> Prediction {
        let (weights, source) = self.read().active_weights();
        let contributions = sgd::contributions(features, &weights);
        Prediction {
            confidence: sgd::confidence(&contributions),
            source,
            contributions,
        }
    }

    pub fn is_using_learned_weights(&self) -> bool {
        self.read().uses_learned()
    }

    pub fn config(&self) -> LearnedModelConfig {
        self.read().config.clone()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.write().config.enabled = enabled;
        info!(enabled, "confidence model toggled");
    }

    /// Record a labelled example. Returns false when collection is off or the
    /// example fails [`validate_example`]. A persistence failure keeps the in-memory copy.
    pub fn add_training_example(&self, example: TrainingExample) -> bool {
        if let Err(e) = validate_example(&example) {
            warn!(
                older_id = example.older_id,
                newer_id = example.newer_id,
                error = %e,
                "skipping training example"
            );
            return false;
        }
        {
            let mut state = self.write();
            if !state.config.collects_examples() {
                return false;
            }
            state.push(example.clone());
            state.total_examples_seen += 1;
        }
        if let Some(store) = &self.store {
            if let Err(e) = store.append_training_example(&example) {
                warn!(
                    older_id = example.older_id,
                    newer_id = example.newer_id,
                    error = %e,
                    "failed to persist training example, keeping it in memory"
                );
            }
        }
        true
    }

    /// Retrain over the buffered examples. The new row is persisted before it
    /// becomes authoritative.
    pub fn train(&self) -> ReverieResult<ModelWeights> {
        let mut state = self.write();
        let examples: Vec<TrainingExample> = state.buffer.iter().cloned().collect();
        let span = training_span!(examples.len());
        let _guard = span.enter();

        let now = Utc::now();
        if examples.is_empty() {
            debug!("no training examples buffered");
            return Ok(ModelWeights {
                weights: state.current_weights(),
                examples_used: 0,
                loss: 0.0,
                accuracy: 0.0,
                trained_at: now,
            });
        }

        let config = &state.config;
        let weights = sgd::fit(
            state.current_weights(),
            &examples,
            config.epochs,
            config.learning_rate,
            config.regularization,
        );
        let (loss, accuracy) = sgd::evaluate(&weights, &examples);
        if !weights.is_finite() || !loss.is_finite() || !accuracy.is_finite() {
            warn!(examples = examples.len(), "training diverged, keeping previous weights");
            return Err(ModelError::DegenerateWeights {
                examples: examples.len(),
            }
            .into());
        }

        let row = ModelWeights {
            weights,
            examples_used: examples.len(),
            loss,
            accuracy,
            trained_at: now,
        };
        if let Some(store) = &self.store {
            store.append_model_weights(&row)?;
        }
        state.learned = Some(row.clone());
        info!(
            examples = row.examples_used,
            loss = row.loss,
            accuracy = row.accuracy,
            "confidence model trained"
        );
        Ok(row)
    }

    /// Drop learned weights and buffered examples. A default-weight row with no
    /// examples is persisted so the reset survives restarts.
    pub fn reset(&self) -> ReverieResult<()> {
        let mut state = self.write();
        if let Some(store) = &self.store {
            store.append_model_weights(&ModelWeights {
                weights: state.config.default_weights,
                examples_used: 0,
                loss: 0.0,
                accuracy: 0.0,
                trained_at: Utc::now(),
            })?;
        }
        state.learned = None;
        state.buffer.clear();
        state.total_examples_seen = 0;
        info!("confidence model reset to default weights");
        Ok(())
    }

    pub fn stats(&self) -> ReverieResult<LearnedModelStats> {
        let cutoff = Utc::now() - Duration::days(RECENT_EXAMPLES_WINDOW_DAYS);
        let state = self.read();
        let recent_examples = match &self.store {
            Some(store) => store.count_training_examples_since(cutoff)?,
            None => count_since(&state.buffer, cutoff),
        };
        Ok(LearnedModelStats {
            config: state.config.clone(),
            weights: state.current_weights(),
            using_learned_weights: state.uses_learned(),
            examples_collected: state.buffer.len(),
            total_examples_seen: state.total_examples_seen,
            last_trained_at: state.learned.as_ref().map(|row| row.trained_at),
            recent_examples,
        })
    }
}

fn count_since(buffer: &VecDeque<TrainingExample>, cutoff: DateTime<Utc>) -> usize {
    buffer.iter().filter(|e| e.created_at >= cutoff).count()
}

/// Reject examples whose features or confidence are not finite numbers.
pub fn validate_example(example: &TrainingExample) -> Result<(), ModelError> {
    if !example.features.is_finite() {
        return Err(ModelError::InvalidFeatures {
            reason: format!(
                "non-finite feature for pair {} -> {}",
                example.older_id, example.newer_id
            ),
        });
    }
    if !example.confidence.is_finite() {
        return Err(ModelError::InvalidFeatures {
            reason: format!("non-finite confidence {}", example.confidence),
        });
    }
    Ok(())
}
