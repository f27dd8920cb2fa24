use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::FeatureWeights;

/// Online confidence-model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnedModelConfig {
    /// Use learned weights for prediction once trained.
    pub enabled: bool,
    pub learning_rate: f64,
    /// L2 regularization strength.
    pub regularization: f64,
    /// Examples a weight row must be trained on before it is used.
    pub min_examples_before_use: usize,
    /// Fall back to the default weights until enough examples exist.
    pub fallback_to_fixed: bool,
    /// Capacity of the in-memory training buffer.
    pub max_training_examples: usize,
    /// Record training examples even while disabled.
    pub always_collect_data: bool,
    /// SGD passes per `train` call.
    pub epochs: usize,
    pub default_weights: FeatureWeights,
}

impl LearnedModelConfig {
    pub fn collects_examples(&self) -> bool {
        self.enabled || self.always_collect_data
    }
}

impl Default for LearnedModelConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_LEARNED_MODEL_ENABLED,
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            regularization: defaults::DEFAULT_REGULARIZATION,
            min_examples_before_use: defaults::DEFAULT_MIN_EXAMPLES_BEFORE_USE,
            fallback_to_fixed: defaults::DEFAULT_FALLBACK_TO_FIXED,
            max_training_examples: defaults::DEFAULT_MAX_TRAINING_EXAMPLES,
            always_collect_data: defaults::DEFAULT_ALWAYS_COLLECT_DATA,
            epochs: defaults::DEFAULT_TRAINING_EPOCHS,
            default_weights: FeatureWeights::default(),
        }
    }
}
