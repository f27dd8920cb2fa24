use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::weights::FeatureWeights;
use crate::config::LearnedModelConfig;

/// Snapshot of the confidence model's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnedModelStats {
    pub config: LearnedModelConfig,
    /// Learned weights if any, otherwise the configured defaults.
    pub weights: FeatureWeights,
    pub using_learned_weights: bool,
    pub examples_collected: usize,
    pub total_examples_seen: u64,
    pub last_trained_at: Option<DateTime<Utc>>,
    /// Persisted examples recorded in the last 30 days.
    pub recent_examples: usize,
}
