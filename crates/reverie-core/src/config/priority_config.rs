use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::MIN_ADJUSTED_THRESHOLD;
use crate::priority::PriorityWeights;

/// Type-priority handling during detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityConfig {
    pub enabled: bool,
    /// How far a high-priority newer observation lowers the acceptance threshold.
    pub confidence_boost_factor: f64,
    /// Process high-priority observations first.
    pub priority_ordering: bool,
    pub weights: PriorityWeights,
}

impl PriorityConfig {
    /// Acceptance threshold for a candidate whose newer side has `priority`.
    pub fn adjusted_threshold(&self, min_confidence: f64, priority: f64) -> f64 {
        if !self.enabled {
            return min_confidence;
        }
        (min_confidence - priority * self.confidence_boost_factor).max(MIN_ADJUSTED_THRESHOLD)
    }

    pub fn orders_by_priority(&self) -> bool {
        self.enabled && self.priority_ordering
    }
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_PRIORITY_ENABLED,
            confidence_boost_factor: defaults::DEFAULT_CONFIDENCE_BOOST_FACTOR,
            priority_ordering: defaults::DEFAULT_PRIORITY_ORDERING,
            weights: PriorityWeights::default(),
        }
    }
}
