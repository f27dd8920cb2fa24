//! Observation-type priority table and tier buckets.
//!
//! bugfix 1.0, decision 0.9, feature 0.7, refactor 0.6, change 0.5,
//! handoff 0.5, discovery 0.4. Tiers: >=0.9 critical, >=0.7 high,
//! >=0.5 medium, otherwise low.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::observation::ObservationType;

/// Coarse priority bucket. Ordered so that `Critical` sorts highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    Low,
    Medium,
    High,
    Critical,
}

impl PriorityTier {
    pub const ALL: [PriorityTier; 4] = [
        PriorityTier::Critical,
        PriorityTier::High,
        PriorityTier::Medium,
        PriorityTier::Low,
    ];

    /// Bucket a priority weight.
    pub fn from_weight(weight: f64) -> Self {
        if weight >= 0.9 {
            PriorityTier::Critical
        } else if weight >= 0.7 {
            PriorityTier::High
        } else if weight >= 0.5 {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::Low => "low",
            PriorityTier::Medium => "medium",
            PriorityTier::High => "high",
            PriorityTier::Critical => "critical",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-type priority weights in [0, 1]. Higher consolidates sooner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityWeights {
    pub bugfix: f64,
    pub decision: f64,
    pub feature: f64,
    pub refactor: f64,
    pub change: f64,
    pub handoff: f64,
    pub discovery: f64,
}

impl PriorityWeights {
    /// Priority weight for an observation type, clamped to [0, 1].
    pub fn weight(&self, observation_type: ObservationType) -> f64 {
        let w = match observation_type {
            ObservationType::Bugfix => self.bugfix,
            ObservationType::Decision => self.decision,
            ObservationType::Feature => self.feature,
            ObservationType::Refactor => self.refactor,
            ObservationType::Change => self.change,
            ObservationType::Handoff => self.handoff,
            ObservationType::Discovery => self.discovery,
        };
        w.clamp(0.0, 1.0)
    }

    /// Weight and bucket together.
    pub fn lookup(&self, observation_type: ObservationType) -> (f64, PriorityTier) {
        let w = self.weight(observation_type);
        (w, PriorityTier::from_weight(w))
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self {
            bugfix: 1.0,
            decision: 0.9,
            feature: 0.7,
            refactor: 0.6,
            change: 0.5,
            handoff: 0.5,
            discovery: 0.4,
        }
    }
}
