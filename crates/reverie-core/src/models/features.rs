use serde::{Deserialize, Serialize};

use crate::constants::{REFERENCE_COUNT_CAP, TIME_DELTA_CAP_HOURS};

/// Numeric summary of a candidate (older, newer) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Semantic similarity in [0, 1].
    pub semantic_similarity: f64,
    /// Whether the concept sets intersect.
    pub topic_match: bool,
    /// Jaccard overlap of modified files in [0, 1].
    pub file_overlap: f64,
    /// 1.0 for identical types, 0.0 otherwise.
    pub type_match: f64,
    /// Hours from older to newer creation.
    pub time_delta_hours: f64,
    /// Priority weight of the newer observation.
    pub priority_score: f64,
    /// Reference count of the older observation.
    pub older_reference_count: u64,
}

impl FeatureVector {
    pub fn topic_match_value(&self) -> f64 {
        if self.topic_match {
            1.0
        } else {
            0.0
        }
    }

    /// log1p-scaled time delta, capped at 30 days, in [0, 1].
    pub fn normalized_time_delta(&self) -> f64 {
        let cap = TIME_DELTA_CAP_HOURS.ln_1p();
        self.time_delta_hours.max(0.0).ln_1p().min(cap) / cap
    }

    /// log1p-scaled reference count, capped at 10, in [0, 1].
    pub fn normalized_reference_count(&self) -> f64 {
        let cap = REFERENCE_COUNT_CAP.ln_1p();
        (self.older_reference_count as f64).ln_1p().min(cap) / cap
    }

    pub fn is_finite(&self) -> bool {
        self.semantic_similarity.is_finite()
            && self.file_overlap.is_finite()
            && self.type_match.is_finite()
            && self.time_delta_hours.is_finite()
            && self.priority_score.is_finite()
    }
}
