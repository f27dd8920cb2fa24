use serde::{Deserialize, Serialize};

use super::defaults;

/// Gates and thresholds for supersession detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupersessionConfig {
    /// Pairs below this similarity are never candidates.
    pub min_semantic_similarity: f64,
    /// Base acceptance threshold before the priority boost.
    pub min_confidence: f64,
    pub same_type_required: bool,
    pub same_project_required: bool,
    /// Pairs created further apart than this are rejected.
    pub max_age_difference_hours: f64,
    /// How many neighbours to request from the similarity provider.
    pub similarity_top_k: usize,
    /// Evaluate pairs on the rayon pool.
    pub parallel_evaluation: bool,
}

impl Default for SupersessionConfig {
    fn default() -> Self {
        Self {
            min_semantic_similarity: defaults::DEFAULT_MIN_SEMANTIC_SIMILARITY,
            min_confidence: defaults::DEFAULT_MIN_CONFIDENCE,
            same_type_required: defaults::DEFAULT_SAME_TYPE_REQUIRED,
            same_project_required: defaults::DEFAULT_SAME_PROJECT_REQUIRED,
            max_age_difference_hours: defaults::DEFAULT_MAX_AGE_DIFFERENCE_HOURS,
            similarity_top_k: defaults::DEFAULT_SIMILARITY_TOP_K,
            parallel_evaluation: defaults::DEFAULT_PARALLEL_EVALUATION,
        }
    }
}
