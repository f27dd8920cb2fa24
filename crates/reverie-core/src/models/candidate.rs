use serde::{Deserialize, Serialize};

use super::features::FeatureVector;
use super::prediction::WeightSource;
use crate::observation::{ObservationId, ObservationType};
use crate::priority::PriorityTier;

/// A detected "newer supersedes older" relationship, produced and consumed within one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupersessionCandidate {
    pub older_id: ObservationId,
    pub newer_id: ObservationId,
    /// Confidence in [0, 1].
    pub confidence: f64,
    /// Human-readable list of the signals that fired.
    pub reason: String,
    pub semantic_similarity: f64,
    pub topic_match: bool,
    pub file_overlap: f64,
    pub older_type: ObservationType,
    pub newer_type: ObservationType,
    /// Priority weight of the newer observation.
    pub priority: f64,
    pub priority_tier: PriorityTier,
    /// Features that produced `confidence`.
    pub features: FeatureVector,
    pub weight_source: WeightSource,
}

/// Result of one detection pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupersessionResult {
    /// Accepted candidates, priority tier descending then confidence descending.
    pub candidates: Vec<SupersessionCandidate>,
    pub processed_count: usize,
    pub duration_ms: u64,
}

/// Outcome of applying one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyOutcome {
    /// The link was written.
    Applied,
    /// The older row already had a superseder; nothing changed.
    AlreadySuperseded,
    /// Dry run, only logged.
    DryRun,
    /// The write failed and was logged.
    Failed,
}

impl ApplyOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, ApplyOutcome::Failed)
    }
}
