//! Evaluation of one (older, newer) pair: gates, features, prediction, reason.

use reverie_core::config::SupersessionConfig;
use reverie_core::models::{FeatureVector, Prediction, SupersessionCandidate};
use reverie_core::observation::Observation;
use reverie_core::priority::{PriorityTier, PriorityWeights};
use reverie_learning::{extract_features, SupersessionModel};

use crate::algorithms::similarity::SimilarityScorer;

const HIGH_SIMILARITY: f64 = 0.8;
const MODERATE_SIMILARITY: f64 = 0.7;
const SIGNIFICANT_FILE_OVERLAP: f64 = 0.5;

/// Everything needed to score a pair within one pass.
pub struct PairEvaluator<'a> {
    pub config: &'a SupersessionConfig,
    pub priorities: &'a PriorityWeights,
    pub model: &'a SupersessionModel,
    pub similarity: &'a SimilarityScorer<'a>,
}

impl PairEvaluator<'_> {
    /// Score `newer` as a replacement for `older`. No threshold is applied here.
    pub fn evaluate(&self, older: &Observation, newer: &Observation) -> Option<SupersessionCandidate> {
        if self.config.same_type_required && older.observation_type != newer.observation_type {
            return None;
        }
        if self.config.same_project_required && older.project != newer.project {
            return None;
        }
        if newer.hours_after(older).abs() > self.config.max_age_difference_hours {
            return None;
        }

        let semantic_similarity = self.similarity.score(older, newer);
        if semantic_similarity < self.config.min_semantic_similarity {
            return None;
        }

        let features = extract_features(older, newer, semantic_similarity, self.priorities);
        let (priority, priority_tier) = self.priorities.lookup(newer.observation_type);
        let prediction = self.model.predict(&features);
        let reason = build_reason(&features, &prediction, newer, priority_tier);

        Some(SupersessionCandidate {
            older_id: older.id,
            newer_id: newer.id,
            confidence: prediction.confidence,
            reason,
            semantic_similarity: features.semantic_similarity,
            topic_match: features.topic_match,
            file_overlap: features.file_overlap,
            older_type: older.observation_type,
            newer_type: newer.observation_type,
            priority,
            priority_tier,
            features,
            weight_source: prediction.source,
        })
    }
}

/// Comma-joined list of the signals behind a candidate.
pub fn build_reason(
    features: &FeatureVector,
    prediction: &Prediction,
    newer: &Observation,
    priority_tier: PriorityTier,
) -> String {
    let mut parts = vec![format!("method: {}", prediction.source.as_str())];

    if features.semantic_similarity >= HIGH_SIMILARITY {
        parts.push("high semantic similarity".to_string());
    } else if features.semantic_similarity >= MODERATE_SIMILARITY {
        parts.push("moderate semantic similarity".to_string());
    }
    if features.topic_match {
        parts.push("matching topics/concepts".to_string());
    }
    if features.file_overlap >= SIGNIFICANT_FILE_OVERLAP {
        parts.push("overlapping files".to_string());
    }
    if features.type_match >= 1.0 {
        parts.push(format!("same type ({})", newer.observation_type.as_str()));
    }
    match priority_tier {
        PriorityTier::Critical => parts.push("critical priority".to_string()),
        PriorityTier::High => parts.push("high priority".to_string()),
        PriorityTier::Medium | PriorityTier::Low => {}
    }

    parts.join(", ")
}
