use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One coefficient per feature plus a bias term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub semantic_similarity: f64,
    pub topic_match: f64,
    pub file_overlap: f64,
    pub type_match: f64,
    /// Applied (negated) to the normalised time delta.
    pub time_decay: f64,
    /// Applied to the newer observation's priority.
    pub priority_boost: f64,
    /// Applied (negated) to the normalised older reference count.
    pub reference_decay: f64,
    pub bias: f64,
}

impl FeatureWeights {
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|w| w.is_finite())
    }

    /// Clip every coefficient to [-max, max].
    pub fn clipped(mut self, max: f64) -> Self {
        for w in self.iter_mut() {
            *w = w.clamp(-max, max);
        }
        self
    }

    pub fn as_array(&self) -> [f64; 8] {
        [
            self.semantic_similarity,
            self.topic_match,
            self.file_overlap,
            self.type_match,
            self.time_decay,
            self.priority_boost,
            self.reference_decay,
            self.bias,
        ]
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        [
            &mut self.semantic_similarity,
            &mut self.topic_match,
            &mut self.file_overlap,
            &mut self.type_match,
            &mut self.time_decay,
            &mut self.priority_boost,
            &mut self.reference_decay,
            &mut self.bias,
        ]
        .into_iter()
    }
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            semantic_similarity: 0.4,
            topic_match: 0.2,
            file_overlap: 0.2,
            type_match: 0.2,
            time_decay: 0.0,
            priority_boost: 0.0,
            reference_decay: 0.0,
            bias: 0.0,
        }
    }
}

/// A persisted weight row. Only the most recent row is authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelWeights {
    pub weights: FeatureWeights,
    pub examples_used: usize,
    /// Mean binary cross-entropy on the training set.
    pub loss: f64,
    /// Classification accuracy on the training set.
    pub accuracy: f64,
    pub trained_at: DateTime<Utc>,
}

impl ModelWeights {
    /// A row with no examples behind it (e.g. written by a reset) never counts as learned.
    pub fn is_learned(&self) -> bool {
        self.examples_used > 0
    }
}
