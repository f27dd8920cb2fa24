use serde::{Deserialize, Serialize};

/// Which weight set produced a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightSource {
    Fixed,
    Learned,
}

impl WeightSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightSource::Fixed => "fixed",
            WeightSource::Learned => "learned",
        }
    }
}

/// Per-feature additive contributions to the logit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureContributions {
    pub semantic_similarity: f64,
    pub topic_match: f64,
    pub file_overlap: f64,
    pub type_match: f64,
    pub time_decay: f64,
    pub priority_boost: f64,
    pub reference_decay: f64,
    pub bias: f64,
}

impl FeatureContributions {
    pub fn logit(&self) -> f64 {
        self.semantic_similarity
            + self.topic_match
            + self.file_overlap
            + self.type_match
            + self.time_decay
            + self.priority_boost
            + self.reference_decay
            + self.bias
    }
}

/// Output of the confidence model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Supersession confidence in (0, 1).
    pub confidence: f64,
    pub source: WeightSource,
    pub contributions: FeatureContributions,
}

impl Prediction {
    pub fn using_learned_weights(&self) -> bool {
        self.source == WeightSource::Learned
    }
}
