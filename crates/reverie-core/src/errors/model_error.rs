/// Confidence-model errors.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("training produced non-finite weights after {examples} examples")]
    DegenerateWeights { examples: usize },

    #[error("feature vector rejected: {reason}")]
    InvalidFeatures { reason: String },
}
