/// Errors surfaced by an external similarity provider.
///
/// Every variant is recoverable: detection falls back to the text heuristic.
#[derive(Debug, thiserror::Error)]
pub enum SimilarityError {
    #[error("similarity provider unavailable: {provider}")]
    Unavailable { provider: String },

    #[error("similarity query timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
}
