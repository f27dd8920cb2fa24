use crate::errors::ReverieResult;
use crate::models::{SimilarityFilter, SimilarityMatches};

/// Vector-similarity search over observation text.
///
/// Implementations enforce their own timeout and report it as
/// `SimilarityError::Timeout`.
pub trait ISimilarityProvider: Send + Sync {
    /// Nearest neighbours of `text`, closest first.
    fn query_similar(
        &self,
        text: &str,
        top_k: usize,
        filter: &SimilarityFilter,
    ) -> ReverieResult<SimilarityMatches>;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Whether this provider is currently available.
    fn is_available(&self) -> bool;
}
