use serde::{Deserialize, Serialize};

use crate::constants::OBSERVATION_DOC_TYPE;
use crate::observation::ObservationId;

/// Metadata filter passed to a similarity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityFilter {
    pub doc_type: String,
}

impl SimilarityFilter {
    pub fn observations() -> Self {
        Self {
            doc_type: OBSERVATION_DOC_TYPE.to_string(),
        }
    }
}

/// Ranked ids with distances, index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatches {
    pub ids: Vec<ObservationId>,
    pub distances: Vec<f64>,
}

impl SimilarityMatches {
    /// Distance for `id`, or `None` if it is not among the matches.
    /// A missing distance for a present id reads as `missing`.
    pub fn distance_of(&self, id: ObservationId, missing: f64) -> Option<f64> {
        let idx = self.ids.iter().position(|m| *m == id)?;
        Some(self.distances.get(idx).copied().unwrap_or(missing))
    }
}
