//! Semantic similarity for a pair, from a provider when one answers, else the text heuristic.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::debug;

use reverie_core::constants::MISSING_DISTANCE;
use reverie_core::models::{SimilarityFilter, SimilarityMatches};
use reverie_core::observation::Observation;
use reverie_core::traits::ISimilarityProvider;
use reverie_learning::text_similarity;

/// Map a provider distance in [0, 2] to a similarity in [0, 1].
pub fn distance_to_similarity(distance: f64) -> f64 {
    (1.0 - distance / 2.0).clamp(0.0, 1.0)
}

/// `None` records a failed query so the pass falls back without asking again.
type MemoSlot = Arc<OnceLock<Option<SimilarityMatches>>>;

/// Provider answers for one detection pass, keyed by the hash of the query text.
///
/// Each distinct text is sent to the provider at most once, even when pairs are
/// evaluated concurrently.
#[derive(Default)]
pub struct QueryMemo {
    slots: Mutex<HashMap<blake3::Hash, MemoSlot>>,
}

impl QueryMemo {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, text: &str) -> MemoSlot {
        let key = blake3::hash(text.as_bytes());
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.entry(key).or_default().clone()
    }

    /// Number of distinct texts queried so far.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Scores pair similarity for one pass.
pub struct SimilarityScorer<'a> {
    provider: Option<&'a dyn ISimilarityProvider>,
    top_k: usize,
    filter: SimilarityFilter,
    memo: QueryMemo,
}

impl<'a> SimilarityScorer<'a> {
    pub fn new(provider: Option<&'a dyn ISimilarityProvider>, top_k: usize) -> Self {
        Self {
            provider,
            top_k,
            filter: SimilarityFilter::observations(),
            memo: QueryMemo::new(),
        }
    }

    /// Similarity of `older` to `newer` in [0, 1].
    ///
    /// Never fails: a provider error falls back to the text heuristic.
    pub fn score(&self, older: &Observation, newer: &Observation) -> f64 {
        let Some(provider) = self.provider.filter(|p| p.is_available()) else {
            return text_similarity(older, newer);
        };
        let Some(text) = newer.query_text() else {
            return 0.0;
        };

        let slot = self.memo.slot(text);
        let answer = slot.get_or_init(|| {
            match provider.query_similar(text, self.top_k, &self.filter) {
                Ok(matches) => Some(matches),
                Err(e) => {
                    debug!(
                        provider = provider.name(),
                        newer_id = newer.id,
                        error = %e,
                        "similarity query failed, using text heuristic"
                    );
                    None
                }
            }
        });

        match answer {
            Some(matches) => matches
                .distance_of(older.id, MISSING_DISTANCE)
                .map(distance_to_similarity)
                .unwrap_or(0.0),
            None => text_similarity(older, newer),
        }
    }

    pub fn memo(&self) -> &QueryMemo {
        &self.memo
    }
}
