//! Supersession detection.
//!
//! Batch and session detection share one pairwise core. The two entry points
//! only differ in which observations play "older" and "newer" and in the
//! ordering rule a pair must satisfy.

pub mod pair;

use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use tracing::debug;

use reverie_core::config::{PriorityConfig, SupersessionConfig};
use reverie_core::errors::ReverieResult;
use reverie_core::models::{SupersessionCandidate, SupersessionResult};
use reverie_core::observation::Observation;
use reverie_core::traits::{IObservationStore, ISimilarityProvider};
use reverie_learning::SupersessionModel;
use reverie_observability::detection_span;

use crate::algorithms::ranking::{order_for_processing, rank_candidates};
use crate::algorithms::similarity::SimilarityScorer;
use crate::algorithms::window::days_before;
use pair::PairEvaluator;

/// Which (older, newer) pairs a pass considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSelection {
    /// Every pair within one set; the newer side must be later by id and by creation time.
    Batch,
    /// Session observations against the surrounding window; only creation time must increase.
    Session,
}

impl PairSelection {
    pub fn admits(&self, older: &Observation, newer: &Observation) -> bool {
        let later = newer.created_at > older.created_at;
        match self {
            PairSelection::Batch => later && newer.id > older.id,
            PairSelection::Session => later,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PairSelection::Batch => "batch",
            PairSelection::Session => "session",
        }
    }
}

/// Detection under one configuration. Cheap to build per call.
pub struct SupersessionDetector<'a> {
    store: &'a dyn IObservationStore,
    config: &'a SupersessionConfig,
    priority: &'a PriorityConfig,
    model: &'a SupersessionModel,
    provider: Option<&'a dyn ISimilarityProvider>,
}

impl<'a> SupersessionDetector<'a> {
    pub fn new(
        store: &'a dyn IObservationStore,
        config: &'a SupersessionConfig,
        priority: &'a PriorityConfig,
        model: &'a SupersessionModel,
        provider: Option<&'a dyn ISimilarityProvider>,
    ) -> Self {
        Self {
            store,
            config,
            priority,
            model,
            provider,
        }
    }

    /// Detect supersessions among a project's active observations in the lookback window.
    pub fn detect_batch(
        &self,
        project: &str,
        lookback_days: u32,
        limit: usize,
    ) -> ReverieResult<SupersessionResult> {
        let start = Instant::now();
        let span = detection_span!(PairSelection::Batch.as_str(), project);
        let _guard = span.enter();

        let after = days_before(Utc::now(), lookback_days);
        let mut observations = self.store.get_active_observations(project, after, limit)?;
        let processed_count = observations.len();
        if processed_count < 2 {
            debug!(project, processed_count, "not enough observations to compare");
            return Ok(SupersessionResult {
                candidates: Vec::new(),
                processed_count,
                duration_ms: elapsed_ms(start),
            });
        }

        order_for_processing(&mut observations, self.priority);
        let candidates = self.run_pass(&observations, &observations, PairSelection::Batch);

        Ok(SupersessionResult {
            candidates,
            processed_count,
            duration_ms: elapsed_ms(start),
        })
    }

    /// Detect what one session's observations supersede in the surrounding window.
    pub fn detect_for_session(
        &self,
        session_id: &str,
        lookback_days: u32,
    ) -> ReverieResult<SupersessionResult> {
        let start = Instant::now();
        let span = detection_span!(PairSelection::Session.as_str(), session_id);
        let _guard = span.enter();

        let mut session = self.store.get_session_observations(session_id)?;
        let Some(project) = session.first().map(|o| o.project.clone()) else {
            debug!(session_id, "no active observations in session");
            return Ok(SupersessionResult {
                duration_ms: elapsed_ms(start),
                ..SupersessionResult::default()
            });
        };
        order_for_processing(&mut session, self.priority);

        let own: HashSet<_> = session.iter().map(|o| o.id).collect();
        let after = days_before(Utc::now(), lookback_days);
        let existing: Vec<Observation> = self
            .store
            .get_active_observations(&project, after, usize::MAX)?
            .into_iter()
            .filter(|o| !own.contains(&o.id))
            .collect();
        debug!(
            session_id,
            project = %project,
            session_count = session.len(),
            existing_count = existing.len(),
            "session detection window loaded"
        );

        let candidates = self.run_pass(&existing, &session, PairSelection::Session);

        Ok(SupersessionResult {
            candidates,
            processed_count: session.len(),
            duration_ms: elapsed_ms(start),
        })
    }

    /// Score a single pair without applying the acceptance threshold.
    pub fn check_pair(&self, older: &Observation, newer: &Observation) -> Option<SupersessionCandidate> {
        let similarity = SimilarityScorer::new(self.provider, self.config.similarity_top_k);
        self.evaluator(&similarity).evaluate(older, newer)
    }

    /// Feature-extraction access for callers that already hold a scorer, such as bootstrapping.
    pub fn evaluator<'s>(&'s self, similarity: &'s SimilarityScorer<'s>) -> PairEvaluator<'s> {
        PairEvaluator {
            config: self.config,
            priorities: &self.priority.weights,
            model: self.model,
            similarity,
        }
    }

    pub fn provider(&self) -> Option<&'a dyn ISimilarityProvider> {
        self.provider
    }

    pub fn config(&self) -> &SupersessionConfig {
        self.config
    }

    /// The pairwise core: select, evaluate, threshold, rank.
    fn run_pass(
        &self,
        older_set: &[Observation],
        newer_set: &[Observation],
        selection: PairSelection,
    ) -> Vec<SupersessionCandidate> {
        let pairs: Vec<(&Observation, &Observation)> = older_set
            .iter()
            .filter(|older| !older.is_superseded())
            .flat_map(|older| {
                newer_set
                    .iter()
                    .filter(move |newer| selection.admits(older, newer))
                    .map(move |newer| (older, newer))
            })
            .collect();

        let similarity = SimilarityScorer::new(self.provider, self.config.similarity_top_k);
        let evaluator = self.evaluator(&similarity);
        let accept = |older: &Observation, newer: &Observation| {
            evaluator.evaluate(older, newer).filter(|c| {
                c.confidence >= self.priority.adjusted_threshold(self.config.min_confidence, c.priority)
            })
        };

        let mut accepted: Vec<SupersessionCandidate> = if self.config.parallel_evaluation {
            pairs
                .par_iter()
                .filter_map(|&(older, newer)| accept(older, newer))
                .collect()
        } else {
            pairs
                .iter()
                .filter_map(|&(older, newer)| accept(older, newer))
                .collect()
        };
        rank_candidates(&mut accepted);

        debug!(
            mode = selection.as_str(),
            pairs = pairs.len(),
            accepted = accepted.len(),
            similarity_queries = similarity.memo().len(),
            "detection pass complete"
        );
        accepted
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
