//! Property tests: detection output respects pair ordering, thresholds, and ranking.

use std::collections::HashMap;
use std::sync::Arc;

use proptest::prelude::*;

use reverie_consolidation::algorithms::ranking::compare_candidates;
use reverie_consolidation::ConsolidationEngine;
use reverie_core::config::ReverieConfig;
use reverie_core::observation::{Observation, ObservationType};
use reverie_core::traits::IObservationStore;
use reverie_storage::StorageEngine;
use test_fixtures::ObservationBuilder;

const TYPES: [ObservationType; 3] = [
    ObservationType::Bugfix,
    ObservationType::Discovery,
    ObservationType::Feature,
];
const CONCEPTS: [&str; 4] = ["parser", "cache", "auth", "ci"];

fn observation_set() -> impl Strategy<Value = Vec<(usize, Vec<usize>, u32)>> {
    prop::collection::vec(
        (0..TYPES.len(), prop::collection::vec(0..CONCEPTS.len(), 1..3), 0u32..200),
        2..8,
    )
}

fn build(specs: &[(usize, Vec<usize>, u32)]) -> Vec<Observation> {
    specs
        .iter()
        .enumerate()
        .map(|(i, (ty, concepts, hours))| {
            let names: Vec<&str> = concepts.iter().map(|c| CONCEPTS[*c]).collect();
            ObservationBuilder::new(i as i64 + 1, TYPES[*ty])
                .title("Observation title")
                .concepts(&names)
                .hours_ago(f64::from(*hours))
                .build()
        })
        .collect()
}

fn detect(config: ReverieConfig, observations: &[Observation]) -> Vec<(i64, i64, f64)> {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    for obs in observations {
        storage.insert(obs).unwrap();
    }
    let engine = ConsolidationEngine::new(config, storage);
    let result = engine.detect_batch("test", 30, 100).unwrap();
    assert!(result
        .candidates
        .windows(2)
        .all(|w| compare_candidates(&w[0], &w[1]).is_le()));
    result
        .candidates
        .iter()
        .map(|c| (c.older_id, c.newer_id, c.confidence))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_candidates_respect_pair_rules(specs in observation_set()) {
        let observations = build(&specs);
        let by_id: HashMap<i64, &Observation> = observations.iter().map(|o| (o.id, o)).collect();
        let config = ReverieConfig::default();

        for (older_id, newer_id, confidence) in detect(config.clone(), &observations) {
            let older = by_id[&older_id];
            let newer = by_id[&newer_id];
            prop_assert!(newer_id > older_id);
            prop_assert!(newer.created_at > older.created_at);
            prop_assert_eq!(older.observation_type, newer.observation_type);
            let threshold = config.priority.adjusted_threshold(
                config.supersession.min_confidence,
                config.priority.weights.weight(newer.observation_type),
            );
            prop_assert!(confidence >= threshold);
        }
    }

    #[test]
    fn prop_parallel_matches_sequential(specs in observation_set()) {
        let observations = build(&specs);
        let mut sequential = ReverieConfig::default();
        sequential.supersession.parallel_evaluation = false;
        prop_assert_eq!(
            detect(ReverieConfig::default(), &observations),
            detect(sequential, &observations)
        );
    }
}
