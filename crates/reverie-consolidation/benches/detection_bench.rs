use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use reverie_consolidation::ConsolidationEngine;
use reverie_core::config::ReverieConfig;
use reverie_core::observation::ObservationType;
use reverie_core::traits::IObservationStore;
use reverie_storage::StorageEngine;
use test_fixtures::ObservationBuilder;

const CONCEPTS: [&str; 5] = ["parser", "cache", "auth", "ci", "storage"];

/// 200 observations across three types, two concepts each.
fn seeded_engine(parallel: bool) -> ConsolidationEngine {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let types = [
        ObservationType::Bugfix,
        ObservationType::Feature,
        ObservationType::Discovery,
    ];
    for i in 0..200i64 {
        let idx = i as usize;
        storage
            .insert(
                &ObservationBuilder::new(i + 1, types[idx % types.len()])
                    .title(&format!("Observation {i} about {}", CONCEPTS[idx % CONCEPTS.len()]))
                    .concepts(&[CONCEPTS[idx % CONCEPTS.len()], CONCEPTS[(idx / 7) % CONCEPTS.len()]])
                    .hours_ago(400.0 - i as f64)
                    .build(),
            )
            .unwrap();
    }
    let mut config = ReverieConfig::default();
    config.supersession.parallel_evaluation = parallel;
    ConsolidationEngine::new(config, storage)
}

fn bench_detect_batch(c: &mut Criterion) {
    let sequential = seeded_engine(false);
    c.bench_function("detect_batch_200_sequential", |b| {
        b.iter(|| sequential.detect_batch("test", 30, 200).unwrap());
    });

    let parallel = seeded_engine(true);
    c.bench_function("detect_batch_200_parallel", |b| {
        b.iter(|| parallel.detect_batch("test", 30, 200).unwrap());
    });
}

criterion_group!(benches, bench_detect_batch);
criterion_main!(benches);
