//! Supersession and deprecation writes.

use std::sync::Arc;

use reverie_consolidation::ConsolidationEngine;
use reverie_core::config::ReverieConfig;
use reverie_core::models::{ApplyOutcome, SupersessionCandidate};
use reverie_core::observation::{Observation, ObservationType};
use reverie_core::traits::IObservationStore;
use reverie_storage::StorageEngine;
use test_fixtures::ObservationBuilder;

fn setup() -> (Arc<StorageEngine>, ConsolidationEngine) {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = ConsolidationEngine::new(ReverieConfig::default(), storage.clone());
    (storage, engine)
}

fn parser(id: i64, hours_ago: f64) -> Observation {
    ObservationBuilder::new(id, ObservationType::Bugfix)
        .title("Fixed parser bug")
        .concepts(&["parser", "tokenizer"])
        .files_modified(&["src/parser.rs"])
        .hours_ago(hours_ago)
        .build()
}

fn candidate(engine: &ConsolidationEngine, older: &Observation, newer: &Observation) -> SupersessionCandidate {
    engine.check_supersession_pair(older, newer).unwrap()
}

#[test]
fn applying_twice_keeps_the_first_link() {
    let (store, engine) = setup();
    let (a, b, c) = (parser(1, 6.0), parser(2, 4.0), parser(3, 2.0));
    for obs in [&a, &b, &c] {
        store.insert(obs).unwrap();
    }

    let first = candidate(&engine, &a, &b);
    assert_eq!(engine.apply_supersession(&first, false), ApplyOutcome::Applied);
    assert_eq!(engine.apply_supersession(&first, false), ApplyOutcome::AlreadySuperseded);

    let competing = candidate(&engine, &a, &c);
    assert_eq!(engine.apply_supersession(&competing, false), ApplyOutcome::AlreadySuperseded);
    assert_eq!(store.get(1).unwrap().unwrap().superseded_by, Some(2));
}

#[test]
fn dry_run_writes_nothing() {
    let (store, engine) = setup();
    let (a, b) = (parser(1, 6.0), parser(2, 4.0));
    store.insert(&a).unwrap();
    store.insert(&b).unwrap();

    let c = candidate(&engine, &a, &b);
    assert_eq!(engine.apply_supersession(&c, true), ApplyOutcome::DryRun);
    assert!(store.get(1).unwrap().unwrap().superseded_by.is_none());
}

#[test]
fn missing_target_fails() {
    let (_store, engine) = setup();
    let c = candidate(&engine, &parser(1, 6.0), &parser(2, 4.0));
    let outcome = engine.apply_supersession(&c, false);
    assert_eq!(outcome, ApplyOutcome::Failed);
    assert!(!outcome.is_success());
}

#[test]
fn deprecate_sets_all_fields() {
    let (store, engine) = setup();
    store.insert(&parser(1, 6.0)).unwrap();

    assert!(engine.deprecate_observation(1, "obsolete"));
    let obs = store.get(1).unwrap().unwrap();
    assert!(obs.deprecated);
    assert!(obs.deprecated_at.is_some());
    assert_eq!(obs.deprecation_reason.as_deref(), Some("obsolete"));

    assert!(!engine.deprecate_observation(42, "missing"));
}

#[test]
fn old_superseded_rows_are_deprecated() {
    let (store, engine) = setup();
    store
        .insert(&ObservationBuilder::new(1, ObservationType::Change).days_ago(200.0).superseded_by(2).build())
        .unwrap();
    store
        .insert(&ObservationBuilder::new(2, ObservationType::Change).days_ago(10.0).superseded_by(3).build())
        .unwrap();
    store
        .insert(&ObservationBuilder::new(3, ObservationType::Change).days_ago(300.0).build())
        .unwrap();

    assert_eq!(engine.get_superseded_observations("test", 10).unwrap().len(), 2);

    // Dry run counts without writing.
    assert_eq!(engine.deprecate_old_superseded(Some("test"), 180, true).unwrap(), 1);
    assert!(!store.get(1).unwrap().unwrap().deprecated);

    assert_eq!(engine.deprecate_old_superseded(None, 180, false).unwrap(), 1);
    let old = store.get(1).unwrap().unwrap();
    assert!(old.deprecated);
    assert_eq!(
        old.deprecation_reason.as_deref(),
        Some("Superseded for more than 180 days")
    );
    assert!(!store.get(2).unwrap().unwrap().deprecated);
    assert!(!store.get(3).unwrap().unwrap().deprecated);
    let pending = engine.get_superseded_observations("test", 10).unwrap();
    assert_eq!(pending.iter().map(|o| o.id).collect::<Vec<_>>(), vec![2]);

    // Already deprecated rows are not picked up again.
    assert_eq!(engine.deprecate_old_superseded(None, 180, false).unwrap(), 0);
}

#[test]
fn unbounded_deprecation_window_matches_nothing() {
    let (store, engine) = setup();
    store
        .insert(&ObservationBuilder::new(1, ObservationType::Change).days_ago(5000.0).superseded_by(2).build())
        .unwrap();

    assert_eq!(engine.deprecate_old_superseded(None, u32::MAX, false).unwrap(), 0);
    assert_eq!(engine.deprecate_old_superseded(Some("test"), u32::MAX, true).unwrap(), 0);
    assert!(!store.get(1).unwrap().unwrap().deprecated);
}
