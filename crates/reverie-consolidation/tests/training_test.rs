//! Feedback collection, bootstrapping, training, and reset through the engine.

use std::sync::Arc;

use reverie_consolidation::ConsolidationEngine;
use reverie_core::config::ReverieConfig;
use reverie_core::models::{FeatureVector, SupersessionCandidate, WeightSource};
use reverie_core::observation::{Observation, ObservationType};
use reverie_core::traits::{IModelStore, IObservationStore};
use reverie_storage::StorageEngine;
use test_fixtures::ObservationBuilder;

fn setup(config: ReverieConfig) -> (Arc<StorageEngine>, ConsolidationEngine) {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = ConsolidationEngine::with_storage(config, storage.clone()).unwrap();
    (storage, engine)
}

fn parser(id: i64, hours_ago: f64) -> Observation {
    ObservationBuilder::new(id, ObservationType::Bugfix)
        .title("Fixed parser bug")
        .concepts(&["parser"])
        .files_modified(&["src/parser.rs"])
        .hours_ago(hours_ago)
        .build()
}

fn weak(mut candidate: SupersessionCandidate) -> SupersessionCandidate {
    candidate.features = FeatureVector {
        semantic_similarity: 0.1,
        topic_match: false,
        file_overlap: 0.0,
        type_match: 0.0,
        time_delta_hours: 600.0,
        priority_score: 0.4,
        older_reference_count: 8,
    };
    candidate.confidence = 0.3;
    candidate
}

fn record_feedback(engine: &ConsolidationEngine, n: usize) {
    let positive = engine
        .check_supersession_pair(&parser(1, 4.0), &parser(2, 2.0))
        .unwrap();
    for i in 0..n {
        if i % 2 == 0 {
            assert!(engine.record_training_example(&positive, true));
        } else {
            assert!(engine.record_training_example(&weak(positive.clone()), false));
        }
    }
}

#[test]
fn training_without_examples_changes_nothing() {
    let (storage, engine) = setup(ReverieConfig::default());
    let row = engine.train_learned_model().unwrap();
    assert_eq!(row.examples_used, 0);
    assert!(row.weights.is_finite());
    assert!(storage.latest_model_weights().unwrap().is_none());
}

#[test]
fn trained_weights_take_over_and_survive_restart() {
    let mut config = ReverieConfig::default();
    config.learned_model.enabled = true;
    let (storage, engine) = setup(config.clone());

    record_feedback(&engine, 60);
    let row = engine.train_learned_model().unwrap();
    assert_eq!(row.examples_used, 60);
    assert!(engine.model().is_using_learned_weights());

    let stats = engine.get_learned_model_stats().unwrap();
    assert!(stats.using_learned_weights);
    assert_eq!(stats.examples_collected, 60);
    assert_eq!(stats.recent_examples, 60);
    assert!(stats.last_trained_at.is_some());

    let candidate = engine
        .check_supersession_pair(&parser(1, 4.0), &parser(2, 2.0))
        .unwrap();
    assert_eq!(candidate.weight_source, WeightSource::Learned);
    assert!(candidate.reason.starts_with("method: learned"));

    let restarted = ConsolidationEngine::with_storage(config, storage).unwrap();
    assert!(restarted.model().is_using_learned_weights());
    assert_eq!(restarted.get_learned_model_stats().unwrap().examples_collected, 60);
}

#[test]
fn too_few_examples_fall_back_to_fixed_weights() {
    let mut config = ReverieConfig::default();
    config.learned_model.enabled = true;
    let (_storage, engine) = setup(config);

    record_feedback(&engine, 10);
    assert_eq!(engine.train_learned_model().unwrap().examples_used, 10);
    assert!(!engine.model().is_using_learned_weights());
}

#[test]
fn disabling_the_model_restores_fixed_weights() {
    let mut config = ReverieConfig::default();
    config.learned_model.enabled = true;
    let (_storage, engine) = setup(config);
    record_feedback(&engine, 60);
    engine.train_learned_model().unwrap();

    engine.set_learned_model_enabled(false);
    assert!(!engine.model().is_using_learned_weights());
    engine.set_learned_model_enabled(true);
    assert!(engine.model().is_using_learned_weights());
}

#[test]
fn reset_persists_default_weights() {
    let mut config = ReverieConfig::default();
    config.learned_model.enabled = true;
    let (storage, engine) = setup(config.clone());
    record_feedback(&engine, 60);
    engine.train_learned_model().unwrap();

    engine.reset_learned_model().unwrap();
    assert!(!engine.model().is_using_learned_weights());
    assert_eq!(engine.get_learned_model_stats().unwrap().examples_collected, 0);
    assert_eq!(storage.latest_model_weights().unwrap().unwrap().examples_used, 0);

    let restarted = ConsolidationEngine::with_storage(config, storage).unwrap();
    assert!(!restarted.model().is_using_learned_weights());
}

#[test]
fn collection_can_be_switched_off() {
    let mut config = ReverieConfig::default();
    config.learned_model.enabled = false;
    config.learned_model.always_collect_data = false;
    let (_storage, engine) = setup(config);

    let candidate = engine
        .check_supersession_pair(&parser(1, 4.0), &parser(2, 2.0))
        .unwrap();
    assert!(!engine.record_training_example(&candidate, true));
}

#[test]
fn existing_supersessions_bootstrap_positive_examples() {
    let (storage, engine) = setup(ReverieConfig::default());
    let mut older = parser(1, 4.0);
    older.superseded_by = Some(2);
    storage.insert(&older).unwrap();
    storage.insert(&parser(2, 2.0)).unwrap();
    storage
        .insert(&ObservationBuilder::new(3, ObservationType::Discovery).title("unrelated").build())
        .unwrap();

    assert_eq!(
        engine
            .generate_training_data_from_existing_supersessions(None, 100)
            .unwrap(),
        1
    );

    let examples = storage.recent_training_examples(10).unwrap();
    assert_eq!(examples.len(), 1);
    assert!(examples[0].label);
    assert_eq!((examples[0].older_id, examples[0].newer_id), (1, 2));
    assert!((examples[0].confidence - 0.8).abs() < 1e-12);
    assert!(examples[0].features.topic_match);
}
