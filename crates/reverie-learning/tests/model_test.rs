//! Confidence model: fixed vs learned weights, training, reset, persistence.

use std::sync::Arc;

use chrono::Utc;
use reverie_core::config::LearnedModelConfig;
use reverie_core::models::{FeatureVector, FeatureWeights, TrainingExample, WeightSource};
use reverie_core::observation::ObservationType;
use reverie_core::priority::PriorityWeights;
use reverie_core::traits::IModelStore;
use reverie_core::errors::ModelError;
use reverie_learning::{extract_features, validate_example, SupersessionModel};
use reverie_storage::StorageEngine;
use test_fixtures::ObservationBuilder;

fn strong() -> FeatureVector {
    FeatureVector {
        semantic_similarity: 0.95,
        topic_match: true,
        file_overlap: 1.0,
        type_match: 1.0,
        time_delta_hours: 2.0,
        priority_score: 1.0,
        older_reference_count: 0,
    }
}

fn weak() -> FeatureVector {
    FeatureVector {
        semantic_similarity: 0.1,
        topic_match: false,
        file_overlap: 0.0,
        type_match: 1.0,
        time_delta_hours: 600.0,
        priority_score: 0.4,
        older_reference_count: 8,
    }
}

fn example(i: i64, features: FeatureVector, label: bool) -> TrainingExample {
    TrainingExample {
        older_id: i,
        newer_id: i + 1000,
        features,
        label,
        confidence: 0.6,
        created_at: Utc::now(),
    }
}

fn enabled(min_examples: usize) -> LearnedModelConfig {
    LearnedModelConfig {
        enabled: true,
        min_examples_before_use: min_examples,
        ..Default::default()
    }
}

// ── prediction ──

#[test]
fn fixed_weights_score_the_parser_bugfix_pair() {
    let older = ObservationBuilder::new(1, ObservationType::Bugfix)
        .title("Fixed parser bug")
        .concepts(&["parser"])
        .files_modified(&["src/parser.rs"])
        .hours_ago(3.0)
        .build();
    let newer = ObservationBuilder::new(2, ObservationType::Bugfix)
        .title("Fixed parser bug v2")
        .concepts(&["parser"])
        .files_modified(&["src/parser.rs"])
        .hours_ago(1.0)
        .build();
    let features = extract_features(&older, &newer, 1.0, &PriorityWeights::default());
    assert!(features.topic_match);
    assert_eq!(features.file_overlap, 1.0);
    assert_eq!(features.type_match, 1.0);
    assert!((features.time_delta_hours - 2.0).abs() < 0.01);

    let prediction = SupersessionModel::new(LearnedModelConfig::default()).predict(&features);
    assert_eq!(prediction.source, WeightSource::Fixed);
    assert!(prediction.confidence >= 0.6);
    assert!((prediction.contributions.logit() - 1.0).abs() < 1e-9);
}

#[test]
fn disabled_model_ignores_learned_weights() {
    let model = SupersessionModel::new(LearnedModelConfig {
        min_examples_before_use: 1,
        ..Default::default()
    });
    for i in 0..10 {
        model.add_training_example(example(i, strong(), true));
    }
    model.train().unwrap();
    assert_eq!(model.predict(&strong()).source, WeightSource::Fixed);
    model.set_enabled(true);
    assert_eq!(model.predict(&strong()).source, WeightSource::Learned);
}

#[test]
fn learned_weights_wait_for_enough_examples() {
    let model = SupersessionModel::new(enabled(20));
    for i in 0..10 {
        model.add_training_example(example(i, strong(), true));
    }
    model.train().unwrap();
    assert!(!model.is_using_learned_weights());

    let eager = SupersessionModel::new(LearnedModelConfig {
        fallback_to_fixed: false,
        ..enabled(20)
    });
    for i in 0..10 {
        eager.add_training_example(example(i, strong(), true));
    }
    eager.train().unwrap();
    assert!(eager.is_using_learned_weights());
}

// ── training ──

#[test]
fn train_without_examples_is_a_no_op() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let model = SupersessionModel::with_store(enabled(1), store.clone()).unwrap();
    let row = model.train().unwrap();
    assert_eq!(row.examples_used, 0);
    assert!(row.loss.is_finite());
    assert!(row.accuracy.is_finite());
    assert_eq!(row.weights, FeatureWeights::default());
    assert!(store.latest_model_weights().unwrap().is_none());
}

#[test]
fn training_learns_to_separate_examples() {
    let model = SupersessionModel::new(LearnedModelConfig {
        epochs: 40,
        learning_rate: 0.1,
        ..enabled(10)
    });
    for i in 0..30 {
        let (features, label) = if i % 2 == 0 { (strong(), true) } else { (weak(), false) };
        assert!(model.add_training_example(example(i, features, label)));
    }
    let row = model.train().unwrap();
    assert_eq!(row.examples_used, 30);
    assert_eq!(row.accuracy, 1.0);
    assert!(model.predict(&strong()).confidence > 0.5);
    assert!(model.predict(&weak()).confidence < 0.5);
}

#[test]
fn buffer_is_capped() {
    let model = SupersessionModel::new(LearnedModelConfig {
        max_training_examples: 5,
        ..Default::default()
    });
    for i in 0..12 {
        model.add_training_example(example(i, strong(), true));
    }
    let stats = model.stats().unwrap();
    assert_eq!(stats.examples_collected, 5);
    assert_eq!(stats.total_examples_seen, 12);
}

#[test]
fn collection_off_when_disabled_and_not_always_collecting() {
    let model = SupersessionModel::new(LearnedModelConfig {
        always_collect_data: false,
        ..Default::default()
    });
    assert!(!model.add_training_example(example(1, strong(), true)));
    assert_eq!(model.stats().unwrap().examples_collected, 0);
}

#[test]
fn non_finite_features_are_rejected() {
    let model = SupersessionModel::new(enabled(1));
    let bad = FeatureVector {
        semantic_similarity: f64::NAN,
        ..strong()
    };
    assert!(!model.add_training_example(example(1, bad, true)));
    assert_eq!(model.stats().unwrap().examples_collected, 0);
}

#[test]
fn validation_names_the_rejected_input() {
    assert!(validate_example(&example(1, strong(), true)).is_ok());

    let bad = FeatureVector {
        time_delta_hours: f64::INFINITY,
        ..strong()
    };
    match validate_example(&example(4, bad, true)) {
        Err(ModelError::InvalidFeatures { reason }) => assert!(reason.contains("4 -> ")),
        other => panic!("unexpected validation result: {other:?}"),
    }

    let mut unsure = example(5, strong(), false);
    unsure.confidence = f64::NAN;
    let err = validate_example(&unsure).unwrap_err();
    assert!(err.to_string().contains("confidence"));
}

// ── persistence ──

#[test]
fn trained_weights_survive_restart() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    {
        let model = SupersessionModel::with_store(enabled(5), store.clone()).unwrap();
        for i in 0..8 {
            model.add_training_example(example(i, strong(), true));
        }
        model.train().unwrap();
        assert!(model.is_using_learned_weights());
    }

    let reloaded = SupersessionModel::with_store(enabled(5), store.clone()).unwrap();
    assert!(reloaded.is_using_learned_weights());
    let stats = reloaded.stats().unwrap();
    assert_eq!(stats.examples_collected, 8);
    assert_eq!(stats.recent_examples, 8);
    assert!(stats.last_trained_at.is_some());
}

#[test]
fn reset_survives_restart() {
    let store = Arc::new(StorageEngine::open_in_memory().unwrap());
    let model = SupersessionModel::with_store(enabled(1), store.clone()).unwrap();
    for i in 0..4 {
        model.add_training_example(example(i, strong(), true));
    }
    model.train().unwrap();
    model.reset().unwrap();
    assert!(!model.is_using_learned_weights());
    assert_eq!(model.stats().unwrap().examples_collected, 0);

    let latest = store.latest_model_weights().unwrap().unwrap();
    assert_eq!(latest.examples_used, 0);

    let reloaded = SupersessionModel::with_store(enabled(1), store).unwrap();
    assert!(!reloaded.is_using_learned_weights());
    assert_eq!(reloaded.predict(&strong()).source, WeightSource::Fixed);
}
