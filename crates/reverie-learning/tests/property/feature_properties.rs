//! Property tests: symmetric overlaps, bounded features, bounded confidence.

use proptest::prelude::*;

use reverie_core::config::LearnedModelConfig;
use reverie_core::models::FeatureVector;
use reverie_learning::features::{concept_jaccard, file_overlap, title_word_overlap};
use reverie_learning::SupersessionModel;

fn words() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("(\\./)?[a-zA-Z/]{1,10}", 0..6)
}

proptest! {
    #[test]
    fn prop_file_overlap_symmetric(a in words(), b in words()) {
        let ab = file_overlap(&a, &b);
        prop_assert!((ab - file_overlap(&b, &a)).abs() < 1e-12);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    #[test]
    fn prop_concept_jaccard_symmetric(a in words(), b in words()) {
        let ab = concept_jaccard(&a, &b);
        prop_assert!((ab - concept_jaccard(&b, &a)).abs() < 1e-12);
        prop_assert!((0.0..=1.0).contains(&ab));
    }

    #[test]
    fn prop_title_overlap_bounded(a in "[a-z ]{0,40}", b in "[a-z ]{0,40}") {
        let s = title_word_overlap(Some(&a), Some(&b));
        prop_assert!((0.0..=1.0).contains(&s));
        prop_assert!((s - title_word_overlap(Some(&b), Some(&a))).abs() < 1e-12);
    }

    #[test]
    fn prop_confidence_in_open_unit_interval(
        sim in 0.0f64..=1.0,
        topic in any::<bool>(),
        overlap in 0.0f64..=1.0,
        hours in 0.0f64..10_000.0,
        priority in 0.0f64..=1.0,
        refs in 0u64..1_000,
    ) {
        let model = SupersessionModel::new(LearnedModelConfig::default());
        let p = model.predict(&FeatureVector {
            semantic_similarity: sim,
            topic_match: topic,
            file_overlap: overlap,
            type_match: 1.0,
            time_delta_hours: hours,
            priority_score: priority,
            older_reference_count: refs,
        });
        prop_assert!(p.confidence > 0.0 && p.confidence < 1.0);
    }
}
