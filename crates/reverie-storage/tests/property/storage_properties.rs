//! Property tests: observation content survives insert → get.

use proptest::prelude::*;

use reverie_core::observation::ObservationType;
use reverie_core::traits::IObservationStore;
use reverie_storage::StorageEngine;
use test_fixtures::ObservationBuilder;

proptest! {
    #[test]
    fn prop_insert_get_preserves_lists(
        concepts in proptest::collection::vec("[a-z\\-]{1,12}", 0..6),
        files in proptest::collection::vec("[a-z/\\.]{1,24}", 0..4),
        title in "[a-zA-Z0-9 ]{1,60}",
    ) {
        let engine = StorageEngine::open_in_memory().unwrap();
        let concept_refs: Vec<&str> = concepts.iter().map(String::as_str).collect();
        let file_refs: Vec<&str> = files.iter().map(String::as_str).collect();
        let obs = ObservationBuilder::new(1, ObservationType::Discovery)
            .title(&title)
            .concepts(&concept_refs)
            .files_modified(&file_refs)
            .build();
        engine.insert(&obs).unwrap();

        let back = engine.get(1).unwrap().unwrap();
        prop_assert_eq!(back.concepts, concepts);
        prop_assert_eq!(back.files_modified, files);
        prop_assert_eq!(back.title.as_deref(), Some(title.as_str()));
    }

    #[test]
    fn prop_reference_count_only_grows(bumps in 0usize..20) {
        let engine = StorageEngine::open_in_memory().unwrap();
        engine.insert(&ObservationBuilder::new(1, ObservationType::Decision).build()).unwrap();
        let mut last = 0;
        for _ in 0..bumps {
            engine.increment_reference_count(1, chrono::Utc::now()).unwrap();
            let now = engine.get(1).unwrap().unwrap().reference_count;
            prop_assert!(now > last);
            last = now;
        }
        prop_assert_eq!(last as usize, bumps);
    }
}
