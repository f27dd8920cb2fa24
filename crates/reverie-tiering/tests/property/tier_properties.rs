//! Property tests: classification is total, consistent, and threshold-driven.

use chrono::{Duration, Utc};
use proptest::prelude::*;

use reverie_core::config::MemoryTierConfig;
use reverie_core::observation::{MemoryTier, ObservationType};
use reverie_tiering::classify_at;
use test_fixtures::ObservationBuilder;

proptest! {
    #[test]
    fn prop_threshold_references_always_core(
        refs in 5u64..10_000,
        age_days in 0i64..2_000,
        deprecated in any::<bool>(),
        superseded in any::<bool>(),
    ) {
        let now = Utc::now();
        let mut builder = ObservationBuilder::new(1, ObservationType::Change)
            .created_at(now - Duration::days(age_days))
            .reference_count(refs);
        if deprecated {
            builder = builder.deprecated();
        }
        if superseded {
            builder = builder.superseded_by(2);
        }
        let c = classify_at(&builder.build(), &MemoryTierConfig::default(), now);
        prop_assert_eq!(c.tier, MemoryTier::Core);
    }

    #[test]
    fn prop_confidence_matches_tier(
        refs in 0u64..10,
        age_days in 0i64..400,
        superseded in any::<bool>(),
    ) {
        let now = Utc::now();
        let mut builder = ObservationBuilder::new(1, ObservationType::Bugfix)
            .created_at(now - Duration::days(age_days))
            .reference_count(refs);
        if superseded {
            builder = builder.superseded_by(2);
        }
        let c = classify_at(&builder.build(), &MemoryTierConfig::default(), now);
        let expected = match c.tier {
            MemoryTier::Core => 0.9,
            MemoryTier::Ephemeral => 0.85,
            MemoryTier::Archive => 0.8,
            MemoryTier::Working => 0.7,
        };
        prop_assert_eq!(c.confidence, expected);
        prop_assert!(!c.reason.is_empty());
    }

    #[test]
    fn prop_fresh_unreferenced_active_is_working(age_days in 0i64..=30) {
        let now = Utc::now();
        let obs = ObservationBuilder::new(1, ObservationType::Feature)
            .created_at(now - Duration::days(age_days))
            .build();
        prop_assert_eq!(
            classify_at(&obs, &MemoryTierConfig::default(), now).tier,
            MemoryTier::Working
        );
    }
}
