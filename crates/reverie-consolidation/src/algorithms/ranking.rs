//! Processing order for observations and final ordering for candidates.

use std::cmp::Ordering;

use reverie_core::config::PriorityConfig;
use reverie_core::models::SupersessionCandidate;
use reverie_core::observation::Observation;

/// Re-sort observations so high-priority types are evaluated first, newest
/// first within a priority. Leaves the order untouched when priority ordering is off.
pub fn order_for_processing(observations: &mut [Observation], priority: &PriorityConfig) {
    if !priority.orders_by_priority() {
        return;
    }
    observations.sort_by(|a, b| {
        let pa = priority.weights.weight(a.observation_type);
        let pb = priority.weights.weight(b.observation_type);
        pb.total_cmp(&pa).then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Priority tier descending, then confidence descending, then ids ascending.
pub fn compare_candidates(a: &SupersessionCandidate, b: &SupersessionCandidate) -> Ordering {
    b.priority_tier
        .cmp(&a.priority_tier)
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| (a.older_id, a.newer_id).cmp(&(b.older_id, b.newer_id)))
}

pub fn rank_candidates(candidates: &mut [SupersessionCandidate]) {
    candidates.sort_by(compare_candidates);
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverie_core::models::{FeatureVector, WeightSource};
    use reverie_core::observation::ObservationType;
    use reverie_core::priority::PriorityTier;
    use test_fixtures::ObservationBuilder;

    fn obs(id: i64, observation_type: ObservationType, hours_ago: f64) -> Observation {
        ObservationBuilder::new(id, observation_type).hours_ago(hours_ago).build()
    }

    fn candidate(older_id: i64, newer_id: i64, tier: PriorityTier, confidence: f64) -> SupersessionCandidate {
        SupersessionCandidate {
            older_id,
            newer_id,
            confidence,
            reason: String::new(),
            semantic_similarity: 0.9,
            topic_match: true,
            file_overlap: 0.0,
            older_type: ObservationType::Change,
            newer_type: ObservationType::Change,
            priority: 0.5,
            priority_tier: tier,
            features: FeatureVector::default(),
            weight_source: WeightSource::Fixed,
        }
    }

    #[test]
    fn processing_order_puts_bugfixes_first_then_newest() {
        let mut list = vec![
            obs(1, ObservationType::Discovery, 5.0),
            obs(2, ObservationType::Bugfix, 4.0),
            obs(3, ObservationType::Bugfix, 1.0),
            obs(4, ObservationType::Decision, 2.0),
        ];
        order_for_processing(&mut list, &PriorityConfig::default());
        let ids: Vec<i64> = list.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn processing_order_untouched_when_disabled() {
        let mut list = vec![
            obs(1, ObservationType::Discovery, 5.0),
            obs(2, ObservationType::Bugfix, 4.0),
        ];
        let config = PriorityConfig {
            priority_ordering: false,
            ..Default::default()
        };
        order_for_processing(&mut list, &config);
        assert_eq!(list[0].id, 1);
    }

    #[test]
    fn candidates_rank_by_tier_before_confidence() {
        let mut list = vec![
            candidate(1, 2, PriorityTier::Low, 0.95),
            candidate(3, 4, PriorityTier::Critical, 0.61),
            candidate(5, 6, PriorityTier::Critical, 0.80),
            candidate(0, 7, PriorityTier::Critical, 0.80),
        ];
        rank_candidates(&mut list);
        let pairs: Vec<(i64, i64)> = list.iter().map(|c| (c.older_id, c.newer_id)).collect();
        assert_eq!(pairs, vec![(0, 7), (5, 6), (3, 4), (1, 2)]);
    }
}
