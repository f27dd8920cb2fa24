//! Tier rules and the pure classifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reverie_core::config::MemoryTierConfig;
use reverie_core::models::{MemoryTierClassification, TierFactors};
use reverie_core::observation::{MemoryTier, Observation};

/// The rule that decided a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierRule {
    HighlyReferenced,
    Deprecated,
    LongIdle,
    Superseded,
    Idle,
    Active,
}

impl TierRule {
    pub fn tier(&self) -> MemoryTier {
        match self {
            TierRule::HighlyReferenced => MemoryTier::Core,
            TierRule::Deprecated | TierRule::LongIdle => MemoryTier::Ephemeral,
            TierRule::Superseded | TierRule::Idle => MemoryTier::Archive,
            TierRule::Active => MemoryTier::Working,
        }
    }

    pub fn confidence(&self) -> f64 {
        match self.tier() {
            MemoryTier::Core => 0.9,
            MemoryTier::Ephemeral => 0.85,
            MemoryTier::Archive => 0.8,
            MemoryTier::Working => 0.7,
        }
    }

    /// First matching rule for the given factors.
    pub fn select(factors: &TierFactors, config: &MemoryTierConfig) -> Self {
        let idle = factors.days_since_last_access;
        if factors.reference_count >= config.core_reference_threshold {
            TierRule::HighlyReferenced
        } else if factors.deprecated {
            TierRule::Deprecated
        } else if idle > f64::from(config.archive_to_ephemeral_days) {
            TierRule::LongIdle
        } else if factors.superseded {
            TierRule::Superseded
        } else if idle > f64::from(config.working_to_archive_days) {
            TierRule::Idle
        } else {
            TierRule::Active
        }
    }

    pub fn reason(&self, factors: &TierFactors) -> String {
        let idle_days = factors.days_since_last_access.floor() as i64;
        match self {
            TierRule::HighlyReferenced => format!("Referenced {}+ times", factors.reference_count),
            TierRule::Deprecated => "Marked as deprecated".to_string(),
            TierRule::LongIdle => format!("Not accessed for {idle_days} days"),
            TierRule::Superseded => "Superseded by newer observation".to_string(),
            TierRule::Idle => format!("Idle for {idle_days} days"),
            TierRule::Active => "Actively used".to_string(),
        }
    }
}

/// Classify one observation as of `now`.
pub fn classify_at(
    observation: &Observation,
    config: &MemoryTierConfig,
    now: DateTime<Utc>,
) -> MemoryTierClassification {
    let factors = TierFactors {
        observation_type: observation.observation_type,
        reference_count: observation.reference_count,
        days_since_creation: observation.days_since_creation(now),
        days_since_last_access: observation.days_since_last_access(now),
        superseded: observation.is_superseded(),
        deprecated: observation.deprecated,
    };
    let rule = TierRule::select(&factors, config);
    MemoryTierClassification {
        observation_id: observation.id,
        tier: rule.tier(),
        previous_tier: observation.memory_tier,
        reason: rule.reason(&factors),
        confidence: rule.confidence(),
        factors,
    }
}
