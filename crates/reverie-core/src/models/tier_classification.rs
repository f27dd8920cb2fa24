use serde::{Deserialize, Serialize};

use crate::observation::{MemoryTier, ObservationId, ObservationType};

/// Inputs that drove a tier decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierFactors {
    pub observation_type: ObservationType,
    pub reference_count: u64,
    pub days_since_creation: f64,
    pub days_since_last_access: f64,
    pub superseded: bool,
    pub deprecated: bool,
}

/// Result of classifying one observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryTierClassification {
    pub observation_id: ObservationId,
    pub tier: MemoryTier,
    /// Tier stored on the observation at classification time.
    pub previous_tier: MemoryTier,
    pub reason: String,
    /// How sure the classifier is, in [0, 1].
    pub confidence: f64,
    pub factors: TierFactors,
}

impl MemoryTierClassification {
    pub fn is_change(&self) -> bool {
        self.tier != self.previous_tier
    }
}

/// Observation counts per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierStats {
    pub core: usize,
    pub working: usize,
    pub archive: usize,
    pub ephemeral: usize,
}

impl TierStats {
    pub fn get(&self, tier: MemoryTier) -> usize {
        match tier {
            MemoryTier::Core => self.core,
            MemoryTier::Working => self.working,
            MemoryTier::Archive => self.archive,
            MemoryTier::Ephemeral => self.ephemeral,
        }
    }

    pub fn add(&mut self, tier: MemoryTier, count: usize) {
        match tier {
            MemoryTier::Core => self.core += count,
            MemoryTier::Working => self.working += count,
            MemoryTier::Archive => self.archive += count,
            MemoryTier::Ephemeral => self.ephemeral += count,
        }
    }

    pub fn merge(&mut self, other: &TierStats) {
        for tier in MemoryTier::ALL {
            self.add(tier, other.get(tier));
        }
    }

    pub fn total(&self) -> usize {
        self.core + self.working + self.archive + self.ephemeral
    }
}
