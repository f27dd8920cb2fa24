use serde::{Deserialize, Serialize};

use super::tier_classification::TierStats;
use crate::priority::PriorityTier;

/// Applied supersessions per priority tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTierCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl PriorityTierCounts {
    pub fn increment(&mut self, tier: PriorityTier) {
        match tier {
            PriorityTier::Critical => self.critical += 1,
            PriorityTier::High => self.high += 1,
            PriorityTier::Medium => self.medium += 1,
            PriorityTier::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

/// Counters for one sleep-cycle pass. The scheduler persists these in its own ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub projects: Vec<String>,
    pub observations_processed: usize,
    pub candidates_detected: usize,
    pub supersessions_applied: usize,
    pub memories_deprecated: usize,
    pub by_priority_tier: PriorityTierCounts,
    pub by_memory_tier: TierStats,
    pub memory_tier_updates: usize,
    pub duration_ms: u64,
}
