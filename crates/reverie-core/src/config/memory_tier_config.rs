use serde::{Deserialize, Serialize};

use super::defaults;

/// Memory tier lifecycle thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryTierConfig {
    pub enabled: bool,
    /// Idle days before a working memory is archived.
    pub working_to_archive_days: u32,
    /// Idle days before a memory becomes ephemeral.
    pub archive_to_ephemeral_days: u32,
    /// References needed to promote to core.
    pub core_reference_threshold: u64,
    pub reclassify_on_sleep_cycle: bool,
}

impl MemoryTierConfig {
    /// Whether a batch reclassification should run at all.
    pub fn reclassification_active(&self) -> bool {
        self.enabled && self.reclassify_on_sleep_cycle
    }
}

impl Default for MemoryTierConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_MEMORY_TIER_ENABLED,
            working_to_archive_days: defaults::DEFAULT_WORKING_TO_ARCHIVE_DAYS,
            archive_to_ephemeral_days: defaults::DEFAULT_ARCHIVE_TO_EPHEMERAL_DAYS,
            core_reference_threshold: defaults::DEFAULT_CORE_REFERENCE_THRESHOLD,
            reclassify_on_sleep_cycle: defaults::DEFAULT_RECLASSIFY_ON_SLEEP_CYCLE,
        }
    }
}
