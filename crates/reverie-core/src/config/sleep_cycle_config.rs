use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{MemoryTierConfig, PriorityConfig};
use crate::errors::ReverieError;

/// Depth of a consolidation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepCycleType {
    /// Quick pass over the last week.
    Micro,
    #[default]
    Light,
    /// Full pass with deprecation.
    Deep,
    /// User-triggered, widest window.
    Manual,
}

impl SleepCycleType {
    pub const ALL: [SleepCycleType; 4] = [
        SleepCycleType::Micro,
        SleepCycleType::Light,
        SleepCycleType::Deep,
        SleepCycleType::Manual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SleepCycleType::Micro => "micro",
            SleepCycleType::Light => "light",
            SleepCycleType::Deep => "deep",
            SleepCycleType::Manual => "manual",
        }
    }
}

impl fmt::Display for SleepCycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SleepCycleType {
    type Err = ReverieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ReverieError::ConfigError(format!("unknown sleep cycle type: {s}")))
    }
}

/// Parameters of one sleep-cycle pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepCycleConfig {
    pub cycle_type: SleepCycleType,
    /// Run supersession detection. When off, a pass only deprecates and reclassifies.
    pub supersession_enabled: bool,
    /// Minimum confidence for a supersession to be accepted.
    pub supersession_threshold: f64,
    /// Days of observations to consider.
    pub supersession_lookback_days: u32,
    pub deprecation_enabled: bool,
    /// Superseded rows older than this are deprecated.
    pub deprecate_after_days: u32,
    pub max_observations_per_cycle: usize,
    pub priority: PriorityConfig,
    pub memory_tier: MemoryTierConfig,
    /// Log intended changes without writing them.
    pub dry_run: bool,
}

impl SleepCycleConfig {
    pub fn preset(cycle_type: SleepCycleType) -> Self {
        let (threshold, lookback, deprecation, deprecate_after, max_obs, boost, reclassify) =
            match cycle_type {
                SleepCycleType::Micro => (0.7, 7, false, 180, 50, 0.1, false),
                SleepCycleType::Light => (0.8, 30, false, 180, 100, 0.05, true),
                SleepCycleType::Deep => (0.7, 90, true, 180, 500, 0.1, true),
                SleepCycleType::Manual => (0.6, 365, true, 90, 1000, 0.15, true),
            };
        Self {
            cycle_type,
            supersession_enabled: true,
            supersession_threshold: threshold,
            supersession_lookback_days: lookback,
            deprecation_enabled: deprecation,
            deprecate_after_days: deprecate_after,
            max_observations_per_cycle: max_obs,
            priority: PriorityConfig {
                confidence_boost_factor: boost,
                ..PriorityConfig::default()
            },
            memory_tier: MemoryTierConfig {
                reclassify_on_sleep_cycle: reclassify,
                ..MemoryTierConfig::default()
            },
            dry_run: false,
        }
    }
}

impl Default for SleepCycleConfig {
    fn default() -> Self {
        Self::preset(SleepCycleType::default())
    }
}
