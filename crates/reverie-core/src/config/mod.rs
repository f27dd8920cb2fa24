pub mod defaults;
mod learned_model_config;
mod memory_tier_config;
mod observability_config;
mod priority_config;
mod sleep_cycle_config;
mod storage_config;
mod supersession_config;

use std::path::Path;

pub use learned_model_config::LearnedModelConfig;
pub use memory_tier_config::MemoryTierConfig;
pub use observability_config::ObservabilityConfig;
pub use priority_config::PriorityConfig;
pub use sleep_cycle_config::{SleepCycleConfig, SleepCycleType};
pub use storage_config::StorageConfig;
pub use supersession_config::SupersessionConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{ReverieError, ReverieResult};

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverieConfig {
    pub storage: StorageConfig,
    pub supersession: SupersessionConfig,
    pub priority: PriorityConfig,
    pub memory_tier: MemoryTierConfig,
    pub learned_model: LearnedModelConfig,
    pub observability: ObservabilityConfig,
}

impl ReverieConfig {
    /// Parse from a TOML string. Missing sections and fields keep their defaults.
    pub fn from_toml(s: &str) -> ReverieResult<Self> {
        toml::from_str(s).map_err(|e| ReverieError::ConfigError(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> ReverieResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ReverieError::ConfigError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&raw)
    }
}
