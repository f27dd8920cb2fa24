use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ReverieError;

/// Lifecycle bucket governing how aggressively an observation is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryTier {
    /// Highly referenced, never forgotten.
    Core,
    /// Actively used.
    #[default]
    Working,
    /// Idle or superseded, can be recalled.
    Archive,
    /// Deprecated or long idle, eligible for cleanup.
    Ephemeral,
}

impl MemoryTier {
    pub const ALL: [MemoryTier; 4] = [
        MemoryTier::Core,
        MemoryTier::Working,
        MemoryTier::Archive,
        MemoryTier::Ephemeral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryTier::Core => "core",
            MemoryTier::Working => "working",
            MemoryTier::Archive => "archive",
            MemoryTier::Ephemeral => "ephemeral",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MemoryTier::Core => "Core decisions, never forget",
            MemoryTier::Working => "Working memory, actively used",
            MemoryTier::Archive => "Archived, can be recalled",
            MemoryTier::Ephemeral => "Ephemeral, can be cleaned",
        }
    }
}

impl fmt::Display for MemoryTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryTier {
    type Err = ReverieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemoryTier::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ReverieError::InvalidTier {
                tier: s.to_string(),
            })
    }
}
