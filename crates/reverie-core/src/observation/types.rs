use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ReverieError;

/// The closed set of observation kinds recorded from coding sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationType {
    Decision,
    Bugfix,
    Feature,
    Refactor,
    Discovery,
    Change,
    Handoff,
}

impl ObservationType {
    /// Every variant, in declaration order.
    pub const ALL: [ObservationType; 7] = [
        ObservationType::Decision,
        ObservationType::Bugfix,
        ObservationType::Feature,
        ObservationType::Refactor,
        ObservationType::Discovery,
        ObservationType::Change,
        ObservationType::Handoff,
    ];

    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationType::Decision => "decision",
            ObservationType::Bugfix => "bugfix",
            ObservationType::Feature => "feature",
            ObservationType::Refactor => "refactor",
            ObservationType::Discovery => "discovery",
            ObservationType::Change => "change",
            ObservationType::Handoff => "handoff",
        }
    }
}

impl fmt::Display for ObservationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObservationType {
    type Err = ReverieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObservationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ReverieError::InvalidType {
                type_name: s.to_string(),
            })
    }
}
