//! How the raw reaction count is maintained

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy for updating `raw_reaction_count` on each event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountStrategy {
    /// Replace the count with the platform's current count for the emoji
    #[default]
    Snapshot,
    /// Increment or decrement the stored count by one
    Running,
}

impl CountStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snapshot => "snapshot",
            Self::Running => "running",
        }
    }
}

impl FromStr for CountStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "snapshot" => Ok(Self::Snapshot),
            "running" => Ok(Self::Running),
            other => Err(format!("unknown count strategy: {other}")),
        }
    }
}

impl fmt::Display for CountStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
