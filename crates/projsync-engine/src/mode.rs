//! Sweep selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which sweep a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepMode {
    /// Create or update everything the source declares.
    Create,
    /// Remove from the destination what the source no longer declares.
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sweep mode '{0}' (expected one of: create, delete)")]
pub struct UnknownMode(pub String);

impl FromStr for SweepMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(SweepMode::Create),
            "delete" => Ok(SweepMode::Delete),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for SweepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepMode::Create => write!(f, "create"),
            SweepMode::Delete => write!(f, "delete"),
        }
    }
}
