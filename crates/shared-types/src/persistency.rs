//! Face persistency as requested by management.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long a face should live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacePersistency {
    /// Created implicitly by inbound traffic; closed when idle.
    OnDemand,
    /// Created by management; closed on failure.
    Persistent,
    /// Created by management; recovers from failures.
    Permanent,
}

/// Unknown persistency string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown face persistency: {0}")]
pub struct ParsePersistencyError(pub String);

impl fmt::Display for FacePersistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnDemand => write!(f, "on-demand"),
            Self::Persistent => write!(f, "persistent"),
            Self::Permanent => write!(f, "permanent"),
        }
    }
}

impl FromStr for FacePersistency {
    type Err = ParsePersistencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on-demand" => Ok(Self::OnDemand),
            "persistent" => Ok(Self::Persistent),
            "permanent" => Ok(Self::Permanent),
            other => Err(ParsePersistencyError(other.to_string())),
        }
    }
}
