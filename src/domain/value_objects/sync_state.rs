use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// On-device lifecycle of a queued order. `Queued -> Synced` happens exactly
/// once; `Queued -> FailedPermanent` only after the rejection budget is spent.
/// The in-flight phase of a sync run is engine-local and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Queued,
    Synced,
    FailedPermanent,
}

impl SyncState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncState::Queued => "queued",
            SyncState::Synced => "synced",
            SyncState::FailedPermanent => "failed_permanent",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(SyncState::Queued),
            "synced" => Ok(SyncState::Synced),
            "failed_permanent" => Ok(SyncState::FailedPermanent),
            other => Err(format!("Unknown sync state '{other}'")),
        }
    }
}
