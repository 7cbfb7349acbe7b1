use serde::{Deserialize, Serialize};

/// Outcome of one sync run over the queue snapshot taken at its start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub synced_count: u32,
    pub errors: u32,
}

impl SyncReport {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// What the UI sees: a passive pending indicator, never an error dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatusSnapshot {
    pub is_syncing: bool,
    pub is_online: bool,
    pub pending_count: u32,
    pub failed_count: u32,
    pub last_sync_at: Option<i64>,
}

impl Default for SyncStatusSnapshot {
    fn default() -> Self {
        Self {
            is_syncing: false,
            // Optimistic until the platform reports otherwise, mirroring the
            // connectivity sensor's initial state.
            is_online: true,
            pending_count: 0,
            failed_count: 0,
            last_sync_at: None,
        }
    }
}
