//! Per-account sync settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_SYNC_INTERVAL_MINUTES;

/// Which way events flow during a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    Import,
    Export,
    Both,
}

impl SyncDirection {
    /// Remote events are fetched and brought into the local store.
    #[must_use]
    pub fn imports(self) -> bool {
        matches!(self, Self::Import | Self::Both)
    }

    /// Local-only events are pushed to the remote calendar.
    #[must_use]
    pub fn exports(self) -> bool {
        matches!(self, Self::Export | Self::Both)
    }
}

/// Sync settings record, owned and persisted by the caller.
///
/// `selected_calendar_ids` keeps insertion order; the first entry is the
/// export target for local-only events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    pub enabled: bool,
    pub selected_calendar_ids: Vec<String>,
    pub sync_direction: SyncDirection,
    pub auto_sync: bool,
    pub sync_interval_minutes: u32,
    pub last_sync_at: Option<DateTime<Utc>>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            selected_calendar_ids: Vec::new(),
            sync_direction: SyncDirection::Both,
            auto_sync: false,
            sync_interval_minutes: DEFAULT_SYNC_INTERVAL_MINUTES,
            last_sync_at: None,
        }
    }
}
