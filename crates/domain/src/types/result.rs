//! Sync outcome types.

use serde::{Deserialize, Serialize};

use crate::types::event::CalendarEvent;
use crate::types::remote::RemoteEvent;

/// Classification of a paired-event mismatch, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    DeletionConflict,
    TimeMismatch,
    ContentMismatch,
}

/// A detected conflict between a paired event's local and remote state.
///
/// `remote_event` is `None` only for deletion conflicts, where the remote
/// counterpart disappeared while the local record still references it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConflict {
    pub local_event: CalendarEvent,
    pub remote_event: Option<RemoteEvent>,
    pub kind: ConflictKind,
}

/// Aggregated outcome of one `sync()` call.
///
/// Counts are computed once per call; a given conflict is reported at most
/// once even when multiple fields differ. `imported_events` holds the
/// translated remote-only records the caller persists; the engine does not
/// own storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub imported_count: usize,
    pub exported_count: usize,
    pub updated_count: usize,
    pub errors: Vec<String>,
    pub conflicts: Vec<SyncConflict>,
    pub imported_events: Vec<CalendarEvent>,
    pub success: bool,
}

impl SyncResult {
    /// Record a per-event failure without aborting the run.
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Set the final success flag: true only when no errors were recorded.
    pub fn finalize(&mut self) {
        self.success = self.errors.is_empty();
    }
}
