//! Domain constants
//!
//! Centralized location for the sync engine's fixed policy values.

// Sync window relative to "now" used when fetching remote events
pub const SYNC_WINDOW_LOOKBACK_DAYS: i64 = 30;
pub const SYNC_WINDOW_LOOKAHEAD_DAYS: i64 = 90;

// Event shape policy
pub const MIN_EVENT_DURATION_MINUTES: u32 = 15;
pub const DEFAULT_REMINDER_OFFSET_MINUTES: u32 = 15;

// Token lifecycle
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 300;

// Auto-sync scheduling
pub const DEFAULT_SYNC_INTERVAL_MINUTES: u32 = 30;
