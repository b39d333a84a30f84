//! Port interfaces the sync engine consumes.
//!
//! These traits enable dependency injection and testing by abstracting
//! external dependencies (OAuth token lifecycle, the remote calendar API,
//! the caller-owned sync state).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hearth_domain::{
    CalendarEvent, CalendarInfo, RemoteEvent, RemoteEventDraft, Result, SyncResult, SyncSettings,
};

/// Trait for OAuth token lifecycle operations
///
/// Implemented by the token manager in `hearth-infra`; test fakes return
/// canned tokens.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a valid access token, refreshing the credential if expired.
    ///
    /// # Errors
    /// Returns `ReauthRequired` if no refreshable credential exists or the
    /// refresh is rejected by the provider.
    async fn ensure_valid(&self) -> Result<String>;

    /// Whether a non-expired or refreshable credential is present.
    async fn is_authenticated(&self) -> bool;

    /// Best-effort remote revocation followed by unconditional local
    /// credential clearing.
    ///
    /// # Errors
    /// Returns error only when the local credential store cannot be cleared;
    /// remote revocation failures are logged and swallowed.
    async fn revoke(&self) -> Result<()>;
}

/// Trait for remote calendar API operations
///
/// One method per remote HTTP call. Implementations translate transport
/// errors into the domain taxonomy: 401 → `ReauthRequired`, 5xx/timeouts →
/// `Transient`, other 4xx → `Rejected`.
#[async_trait]
pub trait RemoteCalendar: Send + Sync {
    /// List the calendars visible to the authenticated account.
    async fn list_calendars(&self) -> Result<Vec<CalendarInfo>>;

    /// List events in `[time_min, time_max)`, following pagination until
    /// every matching event is returned.
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<RemoteEvent>>;

    /// Create an event and return the server-side record (with its id).
    async fn create_event(
        &self,
        calendar_id: &str,
        draft: &RemoteEventDraft,
    ) -> Result<RemoteEvent>;

    /// Replace an existing event's writable fields.
    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        draft: &RemoteEventDraft,
    ) -> Result<RemoteEvent>;

    /// Delete an event.
    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()>;
}

/// Trait for the caller-owned sync state consumed by the auto-sync loop
///
/// The engine itself never persists anything; the scheduler uses this port
/// to load settings plus the local event collection before a run and to
/// commit the mutated state afterwards.
#[async_trait]
pub trait SyncStateStore: Send + Sync {
    /// Load the current settings and local event collection.
    async fn load(&self) -> Result<(SyncSettings, Vec<CalendarEvent>)>;

    /// Persist the post-run settings, events, and outcome.
    async fn commit(
        &self,
        settings: SyncSettings,
        events: Vec<CalendarEvent>,
        outcome: &SyncResult,
    ) -> Result<()>;
}
