//! Per-account calendar sync service facade.
//!
//! The object UI collaborators hold: it wires the token manager, the remote
//! calendar client, and the sync engine together for one account. Multiple
//! accounts sync side by side by constructing one service each; there is
//! deliberately no process-wide shared instance.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hearth_core::{RemoteCalendar, SyncEngine};
use hearth_domain::{
    CalendarEvent, CalendarInfo, Result, SyncError, SyncResult, SyncSettings,
};
use serde::{Deserialize, Serialize};

use super::client::RemoteCalendarClient;
use crate::auth::{CredentialStore, OAuthClient, OAuthConfig, TokenManager};

/// Connection state summary for settings screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarConnectionStatus {
    pub account: String,
    pub connected: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub sync_enabled: bool,
}

/// Calendar sync service for one account.
pub struct CalendarSyncService {
    account: String,
    tokens: Arc<TokenManager>,
    calendar: Arc<RemoteCalendarClient>,
    engine: SyncEngine,
}

impl CalendarSyncService {
    /// Wire up a service for `account` against the given OAuth settings,
    /// calendar API base URL, and credential store.
    ///
    /// # Errors
    /// Returns `Config` when the OAuth endpoints are malformed.
    pub fn new(
        account: impl Into<String>,
        oauth: OAuthConfig,
        calendar_api_base: impl Into<String>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let account = account.into();
        let tokens =
            Arc::new(TokenManager::new(OAuthClient::new(oauth)?, store, account.clone()));
        let calendar = Arc::new(RemoteCalendarClient::new(calendar_api_base, tokens.clone())?);
        let engine = SyncEngine::new(tokens.clone(), calendar.clone());

        Ok(Self { account, tokens, calendar, engine })
    }

    /// Impose an overall deadline on every sync pass.
    #[must_use]
    pub fn with_sync_deadline(mut self, deadline: Duration) -> Self {
        self.engine = self.engine.with_deadline(deadline);
        self
    }

    /// The account this service serves.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Browser authorization URL for connecting the account.
    ///
    /// # Errors
    /// Returns `Config` when the OAuth client id is unset.
    pub fn authorization_url(&self) -> Result<String> {
        self.tokens.authorization_url()
    }

    /// Complete the OAuth flow with the authorization code from the
    /// redirect.
    ///
    /// # Errors
    /// Returns `AuthExchange` when the provider rejects the code.
    pub async fn connect(&self, code: &str) -> Result<()> {
        self.tokens.exchange_code(code).await.map(|_| ())
    }

    /// Run one synchronization pass.
    ///
    /// # Errors
    /// See [`SyncEngine::sync`].
    pub async fn sync(
        &self,
        settings: &mut SyncSettings,
        events: &mut Vec<CalendarEvent>,
    ) -> Result<SyncResult> {
        self.engine.sync(settings, events).await
    }

    /// Export one event immediately to the first selected calendar.
    ///
    /// # Errors
    /// Returns `Config` when no calendar is selected; otherwise propagates
    /// the export failure.
    pub async fn export_single_event(
        &self,
        settings: &SyncSettings,
        event: &mut CalendarEvent,
    ) -> Result<String> {
        let Some(calendar_id) = settings.selected_calendar_ids.first() else {
            return Err(SyncError::Config("no calendar selected for export".to_string()));
        };
        self.engine.export_single_event(calendar_id, event).await
    }

    /// List the calendars visible to the account.
    ///
    /// # Errors
    /// Propagates authentication and API failures.
    pub async fn get_calendar_list(&self) -> Result<Vec<CalendarInfo>> {
        self.engine.get_calendar_list().await
    }

    /// Delete an event's remote copy (an explicit UI action; automatic sync
    /// never deletes).
    ///
    /// # Errors
    /// Propagates authentication and API failures.
    pub async fn delete_remote_event(&self, calendar_id: &str, event_id: &str) -> Result<()> {
        self.calendar.delete_event(calendar_id, event_id).await
    }

    /// Whether the account currently holds a usable credential.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated().await
    }

    /// Connection summary for the settings screen.
    pub async fn connection_status(&self, settings: &SyncSettings) -> CalendarConnectionStatus {
        CalendarConnectionStatus {
            account: self.account.clone(),
            connected: self.is_authenticated().await,
            last_sync_at: settings.last_sync_at,
            sync_enabled: settings.enabled,
        }
    }

    /// Revoke and clear the account's credentials.
    ///
    /// # Errors
    /// Returns error only when the local credential store cannot be
    /// cleared.
    pub async fn disconnect(&self) -> Result<()> {
        self.engine.disconnect().await
    }
}
