//! REST adapter for the remote calendar API.
//!
//! Implements the core `RemoteCalendar` port: one method per remote HTTP
//! call. Auth, retries, and error categorization live in the
//! [`CalendarTransport`]; this layer owns URLs, query parameters,
//! pagination, and the wire-to-domain conversions.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hearth_core::{RemoteCalendar, TokenProvider};
use hearth_domain::{CalendarInfo, RemoteEvent, RemoteEventDraft, Result};
use reqwest::Method;
use tracing::debug;

use super::transport::CalendarTransport;
use super::wire::{ApiCalendarList, ApiEvent, ApiEventList, ApiEventWrite};

/// Remote calendar API client.
pub struct RemoteCalendarClient {
    base_url: String,
    transport: CalendarTransport,
}

impl RemoteCalendarClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    /// Returns error if the underlying transport cannot be constructed.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        Ok(Self::with_transport(base_url, CalendarTransport::new(tokens)?))
    }

    /// Create a client over a pre-configured transport (tests tune the
    /// retry policy here).
    #[must_use]
    pub fn with_transport(base_url: impl Into<String>, transport: CalendarTransport) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, transport }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl RemoteCalendar for RemoteCalendarClient {
    async fn list_calendars(&self) -> Result<Vec<CalendarInfo>> {
        let parsed: ApiCalendarList =
            self.transport.get_json(&self.url("/calendars"), &[], "list calendars").await?;
        Ok(parsed.items.into_iter().map(CalendarInfo::from).collect())
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<RemoteEvent>> {
        let url = self.url(&format!("/calendars/{calendar_id}/events"));
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleExpansion", "true".to_string()),
            ];
            if let Some(ref cursor) = page_token {
                query.push(("pageToken", cursor.clone()));
            }

            let page: ApiEventList =
                self.transport.get_json(&url, &query, "list events").await?;

            for item in page.items {
                events.push(item.into_remote()?);
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        debug!(calendar_id, count = events.len(), "listed remote events");
        Ok(events)
    }

    async fn create_event(
        &self,
        calendar_id: &str,
        draft: &RemoteEventDraft,
    ) -> Result<RemoteEvent> {
        let url = self.url(&format!("/calendars/{calendar_id}/events"));
        let created: ApiEvent = self
            .transport
            .send_json(Method::POST, &url, &ApiEventWrite::from(draft), "create event")
            .await?;
        created.into_remote()
    }

    async fn update_event(
        &self,
        calendar_id: &str,
        event_id: &str,
        draft: &RemoteEventDraft,
    ) -> Result<RemoteEvent> {
        let url = self.url(&format!("/calendars/{calendar_id}/events/{event_id}"));
        let updated: ApiEvent = self
            .transport
            .send_json(Method::PUT, &url, &ApiEventWrite::from(draft), "update event")
            .await?;
        updated.into_remote()
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> Result<()> {
        let url = self.url(&format!("/calendars/{calendar_id}/events/{event_id}"));
        self.transport.delete(&url, "delete event").await
    }
}
