//! Externally-owned event types as read through the remote calendar API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::event::ReminderKind;

/// Start or end of a remote event: an all-day calendar date or a timed
/// instant. The engine normalizes timed values to UTC at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoteEventWhen {
    AllDay { date: NaiveDate },
    Timed { at: DateTime<Utc> },
}

impl RemoteEventWhen {
    /// Resolve to an instant; all-day values resolve to midnight UTC.
    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            Self::AllDay { date } => date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
            Self::Timed { at } => *at,
        }
    }
}

/// Remote-side confirmation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteEventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

/// A reminder attached to a remote event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteReminder {
    pub kind: ReminderKind,
    pub offset_minutes: u32,
}

/// Event as owned by the remote calendar provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEvent {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: RemoteEventWhen,
    pub end: RemoteEventWhen,
    pub attendees: Vec<String>,
    pub reminders: Vec<RemoteReminder>,
    pub recurrence_rule: Option<String>,
    pub status: RemoteEventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub etag: Option<String>,
}

/// Writable remote event shape sent on create/update.
///
/// Carries no id, etag, or server timestamps; those are owned by the
/// provider. Produced by the translator's `to_remote`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEventDraft {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: RemoteEventWhen,
    pub end: RemoteEventWhen,
    pub attendees: Vec<String>,
    pub reminders: Vec<RemoteReminder>,
    pub recurrence_rule: Option<String>,
    pub status: RemoteEventStatus,
}

/// A calendar listed by the remote provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarInfo {
    pub id: String,
    pub summary: String,
    pub primary: bool,
    pub time_zone: Option<String>,
}
