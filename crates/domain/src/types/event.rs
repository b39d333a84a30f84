//! Locally-owned calendar event types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MIN_EVENT_DURATION_MINUTES;

/// Closed category set for local events.
///
/// Inferred from the title when the remote side carries no explicit
/// category; see [`crate::category::infer_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Appointment,
    Meeting,
    Education,
    Social,
    Family,
    Other,
}

/// Event confirmation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

/// Event priority as shown in the organizer UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// How a reminder is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Notification,
    Email,
}

/// A reminder attached to a local event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub kind: ReminderKind,
    pub offset_minutes: u32,
    pub enabled: bool,
}

impl Reminder {
    /// Enabled notification reminder at the given offset.
    #[must_use]
    pub fn notification(offset_minutes: u32) -> Self {
        Self { kind: ReminderKind::Notification, offset_minutes, enabled: true }
    }
}

/// Locally-owned calendar event.
///
/// `remote_event_id` is the only correlation key to the remote schema: it is
/// set exactly once (first successful export, or at import) and never
/// cleared by the engine. An event without it is "local-only".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub category: EventCategory,
    pub cost: Option<f64>,
    pub recurrence_rule: Option<String>,
    pub priority: Priority,
    pub status: EventStatus,
    pub remote_event_id: Option<String>,
    pub reminders: Vec<Reminder>,
    pub attendees: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CalendarEvent {
    /// Whether this event has no remote counterpart yet.
    #[must_use]
    pub fn is_local_only(&self) -> bool {
        self.remote_event_id.is_none()
    }

    /// Clamp a raw duration to the minimum the organizer supports.
    #[must_use]
    pub fn clamp_duration(minutes: u32) -> u32 {
        minutes.max(MIN_EVENT_DURATION_MINUTES)
    }
}
