//! Wire types for the remote calendar REST API.
//!
//! The provider models start/end as either a date (all-day) or a dateTime;
//! both shapes are decoded here and normalized into the domain's
//! [`RemoteEventWhen`] before any sync logic sees them.

use chrono::{DateTime, NaiveDate, Utc};
use hearth_domain::{
    CalendarInfo, RemoteEvent, RemoteEventDraft, RemoteEventStatus, RemoteEventWhen,
    RemoteReminder, ReminderKind, Result, SyncError,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCalendarList {
    #[serde(default)]
    pub items: Vec<ApiCalendar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCalendar {
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub primary: bool,
    pub time_zone: Option<String>,
}

impl From<ApiCalendar> for CalendarInfo {
    fn from(api: ApiCalendar) -> Self {
        Self { id: api.id, summary: api.summary, primary: api.primary, time_zone: api.time_zone }
    }
}

/// One page of an event listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventList {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
    pub next_page_token: Option<String>,
}

/// Date-or-dateTime start/end field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl ApiEventTime {
    fn into_when(self, field: &str) -> Result<RemoteEventWhen> {
        match (self.date_time, self.date) {
            (Some(at), _) => Ok(RemoteEventWhen::Timed { at }),
            (None, Some(date)) => Ok(RemoteEventWhen::AllDay { date }),
            (None, None) => Err(SyncError::InvalidInput(format!(
                "event {field} carries neither date nor dateTime"
            ))),
        }
    }

    fn from_when(when: RemoteEventWhen) -> Self {
        match when {
            RemoteEventWhen::AllDay { date } => {
                Self { date: Some(date), date_time: None, time_zone: None }
            }
            RemoteEventWhen::Timed { at } => {
                Self { date: None, date_time: Some(at), time_zone: Some("UTC".to_string()) }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAttendee {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReminder {
    pub method: String,
    pub minutes: u32,
}

/// Event resource as returned by the provider.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: ApiEventTime,
    pub end: ApiEventTime,
    #[serde(default)]
    pub attendees: Vec<ApiAttendee>,
    #[serde(default)]
    pub reminders: Vec<ApiReminder>,
    pub recurrence_rule: Option<String>,
    pub status: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub etag: Option<String>,
}

impl ApiEvent {
    /// Normalize into the domain representation.
    ///
    /// # Errors
    /// Returns `InvalidInput` when start or end carries neither shape.
    pub fn into_remote(self) -> Result<RemoteEvent> {
        let start = self.start.into_when("start")?;
        let end = self.end.into_when("end")?;

        let title = self
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Untitled event".to_string());

        let reminders = self
            .reminders
            .into_iter()
            .map(|r| RemoteReminder {
                kind: method_to_kind(&r.method),
                offset_minutes: r.minutes,
            })
            .collect();

        Ok(RemoteEvent {
            id: self.id,
            title,
            description: self.description,
            location: self.location,
            start,
            end,
            attendees: self.attendees.into_iter().map(|a| a.email).collect(),
            reminders,
            recurrence_rule: self.recurrence_rule,
            status: parse_status(self.status.as_deref()),
            created_at: self.created,
            updated_at: self.updated,
            etag: self.etag,
        })
    }
}

/// Writable event body sent on create/update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventWrite {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: ApiEventTime,
    pub end: ApiEventTime,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<ApiAttendee>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reminders: Vec<ApiReminder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_rule: Option<String>,
    pub status: String,
}

impl From<&RemoteEventDraft> for ApiEventWrite {
    fn from(draft: &RemoteEventDraft) -> Self {
        Self {
            summary: draft.title.clone(),
            description: draft.description.clone(),
            location: draft.location.clone(),
            start: ApiEventTime::from_when(draft.start),
            end: ApiEventTime::from_when(draft.end),
            attendees: draft
                .attendees
                .iter()
                .map(|email| ApiAttendee { email: email.clone() })
                .collect(),
            reminders: draft
                .reminders
                .iter()
                .map(|r| ApiReminder { method: kind_to_method(r.kind), minutes: r.offset_minutes })
                .collect(),
            recurrence_rule: draft.recurrence_rule.clone(),
            status: match draft.status {
                RemoteEventStatus::Confirmed => "confirmed".to_string(),
                RemoteEventStatus::Tentative => "tentative".to_string(),
                RemoteEventStatus::Cancelled => "cancelled".to_string(),
            },
        }
    }
}

fn parse_status(status: Option<&str>) -> RemoteEventStatus {
    match status {
        Some("tentative") => RemoteEventStatus::Tentative,
        Some("cancelled") => RemoteEventStatus::Cancelled,
        _ => RemoteEventStatus::Confirmed,
    }
}

fn method_to_kind(method: &str) -> ReminderKind {
    if method.eq_ignore_ascii_case("email") {
        ReminderKind::Email
    } else {
        ReminderKind::Notification
    }
}

fn kind_to_method(kind: ReminderKind) -> String {
    match kind {
        ReminderKind::Notification => "notification".to_string(),
        ReminderKind::Email => "email".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timed_event_resource_parses() {
        let json = serde_json::json!({
            "id": "evt-1",
            "summary": "Dentist",
            "start": { "dateTime": "2024-05-01T10:00:00Z", "timeZone": "UTC" },
            "end": { "dateTime": "2024-05-01T10:30:00Z", "timeZone": "UTC" },
            "status": "confirmed",
            "reminders": [ { "method": "email", "minutes": 30 } ],
            "attendees": [ { "email": "mom@example.com" } ],
            "created": "2024-04-01T00:00:00Z",
            "updated": "2024-04-02T00:00:00Z",
            "etag": "\"abc\""
        });

        let api: ApiEvent = serde_json::from_value(json).unwrap();
        let remote = api.into_remote().unwrap();

        assert_eq!(remote.title, "Dentist");
        assert!(matches!(remote.start, RemoteEventWhen::Timed { .. }));
        assert_eq!(remote.status, RemoteEventStatus::Confirmed);
        assert_eq!(remote.reminders[0].kind, ReminderKind::Email);
        assert_eq!(remote.attendees, vec!["mom@example.com".to_string()]);
    }

    #[test]
    fn all_day_event_resource_parses() {
        let json = serde_json::json!({
            "id": "evt-2",
            "summary": "Spring break",
            "start": { "date": "2024-05-01" },
            "end": { "date": "2024-05-02" },
            "created": "2024-04-01T00:00:00Z",
            "updated": "2024-04-01T00:00:00Z"
        });

        let api: ApiEvent = serde_json::from_value(json).unwrap();
        let remote = api.into_remote().unwrap();
        assert!(matches!(remote.start, RemoteEventWhen::AllDay { .. }));
    }

    #[test]
    fn event_without_any_start_shape_is_invalid() {
        let json = serde_json::json!({
            "id": "evt-3",
            "start": {},
            "end": { "date": "2024-05-02" },
            "created": "2024-04-01T00:00:00Z",
            "updated": "2024-04-01T00:00:00Z"
        });

        let api: ApiEvent = serde_json::from_value(json).unwrap();
        assert!(matches!(api.into_remote(), Err(SyncError::InvalidInput(_))));
    }

    #[test]
    fn empty_summary_falls_back_to_placeholder() {
        let json = serde_json::json!({
            "id": "evt-4",
            "summary": "   ",
            "start": { "date": "2024-05-01" },
            "end": { "date": "2024-05-02" },
            "created": "2024-04-01T00:00:00Z",
            "updated": "2024-04-01T00:00:00Z"
        });

        let api: ApiEvent = serde_json::from_value(json).unwrap();
        assert_eq!(api.into_remote().unwrap().title, "Untitled event");
    }

    #[test]
    fn unknown_status_defaults_to_confirmed() {
        assert_eq!(parse_status(Some("mystery")), RemoteEventStatus::Confirmed);
        assert_eq!(parse_status(None), RemoteEventStatus::Confirmed);
        assert_eq!(parse_status(Some("tentative")), RemoteEventStatus::Tentative);
    }

    #[test]
    fn write_body_uses_camel_case_keys() {
        let draft = RemoteEventDraft {
            title: "Dentist".to_string(),
            description: None,
            location: None,
            start: RemoteEventWhen::Timed {
                at: "2024-05-01T10:00:00Z".parse().unwrap(),
            },
            end: RemoteEventWhen::Timed {
                at: "2024-05-01T10:30:00Z".parse().unwrap(),
            },
            attendees: Vec::new(),
            reminders: vec![RemoteReminder {
                kind: ReminderKind::Notification,
                offset_minutes: 15,
            }],
            recurrence_rule: None,
            status: RemoteEventStatus::Confirmed,
        };

        let body = serde_json::to_value(ApiEventWrite::from(&draft)).unwrap();
        assert_eq!(body["summary"], "Dentist");
        assert_eq!(body["start"]["dateTime"], "2024-05-01T10:00:00Z");
        assert_eq!(body["reminders"][0]["method"], "notification");
        assert_eq!(body["status"], "confirmed");
        assert!(body.get("description").is_none());
    }
}
