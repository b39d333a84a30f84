//! Pure, stateless mapping between the local and remote event schemas.
//!
//! Both directions are deterministic and side-effect-free. Timed values use
//! a fixed UTC policy: a local `date` + `time` pair denotes that wall-clock
//! instant in UTC, and remote instants are normalized to UTC before they
//! reach this module.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use hearth_domain::constants::DEFAULT_REMINDER_OFFSET_MINUTES;
use hearth_domain::{
    infer_category, CalendarEvent, EventStatus, Priority, Reminder, RemoteEvent, RemoteEventDraft,
    RemoteEventStatus, RemoteEventWhen, RemoteReminder,
};
use uuid::Uuid;

/// Resolve a remote event's schedule into the local `(date, time, duration)`
/// shape, clamping the duration to the organizer minimum.
#[must_use]
pub fn remote_schedule(remote: &RemoteEvent) -> (NaiveDate, NaiveTime, u32) {
    let start = remote.start.instant();
    let end = remote.end.instant();
    let seconds = (end - start).num_seconds();
    let duration = CalendarEvent::clamp_duration(round_minutes(seconds));
    (start.date_naive(), start.time(), duration)
}

/// Translate a remote event into the local schema.
///
/// The local id is derived from the remote id (UUIDv5), so repeated imports
/// of the same remote event produce the same record. The remote id itself
/// becomes the correlation key.
#[must_use]
pub fn to_local(remote: &RemoteEvent) -> CalendarEvent {
    let (date, time, duration_minutes) = remote_schedule(remote);

    let reminders = if remote.reminders.is_empty() {
        vec![Reminder::notification(DEFAULT_REMINDER_OFFSET_MINUTES)]
    } else {
        remote
            .reminders
            .iter()
            .map(|r| Reminder { kind: r.kind, offset_minutes: r.offset_minutes, enabled: true })
            .collect()
    };

    CalendarEvent {
        id: Uuid::new_v5(&Uuid::NAMESPACE_OID, remote.id.as_bytes()).to_string(),
        title: remote.title.clone(),
        date,
        time,
        duration_minutes,
        location: remote.location.clone(),
        notes: remote.description.clone(),
        category: infer_category(&remote.title),
        cost: None,
        recurrence_rule: remote.recurrence_rule.clone(),
        priority: Priority::default(),
        status: status_to_local(remote.status),
        remote_event_id: Some(remote.id.clone()),
        reminders,
        attendees: remote.attendees.clone(),
        created_at: remote.created_at,
        updated_at: remote.updated_at,
    }
}

/// Translate a local event into the writable remote shape.
///
/// Only enabled reminders cross the boundary; statuses other than
/// `confirmed` are sent as `tentative`.
#[must_use]
pub fn to_remote(local: &CalendarEvent) -> RemoteEventDraft {
    let start = Utc.from_utc_datetime(&local.date.and_time(local.time));
    let end = start + Duration::minutes(i64::from(local.duration_minutes));

    let reminders = local
        .reminders
        .iter()
        .filter(|r| r.enabled)
        .map(|r| RemoteReminder { kind: r.kind, offset_minutes: r.offset_minutes })
        .collect();

    RemoteEventDraft {
        title: local.title.clone(),
        description: local.notes.clone(),
        location: local.location.clone(),
        start: RemoteEventWhen::Timed { at: start },
        end: RemoteEventWhen::Timed { at: end },
        attendees: local.attendees.clone(),
        reminders,
        recurrence_rule: local.recurrence_rule.clone(),
        status: match local.status {
            EventStatus::Confirmed => RemoteEventStatus::Confirmed,
            EventStatus::Tentative | EventStatus::Cancelled => RemoteEventStatus::Tentative,
        },
    }
}

/// Copy the remote side's winning values onto the local record.
///
/// Used when conflict resolution favors the remote event; the correlation
/// key is left untouched.
pub fn apply_remote(local: &mut CalendarEvent, remote: &RemoteEvent) {
    let (date, time, duration_minutes) = remote_schedule(remote);
    local.title = remote.title.clone();
    local.date = date;
    local.time = time;
    local.duration_minutes = duration_minutes;
    local.location = remote.location.clone();
    local.notes = remote.description.clone();
    local.status = status_to_local(remote.status);
    local.updated_at = remote.updated_at;
}

fn status_to_local(status: RemoteEventStatus) -> EventStatus {
    match status {
        RemoteEventStatus::Confirmed => EventStatus::Confirmed,
        RemoteEventStatus::Tentative => EventStatus::Tentative,
        RemoteEventStatus::Cancelled => EventStatus::Cancelled,
    }
}

fn round_minutes(seconds: i64) -> u32 {
    let rounded = (seconds.max(0) + 30) / 60;
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone};
    use hearth_domain::{EventCategory, ReminderKind};

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn sample_remote() -> RemoteEvent {
        RemoteEvent {
            id: "remote-1".to_string(),
            title: "Dentist appointment".to_string(),
            description: Some("bring insurance card".to_string()),
            location: Some("12 Main St".to_string()),
            start: RemoteEventWhen::Timed { at: utc(2024, 5, 1, 10, 0) },
            end: RemoteEventWhen::Timed { at: utc(2024, 5, 1, 10, 30) },
            attendees: vec!["mom@example.com".to_string()],
            reminders: Vec::new(),
            recurrence_rule: None,
            status: RemoteEventStatus::Confirmed,
            created_at: utc(2024, 4, 1, 9, 0),
            updated_at: utc(2024, 4, 2, 9, 0),
            etag: Some("\"etag-1\"".to_string()),
        }
    }

    fn sample_local() -> CalendarEvent {
        CalendarEvent {
            id: "local-1".to_string(),
            title: "Soccer practice".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            time: NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
            duration_minutes: 60,
            location: Some("North field".to_string()),
            notes: None,
            category: EventCategory::Other,
            cost: None,
            recurrence_rule: None,
            priority: Priority::Medium,
            status: EventStatus::Confirmed,
            remote_event_id: None,
            reminders: vec![
                Reminder::notification(15),
                Reminder { kind: ReminderKind::Email, offset_minutes: 60, enabled: false },
            ],
            attendees: Vec::new(),
            created_at: utc(2024, 6, 1, 8, 0),
            updated_at: utc(2024, 6, 1, 8, 0),
        }
    }

    #[test]
    fn round_trip_preserves_title_date_time_duration() {
        let local = sample_local();
        let draft = to_remote(&local);

        let echoed = RemoteEvent {
            id: "server-assigned".to_string(),
            title: draft.title,
            description: draft.description,
            location: draft.location,
            start: draft.start,
            end: draft.end,
            attendees: draft.attendees,
            reminders: draft.reminders,
            recurrence_rule: draft.recurrence_rule,
            status: draft.status,
            created_at: utc(2024, 6, 1, 8, 0),
            updated_at: utc(2024, 6, 1, 8, 0),
            etag: None,
        };

        let back = to_local(&echoed);
        assert_eq!(back.title, local.title);
        assert_eq!(back.date, local.date);
        assert_eq!(back.time, local.time);
        assert_eq!(back.duration_minutes, local.duration_minutes);
    }

    #[test]
    fn to_local_clamps_short_durations() {
        let mut remote = sample_remote();
        remote.end = RemoteEventWhen::Timed { at: utc(2024, 5, 1, 10, 5) };
        assert_eq!(to_local(&remote).duration_minutes, 15);
    }

    #[test]
    fn to_local_rounds_duration_to_nearest_minute() {
        let mut remote = sample_remote();
        remote.start = RemoteEventWhen::Timed {
            at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        };
        remote.end = RemoteEventWhen::Timed {
            at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 29, 40).unwrap(),
        };
        assert_eq!(to_local(&remote).duration_minutes, 30);
    }

    #[test]
    fn all_day_events_start_at_midnight() {
        let mut remote = sample_remote();
        remote.start =
            RemoteEventWhen::AllDay { date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() };
        remote.end =
            RemoteEventWhen::AllDay { date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap() };

        let local = to_local(&remote);
        assert_eq!(local.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(local.time, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(local.duration_minutes, 24 * 60);
    }

    #[test]
    fn category_is_inferred_from_title() {
        let local = to_local(&sample_remote());
        assert_eq!(local.category, EventCategory::Appointment);
    }

    #[test]
    fn missing_remote_reminders_default_to_single_notification() {
        let local = to_local(&sample_remote());
        assert_eq!(local.reminders, vec![Reminder::notification(15)]);
    }

    #[test]
    fn import_is_deterministic() {
        let remote = sample_remote();
        let first = to_local(&remote);
        let second = to_local(&remote);
        assert_eq!(first.id, second.id);
        assert_eq!(first.remote_event_id.as_deref(), Some("remote-1"));
    }

    #[test]
    fn to_remote_maps_enabled_reminders_only() {
        let draft = to_remote(&sample_local());
        assert_eq!(draft.reminders.len(), 1);
        assert_eq!(draft.reminders[0].offset_minutes, 15);
    }

    #[test]
    fn to_remote_downgrades_non_confirmed_status() {
        let mut local = sample_local();
        local.status = EventStatus::Cancelled;
        assert_eq!(to_remote(&local).status, RemoteEventStatus::Tentative);

        local.status = EventStatus::Confirmed;
        assert_eq!(to_remote(&local).status, RemoteEventStatus::Confirmed);
    }

    #[test]
    fn apply_remote_copies_schedule_and_content() {
        let mut local = sample_local();
        let remote = sample_remote();

        apply_remote(&mut local, &remote);

        assert_eq!(local.title, "Dentist appointment");
        assert_eq!(local.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(local.time, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(local.duration_minutes, 30);
        assert_eq!(local.updated_at, remote.updated_at);
        // correlation key is never touched by resolution
        assert!(local.remote_event_id.is_none());
    }
}
