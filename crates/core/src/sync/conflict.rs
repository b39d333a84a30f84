//! Conflict detection and resolution for paired events.
//!
//! Classification happens before any mutation; resolution names a winner
//! but deletion conflicts are report-only, since the engine never destroys
//! data without operator confirmation.

use hearth_domain::{CalendarEvent, ConflictKind, RemoteEvent};

use super::translator::remote_schedule;

/// Which side of a paired event wins a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Local,
    Remote,
}

/// What the engine does with a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionAction {
    /// Overwrite the local record with the remote side's values.
    UpdateLocal,
    /// Push the local record's values to the remote calendar.
    UpdateRemote,
    /// Record the conflict only; no mutation on either side.
    Report,
}

/// Outcome of resolving a classified conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub winner: Winner,
    pub action: ResolutionAction,
}

/// Classify a paired event against its fetched remote counterpart.
///
/// Checks run in strict priority order, so a pair that differs in both
/// schedule and content reports `TimeMismatch`, never `ContentMismatch`:
/// 1. remote absent while the correlation key is set → deletion
/// 2. date, time, or duration differ → time mismatch
/// 3. title, location, or notes differ → content mismatch
#[must_use]
pub fn classify(local: &CalendarEvent, remote: Option<&RemoteEvent>) -> Option<ConflictKind> {
    let Some(remote) = remote else {
        return local.remote_event_id.is_some().then_some(ConflictKind::DeletionConflict);
    };

    if schedule_differs(local, remote) {
        return Some(ConflictKind::TimeMismatch);
    }
    if content_differs(local, remote) {
        return Some(ConflictKind::ContentMismatch);
    }
    None
}

/// Resolve a classified conflict.
///
/// Policy: the most recently updated side wins, comparing `updated_at`
/// timestamps; ties favor the remote side, which carries the fresher
/// server-side state. Deletion conflicts resolve to [`ResolutionAction::Report`].
#[must_use]
pub fn resolve(
    kind: ConflictKind,
    local: &CalendarEvent,
    remote: Option<&RemoteEvent>,
) -> Resolution {
    match (kind, remote) {
        (ConflictKind::DeletionConflict, _) | (_, None) => {
            Resolution { winner: Winner::Remote, action: ResolutionAction::Report }
        }
        (_, Some(remote)) => {
            if local.updated_at > remote.updated_at {
                Resolution { winner: Winner::Local, action: ResolutionAction::UpdateRemote }
            } else {
                Resolution { winner: Winner::Remote, action: ResolutionAction::UpdateLocal }
            }
        }
    }
}

fn schedule_differs(local: &CalendarEvent, remote: &RemoteEvent) -> bool {
    let (date, time, duration) = remote_schedule(remote);
    local.date != date || local.time != time || local.duration_minutes != duration
}

fn content_differs(local: &CalendarEvent, remote: &RemoteEvent) -> bool {
    local.title != remote.title
        || local.location != remote.location
        || local.notes != remote.description
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
    use hearth_domain::{
        EventCategory, EventStatus, Priority, RemoteEventStatus, RemoteEventWhen,
    };

    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn paired_local() -> CalendarEvent {
        CalendarEvent {
            id: "local-1".to_string(),
            title: "Dentist".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            duration_minutes: 30,
            location: None,
            notes: None,
            category: EventCategory::Appointment,
            cost: None,
            recurrence_rule: None,
            priority: Priority::Medium,
            status: EventStatus::Confirmed,
            remote_event_id: Some("remote-1".to_string()),
            reminders: Vec::new(),
            attendees: Vec::new(),
            created_at: utc(2024, 4, 1, 0, 0),
            updated_at: utc(2024, 4, 10, 0, 0),
        }
    }

    fn matching_remote() -> RemoteEvent {
        RemoteEvent {
            id: "remote-1".to_string(),
            title: "Dentist".to_string(),
            description: None,
            location: None,
            start: RemoteEventWhen::Timed { at: utc(2024, 5, 1, 10, 0) },
            end: RemoteEventWhen::Timed { at: utc(2024, 5, 1, 10, 30) },
            attendees: Vec::new(),
            reminders: Vec::new(),
            recurrence_rule: None,
            status: RemoteEventStatus::Confirmed,
            created_at: utc(2024, 4, 1, 0, 0),
            updated_at: utc(2024, 4, 10, 0, 0),
            etag: None,
        }
    }

    #[test]
    fn identical_pair_classifies_as_none() {
        assert_eq!(classify(&paired_local(), Some(&matching_remote())), None);
    }

    #[test]
    fn missing_remote_is_a_deletion_conflict() {
        assert_eq!(
            classify(&paired_local(), None),
            Some(ConflictKind::DeletionConflict)
        );
    }

    #[test]
    fn unpaired_local_without_remote_is_not_a_conflict() {
        let mut local = paired_local();
        local.remote_event_id = None;
        assert_eq!(classify(&local, None), None);
    }

    #[test]
    fn schedule_difference_classifies_as_time_mismatch() {
        let mut remote = matching_remote();
        remote.start = RemoteEventWhen::Timed { at: utc(2024, 5, 1, 11, 0) };
        remote.end = RemoteEventWhen::Timed { at: utc(2024, 5, 1, 11, 30) };
        assert_eq!(
            classify(&paired_local(), Some(&remote)),
            Some(ConflictKind::TimeMismatch)
        );
    }

    #[test]
    fn time_mismatch_shadows_content_mismatch() {
        let mut remote = matching_remote();
        remote.title = "Dentist (rescheduled)".to_string();
        remote.start = RemoteEventWhen::Timed { at: utc(2024, 5, 2, 10, 0) };
        remote.end = RemoteEventWhen::Timed { at: utc(2024, 5, 2, 10, 30) };
        assert_eq!(
            classify(&paired_local(), Some(&remote)),
            Some(ConflictKind::TimeMismatch)
        );
    }

    #[test]
    fn content_difference_classifies_as_content_mismatch() {
        let mut remote = matching_remote();
        remote.location = Some("new office".to_string());
        assert_eq!(
            classify(&paired_local(), Some(&remote)),
            Some(ConflictKind::ContentMismatch)
        );
    }

    #[test]
    fn fresher_remote_wins() {
        let local = paired_local();
        let mut remote = matching_remote();
        remote.updated_at = local.updated_at + chrono::Duration::hours(1);

        let resolution = resolve(ConflictKind::ContentMismatch, &local, Some(&remote));
        assert_eq!(resolution.winner, Winner::Remote);
        assert_eq!(resolution.action, ResolutionAction::UpdateLocal);
    }

    #[test]
    fn fresher_local_wins() {
        let mut local = paired_local();
        let remote = matching_remote();
        local.updated_at = remote.updated_at + chrono::Duration::hours(1);

        let resolution = resolve(ConflictKind::TimeMismatch, &local, Some(&remote));
        assert_eq!(resolution.winner, Winner::Local);
        assert_eq!(resolution.action, ResolutionAction::UpdateRemote);
    }

    #[test]
    fn equal_timestamps_favor_remote() {
        let local = paired_local();
        let remote = matching_remote();
        assert_eq!(local.updated_at, remote.updated_at);

        let resolution = resolve(ConflictKind::ContentMismatch, &local, Some(&remote));
        assert_eq!(resolution.winner, Winner::Remote);
    }

    #[test]
    fn deletion_conflicts_are_report_only() {
        let resolution = resolve(ConflictKind::DeletionConflict, &paired_local(), None);
        assert_eq!(resolution.action, ResolutionAction::Report);
    }
}
