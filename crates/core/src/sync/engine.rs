//! Sync orchestration.
//!
//! Turns a sync request into a [`SyncResult`] over the injected ports.
//! Phases run in a fixed order: authenticate, fetch remote, reconcile
//! paired events, import remote-only events, export local-only events,
//! finalize. Only the authentication phase may fail the call outright;
//! every later failure is isolated to its event and recorded, so partial
//! success is a normal outcome.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use hearth_domain::constants::{SYNC_WINDOW_LOOKAHEAD_DAYS, SYNC_WINDOW_LOOKBACK_DAYS};
use hearth_domain::{
    CalendarEvent, CalendarInfo, RemoteEvent, Result, SyncConflict, SyncDirection, SyncError,
    SyncResult, SyncSettings,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::conflict::{classify, resolve, ResolutionAction};
use super::ports::{RemoteCalendar, TokenProvider};
use super::translator::{apply_remote, to_local, to_remote};

/// Mutable state threaded through the phases of one sync run.
struct SyncPass {
    result: SyncResult,
    halted: bool,
    fetch_complete: bool,
    deadline: Option<Instant>,
}

impl SyncPass {
    fn new(deadline: Option<Instant>) -> Self {
        Self { result: SyncResult::default(), halted: false, fetch_complete: true, deadline }
    }

    /// Whether the run should stop issuing remote calls. Records the
    /// deadline error the first time the deadline trips.
    fn should_stop(&mut self) -> bool {
        if self.halted {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                warn!("sync deadline exceeded; returning accumulated result");
                self.result.record_error("sync deadline exceeded; returning partial result");
                self.halted = true;
                return true;
            }
        }
        false
    }

    /// Record a per-event failure. An unauthorized response converts the
    /// remaining phases into early termination while the accumulated result
    /// is still returned.
    fn record_failure(&mut self, context: &str, err: &SyncError) {
        self.result.record_error(format!("{context}: {err}"));
        if matches!(err, SyncError::ReauthRequired(_)) {
            warn!(context, "remote rejected credentials mid-sync; terminating remaining phases");
            self.halted = true;
        }
    }
}

/// Bidirectional calendar sync engine for one account.
///
/// Owns no storage: settings and the local event collection are borrowed
/// from the caller and mutated in place (correlation keys stamped, conflict
/// winners applied), while imported records are returned in the result for
/// the caller to persist.
pub struct SyncEngine {
    tokens: Arc<dyn TokenProvider>,
    calendar: Arc<dyn RemoteCalendar>,
    in_flight: Mutex<()>,
    deadline: Option<Duration>,
}

impl SyncEngine {
    /// Create an engine over the given ports.
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenProvider>, calendar: Arc<dyn RemoteCalendar>) -> Self {
        Self { tokens, calendar, in_flight: Mutex::new(()), deadline: None }
    }

    /// Impose an overall deadline on each `sync` call. When it trips, the
    /// engine stops issuing remote calls and returns the partial result.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Run one synchronization pass.
    ///
    /// A concurrent call for the same engine is rejected rather than
    /// interleaved: both would race on the same correlation-key
    /// assignments.
    ///
    /// # Errors
    /// `Rejected` when a sync is already in flight; `ReauthRequired` when
    /// authentication fails before any remote work begins. Every other
    /// failure is recorded in the result's `errors` instead.
    #[instrument(skip_all, fields(direction = ?settings.sync_direction, calendars = settings.selected_calendar_ids.len()))]
    pub async fn sync(
        &self,
        settings: &mut SyncSettings,
        local_events: &mut Vec<CalendarEvent>,
    ) -> Result<SyncResult> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            return Err(SyncError::Rejected(
                "a sync for this account is already in flight".to_string(),
            ));
        };

        let mut pass = SyncPass::new(self.deadline.map(|d| Instant::now() + d));

        if !settings.enabled {
            debug!("sync disabled in settings; skipping");
            pass.result.finalize();
            return Ok(pass.result);
        }

        // Phase 1: authenticate. The only phase allowed to fail the call.
        self.tokens.ensure_valid().await?;

        let remote_events = if settings.sync_direction.imports() {
            self.fetch_remote(settings, &mut pass).await
        } else {
            Vec::new()
        };

        if settings.sync_direction == SyncDirection::Both {
            self.reconcile(&remote_events, local_events, &mut pass).await;
        }

        if settings.sync_direction.imports() {
            Self::import_remote_only(&remote_events, local_events, &mut pass);
        }

        if settings.sync_direction.exports() {
            self.export_local_only(settings, local_events, &mut pass).await;
        }

        // Phase 6: best-effort finalize, even after early termination.
        settings.last_sync_at = Some(Utc::now());
        let mut result = pass.result;
        result.finalize();

        info!(
            imported = result.imported_count,
            exported = result.exported_count,
            updated = result.updated_count,
            conflicts = result.conflicts.len(),
            errors = result.errors.len(),
            "calendar sync completed"
        );

        Ok(result)
    }

    /// Export one event immediately, outside a full sync pass.
    ///
    /// Idempotent: an event that already carries a correlation key returns
    /// it without a remote call.
    ///
    /// # Errors
    /// Propagates authentication and create failures.
    pub async fn export_single_event(
        &self,
        calendar_id: &str,
        event: &mut CalendarEvent,
    ) -> Result<String> {
        if let Some(existing) = &event.remote_event_id {
            return Ok(existing.clone());
        }

        self.tokens.ensure_valid().await?;
        let created = self.calendar.create_event(calendar_id, &to_remote(event)).await?;
        event.remote_event_id = Some(created.id.clone());

        debug!(event_id = %event.id, remote_event_id = %created.id, "exported single event");
        Ok(created.id)
    }

    /// List the calendars visible to the authenticated account.
    ///
    /// # Errors
    /// Propagates authentication and API failures.
    pub async fn get_calendar_list(&self) -> Result<Vec<CalendarInfo>> {
        self.tokens.ensure_valid().await?;
        self.calendar.list_calendars().await
    }

    /// Whether the account currently holds a usable credential.
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated().await
    }

    /// Revoke and clear the account's credentials.
    ///
    /// # Errors
    /// Propagates local credential-clearing failures only.
    pub async fn disconnect(&self) -> Result<()> {
        self.tokens.revoke().await
    }

    /// Phase 2: fetch remote events for every selected calendar over the
    /// fixed window relative to now.
    async fn fetch_remote(
        &self,
        settings: &SyncSettings,
        pass: &mut SyncPass,
    ) -> Vec<(String, RemoteEvent)> {
        let now = Utc::now();
        let time_min = now - chrono::Duration::days(SYNC_WINDOW_LOOKBACK_DAYS);
        let time_max = now + chrono::Duration::days(SYNC_WINDOW_LOOKAHEAD_DAYS);

        let mut fetched = Vec::new();
        for calendar_id in &settings.selected_calendar_ids {
            if pass.should_stop() {
                pass.fetch_complete = false;
                break;
            }
            match self.calendar.list_events(calendar_id, time_min, time_max).await {
                Ok(events) => {
                    debug!(%calendar_id, count = events.len(), "fetched remote events");
                    fetched.extend(events.into_iter().map(|e| (calendar_id.clone(), e)));
                }
                Err(err) => {
                    pass.fetch_complete = false;
                    pass.record_failure(
                        &format!("failed to fetch events from calendar {calendar_id}"),
                        &err,
                    );
                }
            }
        }
        fetched
    }

    /// Phase 3: classify and resolve every paired event.
    async fn reconcile(
        &self,
        remote_events: &[(String, RemoteEvent)],
        local_events: &mut [CalendarEvent],
        pass: &mut SyncPass,
    ) {
        if pass.halted {
            return;
        }

        let by_remote_id: HashMap<&str, &(String, RemoteEvent)> =
            remote_events.iter().map(|entry| (entry.1.id.as_str(), entry)).collect();

        for local in local_events.iter_mut() {
            if pass.halted {
                break;
            }
            let Some(remote_id) = local.remote_event_id.clone() else {
                continue;
            };

            let pair = by_remote_id.get(remote_id.as_str());
            let remote = pair.map(|(_, remote)| remote);

            // Absence only means deletion when every selected calendar
            // answered; after a failed fetch the pair may simply be unseen.
            if remote.is_none() && !pass.fetch_complete {
                continue;
            }

            let Some(kind) = classify(local, remote) else {
                continue;
            };

            // One conflict entry per paired event per call.
            pass.result.conflicts.push(SyncConflict {
                local_event: local.clone(),
                remote_event: remote.cloned(),
                kind,
            });

            let resolution = resolve(kind, local, remote);
            match resolution.action {
                ResolutionAction::Report => {
                    warn!(event_id = %local.id, ?kind, "conflict reported; no automatic resolution");
                }
                ResolutionAction::UpdateLocal => {
                    if let Some(remote) = remote {
                        apply_remote(local, remote);
                        pass.result.updated_count += 1;
                    }
                }
                ResolutionAction::UpdateRemote => {
                    if pass.should_stop() {
                        break;
                    }
                    let Some((calendar_id, _)) = pair else {
                        continue;
                    };
                    match self
                        .calendar
                        .update_event(calendar_id, &remote_id, &to_remote(local))
                        .await
                    {
                        Ok(_) => pass.result.updated_count += 1,
                        Err(err) => pass.record_failure(
                            &format!("failed to update remote event {remote_id}"),
                            &err,
                        ),
                    }
                }
            }
        }
    }

    /// Phase 4: count remote-only events into the result for the caller to
    /// persist. The engine does not write them anywhere itself.
    fn import_remote_only(
        remote_events: &[(String, RemoteEvent)],
        local_events: &[CalendarEvent],
        pass: &mut SyncPass,
    ) {
        if pass.halted {
            return;
        }

        let known: HashSet<&str> =
            local_events.iter().filter_map(|e| e.remote_event_id.as_deref()).collect();

        let mut seen = HashSet::new();
        for (_, remote) in remote_events {
            if known.contains(remote.id.as_str()) || !seen.insert(remote.id.as_str()) {
                continue;
            }
            pass.result.imported_events.push(to_local(remote));
            pass.result.imported_count += 1;
        }
    }

    /// Phase 5: push local-only events to the first selected calendar.
    async fn export_local_only(
        &self,
        settings: &SyncSettings,
        local_events: &mut [CalendarEvent],
        pass: &mut SyncPass,
    ) {
        let Some(target) = settings.selected_calendar_ids.first() else {
            debug!("no calendar selected; nothing to export");
            return;
        };

        for local in local_events.iter_mut() {
            if pass.should_stop() {
                break;
            }
            if local.remote_event_id.is_some() {
                continue;
            }
            match self.calendar.create_event(target, &to_remote(local)).await {
                Ok(created) => {
                    local.remote_event_id = Some(created.id);
                    pass.result.exported_count += 1;
                }
                Err(err) => {
                    pass.record_failure(&format!("failed to export event {}", local.id), &err);
                }
            }
        }
    }
}
