//! Interval-based auto-sync scheduler.
//!
//! Honors `SyncSettings::auto_sync` and `sync_interval_minutes`: each tick
//! loads the caller-owned state through the `SyncStateStore` port, runs a
//! sync pass, and commits the mutated state plus the outcome back. Settings
//! are re-read every tick, so interval changes take effect without a
//! restart.

use std::sync::Arc;
use std::time::Duration;

use hearth_core::SyncStateStore;
use hearth_domain::constants::DEFAULT_SYNC_INTERVAL_MINUTES;
use hearth_domain::{Result, SyncError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::calendar::CalendarSyncService;

/// Auto-sync scheduler for one account's sync service.
pub struct AutoSyncScheduler {
    service: Arc<CalendarSyncService>,
    store: Arc<dyn SyncStateStore>,
    cancellation_token: CancellationToken,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl AutoSyncScheduler {
    /// Create a scheduler over the given service and state store.
    #[must_use]
    pub fn new(service: Arc<CalendarSyncService>, store: Arc<dyn SyncStateStore>) -> Self {
        Self {
            service,
            store,
            cancellation_token: CancellationToken::new(),
            task_handle: Mutex::new(None),
        }
    }

    /// Start the background loop.
    ///
    /// # Errors
    /// Returns `Rejected` if the scheduler is already running.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(SyncError::Rejected(
                "auto-sync scheduler is already running".to_string(),
            ));
        }

        info!("starting auto-sync scheduler");

        // Fresh token so the scheduler supports restart after stop.
        self.cancellation_token = CancellationToken::new();

        let service = Arc::clone(&self.service);
        let store = Arc::clone(&self.store);
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::run_loop(service, store, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);
        Ok(())
    }

    /// Stop the background loop gracefully.
    ///
    /// # Errors
    /// Returns `Rejected` if the scheduler is not running, `Internal` when
    /// the task does not stop within the join timeout.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> Result<()> {
        if !self.is_running() {
            return Err(SyncError::Rejected("auto-sync scheduler is not running".to_string()));
        }

        info!("stopping auto-sync scheduler");
        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = Duration::from_secs(5);
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| {
                    SyncError::Internal("auto-sync task did not stop within timeout".to_string())
                })?
                .map_err(|err| SyncError::Internal(format!("auto-sync task panicked: {err}")))?;
        }

        Ok(())
    }

    /// Whether the background task is alive.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    async fn run_loop(
        service: Arc<CalendarSyncService>,
        store: Arc<dyn SyncStateStore>,
        cancel: CancellationToken,
    ) {
        let mut wait = Duration::from_secs(u64::from(DEFAULT_SYNC_INTERVAL_MINUTES) * 60);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("auto-sync loop cancelled");
                    break;
                }
                () = tokio::time::sleep(wait) => {
                    match Self::tick(&service, &store).await {
                        Ok(next_wait) => wait = next_wait,
                        Err(err) => error!(error = %err, "auto-sync tick failed"),
                    }
                }
            }
        }
    }

    /// One scheduler tick. Returns the wait until the next one.
    async fn tick(
        service: &CalendarSyncService,
        store: &Arc<dyn SyncStateStore>,
    ) -> Result<Duration> {
        let (mut settings, mut events) = store.load().await?;
        let interval =
            Duration::from_secs(u64::from(settings.sync_interval_minutes.max(1)) * 60);

        if !settings.enabled || !settings.auto_sync {
            debug!("auto-sync disabled in settings; skipping tick");
            return Ok(interval);
        }

        let outcome = service.sync(&mut settings, &mut events).await?;
        info!(
            imported = outcome.imported_count,
            exported = outcome.exported_count,
            updated = outcome.updated_count,
            success = outcome.success,
            "auto-sync pass completed"
        );

        store.commit(settings, events, &outcome).await?;
        Ok(interval)
    }
}
