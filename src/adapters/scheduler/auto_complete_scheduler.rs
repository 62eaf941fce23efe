//! AutoCompleteScheduler - Background service that sweeps overdue sessions.
//!
//! Wakes up every interval and runs one auto-complete sweep. The scheduler
//! is either stopped or running; starting a running scheduler and stopping a
//! stopped one are no-ops, so there is never more than one timer.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `interval` | 2 min | Time between sweeps; the first sweep runs one interval after start |
//!
//! ## Failure handling
//!
//! A failed sweep is logged and dropped. The scheduler stays running and the
//! next tick sweeps again.
//!
//! ## Overlap and shutdown
//!
//! Sweeps are serialized by a lock shared with [`AutoCompleteScheduler::sweep_once`].
//! Ticks missed while a sweep is still running collapse into a single
//! catch-up sweep, after which the schedule realigns to the interval. Stopping
//! prevents further sweeps from starting but lets an in-flight sweep finish;
//! [`AutoCompleteScheduler::shutdown`] also waits for it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::application::handlers::{AutoCompleteSessionsHandler, AutoCompleteSessionsResult};
use crate::domain::counseling::AutoCompletePolicy;
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::CounselingSessionStore;

/// Configuration for the AutoCompleteScheduler service.
#[derive(Debug, Clone)]
pub struct AutoCompleteSchedulerConfig {
    /// Time between sweeps.
    pub interval: Duration,
}

impl Default for AutoCompleteSchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2 * 60),
        }
    }
}

impl AutoCompleteSchedulerConfig {
    /// Create config with custom interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Read-only view of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchedulerStatus {
    pub running: bool,
    pub interval_minutes: u64,
}

/// Sweep logic shared by the timer task and manual triggers.
struct Sweeper {
    handler: AutoCompleteSessionsHandler,
    sweep_lock: tokio::sync::Mutex<()>,
}

impl Sweeper {
    async fn sweep(&self) -> Result<AutoCompleteSessionsResult, DomainError> {
        let _guard = self.sweep_lock.lock().await;
        self.handler.handle(Timestamp::now()).await
    }

    async fn run(self: Arc<Self>, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let first_tick = match Instant::now().checked_add(period) {
            Some(at) if !period.is_zero() => at,
            _ => {
                error!(?period, "Auto-complete interval out of range, scheduler not running");
                return;
            }
        };
        let mut ticker = time::interval_at(first_tick, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    // Err means the sender is gone, which only happens on stop
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }

                _ = ticker.tick() => {
                    if *shutdown.borrow() {
                        break;
                    }
                    match self.sweep().await {
                        Ok(result) => debug!(
                            examined = result.examined,
                            completed = result.completed,
                            skipped_malformed = result.skipped_malformed,
                            "Scheduled auto-complete sweep ran"
                        ),
                        Err(e) => error!(error = %e, "Scheduled auto-complete sweep failed"),
                    }
                }
            }
        }

        debug!("Auto-complete scheduler loop exited");
    }
}

struct RunningSweeper {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Background service that periodically auto-completes overdue sessions.
pub struct AutoCompleteScheduler {
    sweeper: Arc<Sweeper>,
    config: AutoCompleteSchedulerConfig,
    running: Mutex<Option<RunningSweeper>>,
}

impl AutoCompleteScheduler {
    /// Create a new scheduler with default configuration.
    pub fn new(store: Arc<dyn CounselingSessionStore>, policy: AutoCompletePolicy) -> Self {
        Self::with_config(store, policy, AutoCompleteSchedulerConfig::default())
    }

    /// Create a new scheduler with custom configuration.
    pub fn with_config(
        store: Arc<dyn CounselingSessionStore>,
        policy: AutoCompletePolicy,
        config: AutoCompleteSchedulerConfig,
    ) -> Self {
        Self {
            sweeper: Arc::new(Sweeper {
                handler: AutoCompleteSessionsHandler::new(store, policy),
                sweep_lock: tokio::sync::Mutex::new(()),
            }),
            config,
            running: Mutex::new(None),
        }
    }

    /// Start the timer.
    ///
    /// Returns `false` without side effects when already running. Must be
    /// called from within a Tokio runtime.
    pub fn start(&self) -> bool {
        let mut running = self.lock_state();
        if running.is_some() {
            debug!("Auto-complete scheduler already running");
            return false;
        }

        let (shutdown, receiver) = watch::channel(false);
        let task = tokio::spawn(
            Arc::clone(&self.sweeper).run(self.config.interval, receiver),
        );
        *running = Some(RunningSweeper { shutdown, task });

        info!(
            interval_secs = self.config.interval.as_secs(),
            "Auto-complete scheduler started"
        );
        true
    }

    /// Stop the timer.
    ///
    /// Returns `false` when already stopped. A sweep in progress is allowed
    /// to finish; no further sweep starts.
    pub fn stop(&self) -> bool {
        let Some(running) = self.lock_state().take() else {
            debug!("Auto-complete scheduler already stopped");
            return false;
        };

        // The receiver may already be gone if the task ended; nothing to signal then.
        let _ = running.shutdown.send(true);
        info!("Auto-complete scheduler stopped");
        true
    }

    /// Stop the timer and wait for the background task to exit.
    pub async fn shutdown(&self) {
        let Some(running) = self.lock_state().take() else {
            return;
        };

        let _ = running.shutdown.send(true);
        if let Err(e) = running.task.await {
            warn!(error = %e, "Auto-complete scheduler task did not exit cleanly");
        }
        info!("Auto-complete scheduler shut down");
    }

    pub fn is_running(&self) -> bool {
        self.lock_state().is_some()
    }

    pub fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            running: self.is_running(),
            interval_minutes: self.config.interval.as_secs() / 60,
        }
    }

    /// Run exactly one sweep now, outside the timer.
    ///
    /// Waits for any in-flight scheduled sweep first.
    pub async fn sweep_once(&self) -> Result<AutoCompleteSessionsResult, DomainError> {
        self.sweeper.sweep().await
    }

    fn lock_state(&self) -> MutexGuard<'_, Option<RunningSweeper>> {
        // State stays consistent even if a holder panicked: it is a plain Option swap.
        self.running.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for AutoCompleteScheduler {
    fn drop(&mut self) {
        if let Some(running) = self.lock_state().take() {
            let _ = running.shutdown.send(true);
        }
    }
}
