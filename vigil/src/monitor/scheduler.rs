//! Timer-driven polling of all tracked accounts.
//!
//! One cycle walks the tracked accounts sequentially, asks each platform's
//! checker for live status and feeds the observation to the tracker; an
//! offline-to-live transition hands a payload to the notification channel.
//! Per-account failures are logged and never abort the cycle. Cycles are
//! awaited inside the timer loop, so two cycles can never overlap; a tick
//! that would fire mid-cycle is skipped rather than queued.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use platforms_probe::CheckerRegistry;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::tracker::{LiveStatusTracker, Transition};
use crate::Result;
use crate::notification::{LiveEvent, NotificationChannel};
use crate::store::{AccountKey, TrackedAccount, TrackingStore};

/// Configuration for the polling scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time between poll cycles.
    pub poll_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Before the first run, and after stop.
    Idle,
    /// Periodic timer active.
    Running,
}

pub struct PollingScheduler<S: TrackingStore> {
    store: Arc<S>,
    registry: Arc<CheckerRegistry>,
    channel: Arc<dyn NotificationChannel>,
    tracker: Mutex<LiveStatusTracker>,
    state: Mutex<SchedulerState>,
    config: SchedulerConfig,
}

impl<S: TrackingStore> PollingScheduler<S> {
    pub fn new(
        store: Arc<S>,
        registry: Arc<CheckerRegistry>,
        channel: Arc<dyn NotificationChannel>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            store,
            registry,
            channel,
            tracker: Mutex::new(LiveStatusTracker::new()),
            state: Mutex::new(SchedulerState::Idle),
            config,
        }
    }

    pub async fn state(&self) -> SchedulerState {
        *self.state.lock().await
    }

    pub async fn is_running(&self) -> bool {
        self.state().await == SchedulerState::Running
    }

    /// Run until cancelled: one immediate cycle, then one per interval.
    ///
    /// Cancellation is observed between cycles; an in-flight cycle finishes
    /// naturally since every account check is already fault-isolated.
    pub async fn run(&self, cancel: CancellationToken) {
        {
            let mut state = self.state.lock().await;
            if *state == SchedulerState::Running {
                warn!("scheduler already running, ignoring start");
                return;
            }
            *state = SchedulerState::Running;
        }

        info!(interval = ?self.config.poll_interval, "polling scheduler started");

        // The first tick fires immediately; a tick that lands while a cycle
        // is still in flight is skipped instead of bursting.
        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("polling scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.run_cycle().await;
                }
            }
        }

        *self.state.lock().await = SchedulerState::Idle;
    }

    /// One full check cycle over all tracked accounts.
    pub async fn run_cycle(&self) {
        let accounts = match self.store.list().await {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!(error = %e, "failed to enumerate tracked accounts, skipping cycle");
                return;
            }
        };

        // Accounts removed out-of-band must not leak state into a re-add.
        let tracked: HashSet<AccountKey> = accounts.iter().map(|a| a.key()).collect();
        self.tracker.lock().await.retain_keys(&tracked);

        debug!(accounts = accounts.len(), "poll cycle started");
        for account in &accounts {
            self.check_account(account).await;
        }
        debug!("poll cycle finished");
    }

    async fn check_account(&self, account: &TrackedAccount) {
        let key = account.key();
        let Some(checker) = self.registry.get(account.platform) else {
            warn!(account = %key, "no checker registered for platform");
            return;
        };

        let mut resolved_id = account.resolved_id.clone();
        let observed = match checker
            .check_live(&account.username, resolved_id.as_deref())
            .await
        {
            Ok(check) => {
                if let Some(id) = check.resolved_id {
                    // Persist before evaluating so later cycles skip resolution.
                    let mut updated = account.clone();
                    updated.resolved_id = Some(id.clone());
                    if let Err(e) = self.store.put(updated).await {
                        warn!(account = %key, error = %e, "failed to persist resolved id");
                    }
                    resolved_id = Some(id);
                }
                check.live
            }
            Err(e) => {
                warn!(account = %key, error = %e, "live check failed");
                false
            }
        };

        let transition = self.tracker.lock().await.evaluate(key.clone(), observed);
        match transition {
            Transition::WentLive => {
                let live_url = checker.live_url(&account.username, resolved_id.as_deref());
                info!(account = %key, url = %live_url, "went live");

                let event = LiveEvent::new(account.display_name.clone(), account.platform, live_url);
                if let Err(e) = self.channel.send(&event).await {
                    warn!(account = %key, error = %e, "failed to send live notification");
                }
            }
            Transition::WentOffline => {
                info!(account = %key, "went offline");
            }
            Transition::None => {}
        }
    }

    /// Remove an account and its live state in one operation.
    ///
    /// Returns whether the account was tracked.
    pub async fn untrack(&self, key: &AccountKey) -> Result<bool> {
        let existed = self.store.delete(key).await?;
        self.tracker.lock().await.remove(key);
        Ok(existed)
    }
}
