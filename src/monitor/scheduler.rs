//! Monitor scheduler - owns the run state and drives fetch cycles
//!
//! One [`Monitor`] instance runs at most one cycle at a time: the cycle
//! loop is serial, and the timer is re-armed only after a cycle completes,
//! so ticks cannot stack however slow the source is. `stop()` prevents any
//! future tick from starting a cycle; a fetch already in flight finishes
//! and its result is discarded.

use crate::catalog::{Catalog, InsertOutcome};
use crate::config::{validate_monitor_config, MonitorConfig};
use crate::monitor::dedup::filter_new;
use crate::monitor::extractor::extract_papers;
use crate::monitor::fetcher::{build_http_client, fetch_with_retry};
use crate::notify::{summarize_title, Notifier};
use crate::state::RunState;
use crate::ConfigError;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use url::Url;

/// Stop signal shared between a Monitor handle and its cycle task
struct StopSignal {
    flag: AtomicBool,
    wakeup: Notify,
}

impl StopSignal {
    fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
            wakeup: Notify::new(),
        }
    }

    fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
        // notify_one stores a permit, so a trigger landing before the loop
        // reaches its select still wakes it
        self.wakeup.notify_one();
    }

    fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// State shared between the Monitor handle and the cycle task
struct MonitorShared {
    state: Mutex<RunState>,
    last_checked_at: Mutex<Option<DateTime<Utc>>>,
    config: Mutex<Option<MonitorConfig>>,
}

/// A running cycle task and its stop signal
struct RunningTask {
    stop: Arc<StopSignal>,
    handle: JoinHandle<()>,
}

/// The monitoring engine
///
/// Owns the run state and the periodic cycle task. The catalog and the
/// notifier are supplied by the caller; there is no global instance.
pub struct Monitor<C, N> {
    catalog: Arc<Mutex<C>>,
    notifier: Arc<N>,
    shared: Arc<MonitorShared>,
    task: Option<RunningTask>,
}

impl<C, N> Monitor<C, N>
where
    C: Catalog + Send + 'static,
    N: Notifier + 'static,
{
    /// Creates a stopped monitor over the given catalog and notifier
    pub fn new(catalog: C, notifier: N) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
            notifier: Arc::new(notifier),
            shared: Arc::new(MonitorShared {
                state: Mutex::new(RunState::Idle),
                last_checked_at: Mutex::new(None),
                config: Mutex::new(None),
            }),
            task: None,
        }
    }

    /// Starts monitoring: one cycle immediately, then one per interval
    ///
    /// A no-op when already running. Restarting after an error halt is
    /// allowed and clears the error state on the first cycle.
    pub fn start(&mut self, config: MonitorConfig) -> Result<(), ConfigError> {
        validate_monitor_config(&config)?;

        if self.is_running() {
            tracing::info!("Monitor already running");
            return Ok(());
        }
        self.task = None;

        *self.shared.config.lock().unwrap() = Some(config);

        let stop = Arc::new(StopSignal::new());
        let handle = tokio::spawn(run_loop(
            Arc::clone(&self.catalog),
            Arc::clone(&self.notifier),
            Arc::clone(&self.shared),
            Arc::clone(&stop),
        ));
        self.task = Some(RunningTask { stop, handle });

        Ok(())
    }

    /// Halts future cycles; a cycle already in flight is not aborted, its
    /// result is discarded
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.stop.trigger();
        }
        set_state(&self.shared, self.notifier.as_ref(), RunState::Idle);
    }

    /// `stop()` plus clearing the last-checked timestamp
    pub fn reset(&mut self) {
        self.stop();
        *self.shared.last_checked_at.lock().unwrap() = None;
    }

    /// Replaces the configuration; takes effect on the next scheduled tick
    ///
    /// A timer already armed with the old interval is never re-armed
    /// mid-wait.
    pub fn update_config(&self, config: MonitorConfig) -> Result<(), ConfigError> {
        validate_monitor_config(&config)?;
        *self.shared.config.lock().unwrap() = Some(config);
        Ok(())
    }

    /// Runs a single cycle to completion without starting the periodic loop
    pub async fn run_once(&self, config: MonitorConfig) -> Result<(), ConfigError> {
        validate_monitor_config(&config)?;
        let stop = StopSignal::new();
        run_cycle(
            &self.catalog,
            self.notifier.as_ref(),
            &self.shared,
            &stop,
            &config,
        )
        .await;
        Ok(())
    }

    pub fn state(&self) -> RunState {
        *self.shared.state.lock().unwrap()
    }

    /// When the engine last *attempted* a cycle, successful or not
    pub fn last_checked_at(&self) -> Option<DateTime<Utc>> {
        *self.shared.last_checked_at.lock().unwrap()
    }

    pub fn is_running(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| !task.handle.is_finished())
            .unwrap_or(false)
    }
}

/// Applies a state transition and reports it, skipping no-op writes
fn set_state<N: Notifier>(shared: &MonitorShared, notifier: &N, new: RunState) {
    let changed = {
        let mut state = shared.state.lock().unwrap();
        if *state != new {
            *state = new;
            true
        } else {
            false
        }
    };

    if changed {
        notifier.status_changed(new);
    }
}

/// The periodic cycle loop
///
/// The active config snapshot is re-read at the top of each tick, so a
/// replaced target URL governs the next fetch; the sleep is armed with the
/// interval configured at arm time.
async fn run_loop<C, N>(
    catalog: Arc<Mutex<C>>,
    notifier: Arc<N>,
    shared: Arc<MonitorShared>,
    stop: Arc<StopSignal>,
) where
    C: Catalog + Send + 'static,
    N: Notifier + 'static,
{
    loop {
        let config = match shared.config.lock().unwrap().clone() {
            Some(config) => config,
            None => break,
        };

        run_cycle(&catalog, notifier.as_ref(), &shared, &stop, &config).await;

        if stop.is_stopped() {
            break;
        }

        // Retries exhausted: halt until an explicit start() or reset()
        if shared.state.lock().unwrap().is_error() {
            break;
        }

        let interval_secs = shared
            .config
            .lock()
            .unwrap()
            .as_ref()
            .map(|c| c.check_interval_secs)
            .unwrap_or(config.check_interval_secs);

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(interval_secs)) => {}
            _ = stop.wakeup.notified() => {}
        }

        if stop.is_stopped() {
            break;
        }
    }
}

/// One fetch → extract → dedup → persist pass
async fn run_cycle<C, N>(
    catalog: &Arc<Mutex<C>>,
    notifier: &N,
    shared: &MonitorShared,
    stop: &StopSignal,
    config: &MonitorConfig,
) where
    C: Catalog,
    N: Notifier,
{
    set_state(shared, notifier, RunState::Fetching);
    *shared.last_checked_at.lock().unwrap() = Some(Utc::now());

    let client = match build_http_client(config) {
        Ok(client) => client,
        Err(e) => {
            notifier.cycle_failed(&e);
            set_state(shared, notifier, RunState::Error);
            return;
        }
    };

    let body = match fetch_with_retry(&client, &config.target_url, config.max_retries).await {
        Ok(body) => body,
        Err(e) => {
            if stop.is_stopped() {
                return;
            }
            notifier.cycle_failed(&e);
            set_state(shared, notifier, RunState::Error);
            return;
        }
    };

    // A stop issued during the fetch makes this cycle's result a no-op
    if stop.is_stopped() {
        return;
    }

    let base_url = match Url::parse(&config.target_url) {
        Ok(url) => url,
        Err(e) => {
            // Config validation makes this unreachable in practice
            tracing::error!("Invalid target URL '{}': {}", config.target_url, e);
            set_state(shared, notifier, RunState::Error);
            return;
        }
    };

    let batch = extract_papers(&body, &base_url);
    tracing::debug!(
        "Extracted {} entries ({} skipped) from {}",
        batch.papers.len(),
        batch.skipped,
        config.target_url
    );

    let fresh = {
        let catalog = catalog.lock().unwrap();
        filter_new(batch.papers, |fingerprint| catalog.exists(fingerprint))
    };
    let fresh = match fresh {
        Ok(fresh) => fresh,
        Err(e) => {
            // A catalog read failure ends this cycle quietly; the next tick
            // gets a clean attempt
            tracing::warn!("Catalog lookup failed: {}", e);
            set_state(shared, notifier, RunState::Monitoring);
            return;
        }
    };

    let mut ingested = 0usize;
    for paper in fresh {
        let outcome = catalog.lock().unwrap().insert(&paper);
        match outcome {
            Ok(InsertOutcome::Inserted(id)) => {
                ingested += 1;
                tracing::info!("Ingested paper {}: {}", id, paper.title);
                if config.notifications_enabled {
                    notifier.paper_discovered(&paper, &summarize_title(&paper.title));
                }
            }
            Ok(InsertOutcome::AlreadyPresent) => {
                tracing::debug!("Paper already cataloged: {}", paper.title);
            }
            Err(e) => {
                // Skip this record only; the rest of the batch still lands
                tracing::warn!("Failed to persist '{}': {}", paper.title, e);
            }
        }
    }

    if ingested > 0 {
        tracing::info!("Cycle complete: {} new papers", ingested);
    } else {
        tracing::debug!("Cycle complete: no new papers");
    }

    if !stop.is_stopped() {
        set_state(shared, notifier, RunState::Monitoring);
    }
}
