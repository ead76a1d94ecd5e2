//! Refresh Scheduler
//!
//! Drives fetch -> reconcile -> render cycles: one immediately on start, then
//! one per interval tick until stopped.
//!
//! Guarantees:
//! - cycles never overlap; a cycle lock is held from fetch through render
//! - missed ticks are skipped, not queued
//! - stopping never cancels an in-flight fetch; its result is discarded when
//!   it returns to a scheduler that is no longer running the same generation

use crate::clock::Clock;
use crate::error::FetchError;
use crate::fetch::FeedFetcher;
use crate::render::RenderAdapter;
use newsgraph_core::{GraphSnapshot, GraphStore, ReconcileReport, Reconciler};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Shortest accepted tick interval
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// No timer armed
    #[default]
    Idle,
    /// Timer armed; cycles run on every tick
    Running,
}

/// Result of one refresh cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Feed reconciled into the store and rendered
    Applied(ReconcileReport),
    /// Feed could not be fetched; store untouched
    FetchFailed(FetchError),
    /// Scheduler stopped while the cycle was outstanding; result dropped
    Discarded,
}

impl CycleOutcome {
    /// Check if the store was updated
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Reconcile report, when applied
    #[must_use]
    pub fn report(&self) -> Option<&ReconcileReport> {
        match self {
            Self::Applied(report) => Some(report),
            _ => None,
        }
    }
}

/// Cycle counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Cycles started
    pub cycles: u64,
    /// Cycles that updated the store
    pub applied: u64,
    /// Cycles whose fetch failed
    pub failed: u64,
    /// Cycles dropped after stop
    pub discarded: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RunControl {
    state: SchedulerState,
    generation: u64,
}

/// State shared with the timer task
struct Shared {
    feed_url: String,
    fetcher: Arc<dyn FeedFetcher>,
    renderer: Arc<dyn RenderAdapter>,
    clock: Arc<dyn Clock>,
    reconciler: Reconciler,
    store: Mutex<GraphStore>,
    control: watch::Sender<RunControl>,
    cycle_lock: tokio::sync::Mutex<()>,
    stats: Mutex<SchedulerStats>,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        let control = *self.control.borrow();
        control.state == SchedulerState::Running && control.generation == generation
    }

    /// One guarded cycle. `generation` is `None` for manual refreshes, which
    /// apply regardless of scheduler state.
    async fn run_cycle(&self, generation: Option<u64>) -> CycleOutcome {
        let _cycle = self.cycle_lock.lock().await;
        let still_wanted = |g: u64| self.is_current(g);

        if generation.is_some_and(|g| !still_wanted(g)) {
            self.stats.lock().discarded += 1;
            debug!("scheduler stopped before cycle began");
            return CycleOutcome::Discarded;
        }

        self.stats.lock().cycles += 1;
        let fetched = self.fetcher.fetch(&self.feed_url).await;

        if generation.is_some_and(|g| !still_wanted(g)) {
            self.stats.lock().discarded += 1;
            debug!(url = %self.feed_url, "discarding feed fetched after stop");
            return CycleOutcome::Discarded;
        }

        match fetched {
            Ok(records) => {
                let report = {
                    let mut store = self.store.lock();
                    let report = self.reconciler.reconcile(&mut store, &records);
                    self.renderer.set_graph(store.view());
                    report
                };
                if !report.is_clean() {
                    warn!(skipped = report.skipped.len(), "feed contained malformed records");
                }
                self.stats.lock().applied += 1;
                CycleOutcome::Applied(report)
            }
            Err(err) => {
                error!(url = %self.feed_url, error = %err, "feed fetch failed; retrying next tick");
                self.stats.lock().failed += 1;
                CycleOutcome::FetchFailed(err)
            }
        }
    }
}

/// Fixed-rate refresh driver owning one graph store
pub struct RefreshScheduler {
    shared: Arc<Shared>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    /// Create an idle scheduler with an empty store
    pub fn new(
        feed_url: impl Into<String>,
        fetcher: Arc<dyn FeedFetcher>,
        renderer: Arc<dyn RenderAdapter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (control, _) = watch::channel(RunControl::default());
        Self {
            shared: Arc::new(Shared {
                feed_url: feed_url.into(),
                fetcher,
                renderer,
                clock,
                reconciler: Reconciler::new(),
                store: Mutex::new(GraphStore::new()),
                control,
                cycle_lock: tokio::sync::Mutex::new(()),
                stats: Mutex::new(SchedulerStats::default()),
            }),
            timer: Mutex::new(None),
        }
    }

    /// Start refreshing every `interval`
    ///
    /// Runs one cycle immediately, then one per tick. Returns `false` without
    /// doing anything if already running. Must be called inside a tokio
    /// runtime.
    pub fn start(&self, interval: Duration) -> bool {
        let mut started = None;
        self.shared.control.send_if_modified(|control| {
            if control.state == SchedulerState::Running {
                return false;
            }
            control.state = SchedulerState::Running;
            control.generation += 1;
            started = Some(control.generation);
            true
        });
        let Some(generation) = started else {
            debug!("start ignored; scheduler already running");
            return false;
        };

        let interval = if interval < MIN_INTERVAL {
            warn!(?interval, "refresh interval too short; clamping");
            MIN_INTERVAL
        } else {
            interval
        };

        info!(url = %self.shared.feed_url, ?interval, generation, "refresh scheduler started");
        let handle = tokio::spawn(run_timer(Arc::clone(&self.shared), generation, interval));
        // a previous, stopped timer task finishes on its own
        *self.timer.lock() = Some(handle);
        true
    }

    /// Stop refreshing
    ///
    /// Returns `false` if already idle. An in-flight fetch is left to finish
    /// and its result is discarded.
    pub fn stop(&self) -> bool {
        let stopped = self.shared.control.send_if_modified(|control| {
            if control.state == SchedulerState::Idle {
                return false;
            }
            control.state = SchedulerState::Idle;
            true
        });
        if stopped {
            self.timer.lock().take();
            info!(url = %self.shared.feed_url, "refresh scheduler stopped");
        }
        stopped
    }

    /// Run one cycle now, independent of the timer
    ///
    /// Waits for any outstanding cycle first. The result is applied even if
    /// the scheduler is idle.
    pub async fn run_cycle(&self) -> CycleOutcome {
        self.shared.run_cycle(None).await
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.shared.control.borrow().state
    }

    /// Check if running
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == SchedulerState::Running
    }

    /// Cycle counters so far
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        *self.shared.stats.lock()
    }

    /// Cycles started so far
    #[inline]
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.shared.stats.lock().cycles
    }

    /// Owned copy of the current graph
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        self.shared.store.lock().snapshot()
    }

    /// Feed location
    #[must_use]
    pub fn feed_url(&self) -> &str {
        &self.shared.feed_url
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.shared.control.send_modify(|control| control.state = SchedulerState::Idle);
        if let Some(handle) = self.timer.get_mut().take() {
            handle.abort();
        }
    }
}

async fn run_timer(shared: Arc<Shared>, generation: u64, interval: Duration) {
    let mut control = shared.control.subscribe();
    let mut tick = shared.clock.now();

    loop {
        if !shared.is_current(generation) {
            break;
        }

        let outcome = shared.run_cycle(Some(generation)).await;
        if let CycleOutcome::Applied(report) = &outcome {
            debug!(
                nodes = report.node_count,
                links = report.link_count,
                generation,
                "refresh cycle applied"
            );
        }

        tick = next_tick(tick, shared.clock.now(), interval);
        tokio::select! {
            () = shared.clock.sleep_until(tick) => {}
            changed = control.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    debug!(generation, "refresh timer exited");
}

/// Next tick on the fixed-rate schedule strictly after `now`
fn next_tick(previous: Instant, now: Instant, interval: Duration) -> Instant {
    let next = previous + interval;
    if next > now {
        return next;
    }
    let behind = now.duration_since(next).as_nanos();
    let skipped = behind / interval.as_nanos() + 1;
    let skipped = u32::try_from(skipped).unwrap_or(u32::MAX);
    next + interval.saturating_mul(skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_tick_on_schedule() {
        let start = Instant::now();
        let interval = Duration::from_secs(10);

        let next = next_tick(start, start + Duration::from_secs(1), interval);
        assert_eq!(next, start + Duration::from_secs(10));
    }

    #[test]
    fn next_tick_skips_missed() {
        let start = Instant::now();
        let interval = Duration::from_secs(10);

        let next = next_tick(start, start + Duration::from_secs(25), interval);
        assert_eq!(next, start + Duration::from_secs(30));

        let next = next_tick(start, start + Duration::from_secs(20), interval);
        assert_eq!(next, start + Duration::from_secs(30));
    }

    #[test]
    fn cycle_outcome_accessors() {
        let applied = CycleOutcome::Applied(ReconcileReport::default());
        assert!(applied.is_applied());
        assert!(applied.report().is_some());

        assert!(!CycleOutcome::Discarded.is_applied());
        assert!(CycleOutcome::FetchFailed(FetchError::NotAFeed).report().is_none());
    }
}
