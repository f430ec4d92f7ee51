use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use aquadash_core::config::{OverlapPolicy, PollerConfig};
use aquadash_core::{DashError, Result};

/// Snapshot of poller counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollerStats {
    /// Ticks fired by the timer.
    pub ticks: u64,
    /// Ticks dropped because the previous one was still running.
    pub skipped: u64,
    /// Outstanding ticks aborted in favour of a newer one.
    pub superseded: u64,
}

#[derive(Default)]
struct Counters {
    ticks: AtomicU64,
    skipped: AtomicU64,
    superseded: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> PollerStats {
        PollerStats {
            ticks: self.ticks.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            superseded: self.superseded.load(Ordering::SeqCst),
        }
    }
}

/// Fixed-interval tick scheduler.
///
/// The first tick fires immediately. Ticks are spaced by wall clock, not by
/// completion of the previous tick, so a slow fetch never shifts the schedule.
#[derive(Debug, Clone)]
pub struct Poller {
    interval: Duration,
    overlap: OverlapPolicy,
}

impl Poller {
    /// Create a poller. The interval must be non-zero.
    pub fn new(config: &PollerConfig) -> Result<Self> {
        if config.interval_ms == 0 {
            return Err(DashError::Config(
                "poller.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            interval: config.interval(),
            overlap: config.overlap,
        })
    }

    /// Tick interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking. Each tick runs `on_tick` as its own task.
    pub fn start<F, Fut>(&self, on_tick: F) -> PollerHandle
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let counters = Arc::new(Counters::default());

        let task = tokio::spawn(run_loop(
            self.interval,
            self.overlap,
            on_tick,
            cancel.clone(),
            counters.clone(),
        ));

        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            overlap = self.overlap.as_str(),
            "Poller started"
        );

        PollerHandle {
            cancel,
            task,
            counters,
        }
    }
}

async fn run_loop<F, Fut>(
    interval: Duration,
    overlap: OverlapPolicy,
    on_tick: F,
    cancel: CancellationToken,
    counters: Arc<Counters>,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut outstanding: Vec<JoinHandle<()>> = Vec::new();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let tick = counters.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        outstanding.retain(|handle| !handle.is_finished());

        if !outstanding.is_empty() {
            match overlap {
                OverlapPolicy::Skip => {
                    counters.skipped.fetch_add(1, Ordering::SeqCst);
                    tracing::debug!(tick, "Previous fetch still running, skipping tick");
                    continue;
                }
                OverlapPolicy::Supersede => {
                    for handle in outstanding.drain(..) {
                        handle.abort();
                    }
                    counters.superseded.fetch_add(1, Ordering::SeqCst);
                    tracing::debug!(tick, "Previous fetch still running, superseding it");
                }
                OverlapPolicy::Allow => {
                    tracing::debug!(
                        tick,
                        in_flight = outstanding.len(),
                        "Previous fetch still running, overlapping"
                    );
                }
            }
        }

        tracing::trace!(tick, "Poller tick");
        outstanding.push(tokio::spawn(on_tick()));
    }

    for handle in outstanding {
        handle.abort();
    }
    tracing::info!("Poller stopped");
}

/// Handle to a running poller.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
    counters: Arc<Counters>,
}

impl PollerHandle {
    /// Stop ticking. Outstanding ticks are aborted.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Whether stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token that stops the poller when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Current counters.
    pub fn stats(&self) -> PollerStats {
        self.counters.snapshot()
    }

    /// Wait for the loop to finish. Only returns after `stop`.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            if e.is_panic() {
                tracing::error!("Poller task panicked: {}", e);
            }
        }
    }

    /// Stop and wait for the loop to finish.
    pub async fn shutdown(self) {
        self.stop();
        self.join().await;
    }
}
