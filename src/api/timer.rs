use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Source of poll ticks for the refresh service.
///
/// `tick` must be cancel-safe: the service races it against commands and
/// fetch completions.
pub trait PollTimer {
    fn tick(&mut self) -> impl Future<Output = ()>;
}

/// Fixed-period timer backed by `tokio::time`.
///
/// The first tick fires one period after creation because the service
/// fetches once on start. Missed ticks are skipped, not queued.
#[derive(Debug)]
pub struct IntervalTimer {
    interval: Interval,
}

impl IntervalTimer {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.interval.period()
    }
}

impl PollTimer for IntervalTimer {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Timer that only ticks when its [`ManualTicker`] says so.
#[derive(Debug)]
pub struct ManualTimer {
    ticks: mpsc::UnboundedReceiver<()>,
}

/// Trigger side of a [`ManualTimer`].
#[derive(Debug, Clone)]
pub struct ManualTicker {
    ticks: mpsc::UnboundedSender<()>,
}

impl ManualTicker {
    /// Queues one tick. Returns `false` once the timer is gone.
    pub fn tick(&self) -> bool {
        self.ticks.send(()).is_ok()
    }
}

#[must_use]
pub fn manual_timer() -> (ManualTicker, ManualTimer) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ManualTicker { ticks: tx }, ManualTimer { ticks: rx })
}

impl PollTimer for ManualTimer {
    async fn tick(&mut self) {
        if self.ticks.recv().await.is_none() {
            // Ticker dropped: never tick again.
            std::future::pending::<()>().await;
        }
    }
}
