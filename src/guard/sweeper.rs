//! Background eviction of idle rate limit state.
//!
//! # Responsibilities
//! - Periodically prune every client window
//! - Remove clients with no live timestamps
//!
//! # Design Decisions
//! - Period equals the rate limit window
//! - Same staleness rule as per-request pruning (see `SlidingWindowLimiter`)
//! - Stops on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::observability::metrics;
use crate::security::SlidingWindowLimiter;

pub struct Sweeper {
    limiter: Arc<SlidingWindowLimiter>,
    period: Duration,
}

impl Sweeper {
    pub fn new(limiter: Arc<SlidingWindowLimiter>) -> Self {
        let period = limiter.window();
        Self { limiter, period }
    }

    pub fn with_period(limiter: Arc<SlidingWindowLimiter>, period: Duration) -> Self {
        Self { limiter, period }
    }

    /// Run one pass. Returns the number of clients removed.
    ///
    /// Reads the tokio clock, which is the wall clock outside of tests with
    /// paused time.
    pub fn sweep_once(&self) -> usize {
        let removed = self.limiter.sweep(time::Instant::now().into_std());
        let remaining = self.limiter.tracked_keys();
        metrics::set_tracked_keys(remaining);
        if removed > 0 {
            tracing::debug!(removed, remaining, "Evicted idle rate limit entries");
        }
        removed
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::debug!(period_ms = self.period.as_millis() as u64, "Rate limit sweeper starting");

        let mut ticker = time::interval(self.period);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once();
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Rate limit sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::{ClientKey, Decision};

    fn now() -> std::time::Instant {
        time::Instant::now().into_std()
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_once_evicts_stale_clients() {
        let limiter = Arc::new(SlidingWindowLimiter::new(Duration::from_millis(50), 5));
        limiter.admit(&ClientKey::from_raw("10.0.0.1"), now());
        time::advance(Duration::from_millis(100)).await;
        limiter.admit(&ClientKey::from_raw("10.0.0.2"), now());

        let sweeper = Sweeper::new(limiter.clone());
        assert_eq!(sweeper.sweep_once(), 1);
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_sweep_and_shutdown() {
        let limiter = Arc::new(SlidingWindowLimiter::new(Duration::from_millis(20), 5));
        assert_eq!(
            limiter.admit(&ClientKey::from_raw("10.0.0.1"), now()),
            Decision::Admitted
        );

        let (tx, rx) = broadcast::channel(1);
        let sweeper = Sweeper::with_period(limiter.clone(), Duration::from_millis(50));
        let handle = tokio::spawn(sweeper.run(rx));

        // entry is stale but the first period has not elapsed
        time::sleep(Duration::from_millis(30)).await;
        assert_eq!(limiter.tracked_keys(), 1);

        time::sleep(Duration::from_millis(30)).await;
        assert_eq!(limiter.tracked_keys(), 0);

        tx.send(()).unwrap();
        handle.await.unwrap();
    }
}
