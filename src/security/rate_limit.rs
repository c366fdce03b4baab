//! Sliding-window rate limiting keyed by client.
//!
//! Each client owns an ordered list of admission timestamps. A timestamp is
//! live while `now - ts < window`; every admission check and every sweep
//! uses that same rule, so nothing logically expired survives a sweep.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::RateLimitConfig;
use crate::security::client::ClientKey;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Admitted,
    Rejected,
}

/// In-memory per-client sliding window limiter.
///
/// The store is owned by the limiter instance. Access to a single client's
/// window goes through the map's entry lock, which makes prune-check-append
/// atomic per key.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    windows: DashMap<ClientKey, VecDeque<Instant>>,
    window: Duration,
    max_requests: usize,
}

impl SlidingWindowLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            windows: DashMap::new(),
            window,
            max_requests: max_requests as usize,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.window(), config.max_requests)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a request from `key` at `now` if it fits in the window.
    ///
    /// A rejected request does not consume quota.
    pub fn admit(&self, key: &ClientKey, now: Instant) -> Decision {
        let mut entry = self.windows.entry(key.clone()).or_default();
        prune(entry.value_mut(), now, self.window);

        if entry.len() >= self.max_requests {
            let empty = entry.is_empty();
            drop(entry);
            if empty {
                self.windows.remove_if(key, |_, w| w.is_empty());
            }
            return Decision::Rejected;
        }

        entry.push_back(now);
        Decision::Admitted
    }

    /// Prune every window and drop clients with nothing left.
    ///
    /// Returns the number of clients removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut removed = 0;
        self.windows.retain(|_, timestamps| {
            prune(timestamps, now, self.window);
            if timestamps.is_empty() {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Number of clients currently holding state.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }

    /// Live admissions recorded for `key` as of `now`.
    pub fn current_count(&self, key: &ClientKey, now: Instant) -> usize {
        self.windows
            .get(key)
            .map(|w| w.iter().filter(|ts| is_live(**ts, now, self.window)).count())
            .unwrap_or(0)
    }
}

fn is_live(ts: Instant, now: Instant, window: Duration) -> bool {
    now.saturating_duration_since(ts) < window
}

// Concurrent callers may capture `now` slightly out of order, so the deque
// is not assumed sorted.
fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    timestamps.retain(|ts| is_live(*ts, now, window));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn key(ip: &str) -> ClientKey {
        ClientKey::from_raw(ip)
    }

    #[test]
    fn test_admits_up_to_max() {
        let limiter = SlidingWindowLimiter::new(Duration::from_millis(1000), 2);
        let t0 = Instant::now();
        let k = key("10.0.0.1");

        assert_eq!(limiter.admit(&k, t0), Decision::Admitted);
        assert_eq!(limiter.admit(&k, t0 + Duration::from_millis(10)), Decision::Admitted);
        assert_eq!(limiter.admit(&k, t0 + Duration::from_millis(20)), Decision::Rejected);
        assert_eq!(limiter.current_count(&k, t0 + Duration::from_millis(20)), 2);
    }

    #[test]
    fn test_window_slides() {
        let limiter = SlidingWindowLimiter::new(Duration::from_millis(1000), 2);
        let t0 = Instant::now();
        let k = key("10.0.0.1");

        limiter.admit(&k, t0);
        limiter.admit(&k, t0 + Duration::from_millis(500));
        assert_eq!(limiter.admit(&k, t0 + Duration::from_millis(999)), Decision::Rejected);
        // first timestamp is exactly one window old: no longer live
        assert_eq!(limiter.admit(&k, t0 + Duration::from_millis(1000)), Decision::Admitted);
        assert_eq!(limiter.admit(&k, t0 + Duration::from_millis(1200)), Decision::Rejected);
    }

    #[test]
    fn test_rejection_does_not_consume_quota() {
        let limiter = SlidingWindowLimiter::new(Duration::from_millis(100), 1);
        let t0 = Instant::now();
        let k = key("10.0.0.1");

        limiter.admit(&k, t0);
        for i in 1..50 {
            limiter.admit(&k, t0 + Duration::from_millis(i));
        }
        assert_eq!(limiter.admit(&k, t0 + Duration::from_millis(100)), Decision::Admitted);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = SlidingWindowLimiter::new(Duration::from_secs(60), 1);
        let t0 = Instant::now();

        assert_eq!(limiter.admit(&key("10.0.0.1"), t0), Decision::Admitted);
        assert_eq!(limiter.admit(&key("10.0.0.2"), t0), Decision::Admitted);
        assert_eq!(limiter.admit(&key("10.0.0.1"), t0), Decision::Rejected);
    }

    #[test]
    fn test_zero_max_rejects_everything_without_state() {
        let limiter = SlidingWindowLimiter::new(Duration::from_secs(1), 0);
        assert_eq!(limiter.admit(&key("10.0.0.1"), Instant::now()), Decision::Rejected);
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn test_sweep_removes_idle_and_keeps_active() {
        let limiter = SlidingWindowLimiter::new(Duration::from_millis(1000), 10);
        let t0 = Instant::now();

        limiter.admit(&key("10.0.0.1"), t0);
        limiter.admit(&key("10.0.0.2"), t0);
        limiter.admit(&key("10.0.0.2"), t0 + Duration::from_millis(800));

        let now = t0 + Duration::from_millis(1500);
        assert_eq!(limiter.sweep(now), 1);
        assert_eq!(limiter.tracked_keys(), 1);
        assert_eq!(limiter.current_count(&key("10.0.0.1"), now), 0);
        assert_eq!(limiter.current_count(&key("10.0.0.2"), now), 1);

        // every survivor has a live timestamp
        assert_eq!(limiter.sweep(t0 + Duration::from_millis(1800)), 1);
        assert_eq!(limiter.tracked_keys(), 0);
    }

    #[test]
    fn test_concurrent_admissions_respect_bound() {
        let limiter = Arc::new(SlidingWindowLimiter::new(Duration::from_secs(60), 25));
        let now = Instant::now();
        let k = key("10.9.9.9");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                let k = k.clone();
                std::thread::spawn(move || {
                    (0..20)
                        .filter(|_| limiter.admit(&k, now) == Decision::Admitted)
                        .count()
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 25);
    }
}
