//! Rate Limiter Store
//!
//! Per-client fixed-window counters.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::limiter::{normalize_client_id, RateLimitDecision, RateWindow};

// == Rate Limiter ==
/// Fixed-window limiter keyed by client identifier.
///
/// Each instance owns its windows; two limiters never share state.
#[derive(Debug)]
pub struct RateLimiter {
    /// Current window per client
    windows: HashMap<String, RateWindow>,
    /// Requests allowed per window
    max_requests: u32,
    /// Window length in milliseconds
    window_ms: u64,
    /// Time source for window boundaries
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    // == Constructor ==
    /// Creates a limiter backed by the system clock.
    ///
    /// # Arguments
    /// * `max_requests` - Requests allowed per client per window
    /// * `window_ms` - Window length in milliseconds
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        Self::with_clock(max_requests, window_ms, Arc::new(SystemClock))
    }

    /// Creates a limiter reading time from `clock`.
    pub fn with_clock(max_requests: u32, window_ms: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: HashMap::new(),
            max_requests,
            window_ms,
            clock,
        }
    }

    // == Check ==
    /// Counts one request from `client_id` and decides whether it may proceed.
    ///
    /// A missing or blank id is counted against the shared `"unknown"` bucket.
    /// An expired window is replaced by a fresh one, never resumed. Rejections
    /// leave the count untouched.
    pub fn check(&mut self, client_id: Option<&str>) -> RateLimitDecision {
        let now = self.clock.now_ms();
        let client = normalize_client_id(client_id);

        match self.windows.entry(client.to_string()) {
            Entry::Occupied(mut occupied) if occupied.get().is_active_at(now) => {
                let window = occupied.get_mut();
                if window.count < self.max_requests {
                    window.count += 1;
                    RateLimitDecision::Allowed {
                        remaining: self.max_requests - window.count,
                        reset_at: window.reset_at,
                    }
                } else {
                    RateLimitDecision::rejected(now, window.reset_at)
                }
            }
            Entry::Occupied(mut occupied) => {
                let window = RateWindow::open(now, self.window_ms);
                occupied.insert(window);
                self.fresh_window_decision(window)
            }
            Entry::Vacant(vacant) => {
                let window = RateWindow::open(now, self.window_ms);
                vacant.insert(window);
                self.fresh_window_decision(window)
            }
        }
    }

    fn fresh_window_decision(&self, window: RateWindow) -> RateLimitDecision {
        RateLimitDecision::Allowed {
            remaining: self.max_requests.saturating_sub(window.count),
            reset_at: window.reset_at,
        }
    }

    // == Window ==
    /// Returns the stored window for `client_id`, active or not.
    #[cfg(test)]
    pub(crate) fn window(&self, client_id: Option<&str>) -> Option<&RateWindow> {
        self.windows.get(normalize_client_id(client_id))
    }

    // == Purge Expired ==
    /// Drops windows that have reached their reset instant.
    ///
    /// Returns the number of windows removed. A purged client starts a fresh
    /// window on its next request, exactly as if its stale window were replaced.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.windows.len();
        self.windows.retain(|_, window| window.is_active_at(now));
        before - self.windows.len()
    }

    /// Number of tracked clients.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Returns true if no client is tracked.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::limiter::UNKNOWN_CLIENT;

    fn manual_limiter(max_requests: u32, window_ms: u64) -> (RateLimiter, ManualClock) {
        let clock = ManualClock::new(10_000);
        let limiter = RateLimiter::with_clock(max_requests, window_ms, Arc::new(clock.clone()));
        (limiter, clock)
    }

    #[test]
    fn test_limiter_first_request_opens_window() {
        let (mut limiter, _) = manual_limiter(3, 1_000);

        let decision = limiter.check(Some("10.0.0.1"));

        assert_eq!(
            decision,
            RateLimitDecision::Allowed {
                remaining: 2,
                reset_at: 11_000
            }
        );
        assert_eq!(limiter.window(Some("10.0.0.1")).map(|w| w.count), Some(1));
    }

    #[test]
    fn test_limiter_rejects_after_max_requests() {
        let (mut limiter, clock) = manual_limiter(3, 1_000);

        for _ in 0..3 {
            assert!(limiter.check(Some("client")).is_allowed());
            clock.advance(100);
        }

        let decision = limiter.check(Some("client"));
        assert_eq!(
            decision,
            RateLimitDecision::Rejected {
                reset_at: 11_000,
                retry_after_ms: 700
            }
        );
        assert_eq!(decision.retry_after_secs(), Some(1));
    }

    #[test]
    fn test_limiter_rejection_leaves_count_unchanged() {
        let (mut limiter, _) = manual_limiter(2, 1_000);

        limiter.check(Some("client"));
        limiter.check(Some("client"));
        limiter.check(Some("client"));
        limiter.check(Some("client"));

        assert_eq!(limiter.window(Some("client")).map(|w| w.count), Some(2));
    }

    #[test]
    fn test_limiter_window_resets_after_expiry() {
        let (mut limiter, clock) = manual_limiter(3, 1_000);

        for _ in 0..3 {
            limiter.check(Some("client"));
        }
        assert!(!limiter.check(Some("client")).is_allowed());

        clock.advance(1_000);

        let decision = limiter.check(Some("client"));
        assert_eq!(
            decision,
            RateLimitDecision::Allowed {
                remaining: 2,
                reset_at: 12_000
            }
        );
        assert_eq!(limiter.window(Some("client")).map(|w| w.count), Some(1));
    }

    #[test]
    fn test_limiter_clients_are_isolated() {
        let (mut limiter, _) = manual_limiter(1, 60_000);

        assert!(limiter.check(Some("client-a")).is_allowed());
        assert!(!limiter.check(Some("client-a")).is_allowed());

        assert!(limiter.check(Some("client-b")).is_allowed());
        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn test_limiter_missing_client_uses_unknown_bucket() {
        let (mut limiter, _) = manual_limiter(2, 60_000);

        assert!(limiter.check(None).is_allowed());
        assert!(limiter.check(Some("   ")).is_allowed());
        assert!(!limiter.check(Some(UNKNOWN_CLIENT)).is_allowed());

        assert_eq!(limiter.len(), 1);
    }

    #[test]
    fn test_health_limiter_one_per_minute() {
        let (mut limiter, clock) = manual_limiter(1, 60_000);

        assert!(limiter.check(Some("monitor")).is_allowed());
        clock.advance(30_000);
        assert!(!limiter.check(Some("monitor")).is_allowed());
        clock.advance(30_000);
        assert!(limiter.check(Some("monitor")).is_allowed());
    }

    #[test]
    fn test_limiter_purge_expired() {
        let (mut limiter, clock) = manual_limiter(5, 1_000);

        limiter.check(Some("old"));
        clock.advance(600);
        limiter.check(Some("new"));
        clock.advance(400);

        assert_eq!(limiter.purge_expired(), 1);
        assert!(limiter.window(Some("old")).is_none());
        assert!(limiter.window(Some("new")).is_some());
    }

    #[test]
    fn test_limiter_accessors() {
        let limiter = RateLimiter::new(20, 60_000);

        assert_eq!(limiter.max_requests(), 20);
        assert_eq!(limiter.window_ms(), 60_000);
        assert!(limiter.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_never_lose_increments() {
        let limiter = Arc::new(tokio::sync::RwLock::new(RateLimiter::new(1_000, 60_000)));

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    for _ in 0..10 {
                        limiter.write().await.check(Some("shared"));
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let limiter = limiter.read().await;
        assert_eq!(limiter.window(Some("shared")).map(|w| w.count), Some(500));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checks_allow_exactly_max() {
        let limiter = Arc::new(tokio::sync::RwLock::new(RateLimiter::new(100, 60_000)));

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    let mut allowed = 0;
                    for _ in 0..10 {
                        if limiter.write().await.check(Some("shared")).is_allowed() {
                            allowed += 1;
                        }
                    }
                    allowed
                })
            })
            .collect();

        let mut allowed = 0;
        for task in tasks {
            allowed += task.await.unwrap();
        }

        assert_eq!(allowed, 100);
        let limiter = limiter.read().await;
        assert_eq!(limiter.window(Some("shared")).map(|w| w.count), Some(100));
    }
}
