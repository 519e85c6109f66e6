//! Rate Window Module
//!
//! Fixed-window request counter for a single client, and the outcome of a
//! limiter check.

use crate::clock::{deadline_after, remaining_ms};

// == Rate Window ==
/// Requests observed from one client in the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindow {
    /// Requests counted in this window
    pub count: u32,
    /// Instant the window resets (Unix milliseconds)
    pub reset_at: u64,
}

impl RateWindow {
    // == Constructor ==
    /// Opens a window at `now_ms` that already counts the opening request.
    pub fn open(now_ms: u64, window_ms: u64) -> Self {
        Self {
            count: 1,
            reset_at: deadline_after(now_ms, i64::try_from(window_ms).unwrap_or(i64::MAX)),
        }
    }

    // == Is Active ==
    /// A window is active strictly before `reset_at`.
    pub fn is_active_at(&self, now_ms: u64) -> bool {
        now_ms < self.reset_at
    }
}

// == Rate Limit Decision ==
/// Outcome of [`RateLimiter::check`](super::RateLimiter::check).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Request counted and allowed through
    Allowed {
        /// Requests still available in this window
        remaining: u32,
        /// Instant the window resets
        reset_at: u64,
    },
    /// Window exhausted; the count was left unchanged
    Rejected {
        /// Instant the window resets
        reset_at: u64,
        /// Milliseconds from the check until `reset_at`
        retry_after_ms: u64,
    },
}

impl RateLimitDecision {
    pub(crate) fn rejected(now_ms: u64, reset_at: u64) -> Self {
        Self::Rejected {
            reset_at,
            retry_after_ms: remaining_ms(now_ms, reset_at),
        }
    }

    /// Returns true for [`RateLimitDecision::Allowed`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Instant the client's window resets.
    pub fn reset_at(&self) -> u64 {
        match self {
            Self::Allowed { reset_at, .. } | Self::Rejected { reset_at, .. } => *reset_at,
        }
    }

    /// Whole seconds a rejected client should wait, rounded up.
    ///
    /// Returns `None` for allowed requests.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::Allowed { .. } => None,
            Self::Rejected { retry_after_ms, .. } => Some(retry_after_ms.div_ceil(1000)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_open() {
        let window = RateWindow::open(1_000, 60_000);
        assert_eq!(window.count, 1);
        assert_eq!(window.reset_at, 61_000);
    }

    #[test]
    fn test_window_active_boundary() {
        let window = RateWindow::open(0, 1_000);

        assert!(window.is_active_at(999));
        assert!(!window.is_active_at(1_000));
    }

    #[test]
    fn test_decision_accessors() {
        let allowed = RateLimitDecision::Allowed {
            remaining: 2,
            reset_at: 5_000,
        };
        assert!(allowed.is_allowed());
        assert_eq!(allowed.reset_at(), 5_000);
        assert_eq!(allowed.retry_after_secs(), None);

        let rejected = RateLimitDecision::rejected(3_500, 5_000);
        assert!(!rejected.is_allowed());
        assert_eq!(rejected.reset_at(), 5_000);
        assert_eq!(rejected.retry_after_secs(), Some(2));
    }

    #[test]
    fn test_retry_after_exact_second() {
        let rejected = RateLimitDecision::rejected(0, 60_000);
        assert_eq!(rejected.retry_after_secs(), Some(60));
    }
}
