//! Per-client sliding-window rate limiter.
//!
//! Keeps, for each client key, the timestamps of requests accepted within the
//! trailing window.  The read-filter-append sequence runs under one lock so
//! concurrent requests from the same key cannot over-admit.  Keys whose
//! newest timestamp has aged out of the window are evicted on every check,
//! which bounds the map even though clients come and go for the life of the
//! process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Time source, injectable so the window logic is testable without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock backed by [`Instant::now`].
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Sliding-window request counter keyed by client identifier.
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    clock: Arc<dyn Clock>,
    buckets: Mutex<HashMap<String, Vec<Instant>>>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys = self.buckets.lock().map(|b| b.len()).unwrap_or(0);
        write!(f, "RateLimiter(limit={}, window={:?}, keys={keys})", self.limit, self.window)
    }
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self::with_clock(limit, window, Arc::new(SystemClock))
    }

    pub fn with_clock(limit: usize, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            limit,
            window,
            clock,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Admit or reject one request for `key`.
    ///
    /// Admission records the request timestamp; rejection records nothing, so
    /// a throttled client does not extend its own penalty.
    pub fn try_admit(&self, key: &str) -> bool {
        let now = self.clock.now();
        let mut buckets = self
            .buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Evict keys that have gone completely stale.
        let window = self.window;
        buckets.retain(|_, stamps| {
            stamps
                .last()
                .is_some_and(|t| now.duration_since(*t) < window)
        });

        let stamps = buckets.entry(key.to_owned()).or_default();
        stamps.retain(|t| now.duration_since(*t) < window);

        if stamps.len() >= self.limit {
            return false;
        }
        stamps.push(now);
        true
    }

    /// Number of keys currently tracked (stale keys excluded lazily).
    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.buckets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    /// Test clock whose notion of "now" is advanced by hand.
    struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self { now: Mutex::new(Instant::now()) }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }

    const WINDOW: Duration = Duration::from_secs(60);

    #[test]
    fn eleventh_request_in_window_is_rejected() {
        let limiter = RateLimiter::new(10, WINDOW);
        for i in 0..10 {
            assert!(limiter.try_admit("1.2.3.4"), "request {i} should be admitted");
        }
        assert!(!limiter.try_admit("1.2.3.4"));
    }

    #[test]
    fn keys_are_throttled_independently() {
        let limiter = RateLimiter::new(2, WINDOW);
        assert!(limiter.try_admit("a"));
        assert!(limiter.try_admit("a"));
        assert!(!limiter.try_admit("a"));
        assert!(limiter.try_admit("b"));
    }

    #[test]
    fn window_elapsing_readmits_the_client() {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(10, WINDOW, clock.clone());
        for _ in 0..10 {
            assert!(limiter.try_admit("k"));
        }
        assert!(!limiter.try_admit("k"));

        clock.advance(WINDOW + Duration::from_millis(1));
        assert!(limiter.try_admit("k"));
    }

    #[test]
    fn partial_window_slide_frees_capacity_gradually() {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(2, WINDOW, clock.clone());
        assert!(limiter.try_admit("k"));
        clock.advance(Duration::from_secs(40));
        assert!(limiter.try_admit("k"));
        assert!(!limiter.try_admit("k"));

        // First stamp ages out at t=60; the second (t=40) is still live.
        clock.advance(Duration::from_secs(25));
        assert!(limiter.try_admit("k"));
        assert!(!limiter.try_admit("k"));
    }

    #[test]
    fn stale_keys_are_evicted_on_access() {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(10, WINDOW, clock.clone());
        limiter.try_admit("old-client");
        assert_eq!(limiter.tracked_keys(), 1);

        clock.advance(WINDOW * 2);
        limiter.try_admit("new-client");
        assert_eq!(limiter.tracked_keys(), 1, "aged-out key should be gone");
    }

    #[test]
    fn rejection_does_not_record_a_timestamp() {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(1, WINDOW, clock.clone());
        assert!(limiter.try_admit("k"));
        for _ in 0..5 {
            assert!(!limiter.try_admit("k"));
        }
        clock.advance(WINDOW + Duration::from_millis(1));
        assert!(limiter.try_admit("k"), "rejections must not extend the window");
    }
}
