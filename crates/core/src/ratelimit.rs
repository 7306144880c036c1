//! In-process fixed-window rate limiting.
//!
//! One limiter instance is shared by the router; callers inject it like
//! any other service rather than reaching for a global. Window state is
//! per key (user id) and lives in memory only, so a restart clears it.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Time source seam so window expiry is testable without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { max_requests: 50, window: Duration::from_secs(60) }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Denied { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

#[derive(Clone, Copy, Debug)]
struct Window {
    started_at: DateTime<Utc>,
    count: u32,
}

pub struct RateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self { config, windows: Mutex::new(HashMap::new()) }
    }

    /// Check-and-consume for one key. The whole read-modify-write runs
    /// under the map lock, so two concurrent calls for the same key can
    /// never both observe the last free slot.
    pub fn check(&self, key: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let window_len = chrono::Duration::from_std(self.config.window)
            .unwrap_or_else(|_| chrono::Duration::seconds(60));
        let mut windows = self.windows.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let window = windows
            .entry(key.to_owned())
            .or_insert(Window { started_at: now, count: 0 });

        if now - window.started_at >= window_len {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= self.config.max_requests {
            let retry_at = window.started_at + window_len;
            let retry_after = (retry_at - now).to_std().unwrap_or(Duration::ZERO);
            return RateLimitDecision::Denied { retry_after };
        }

        window.count += 1;
        RateLimitDecision::Allowed { remaining: self.config.max_requests - window.count }
    }

    /// Drop expired windows. Called opportunistically; correctness never
    /// depends on it.
    pub fn prune(&self, now: DateTime<Utc>) {
        let window_len = chrono::Duration::from_std(self.config.window)
            .unwrap_or_else(|_| chrono::Duration::seconds(60));
        let mut windows = self.windows.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        windows.retain(|_, window| now - window.started_at < window_len);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};

    use super::{RateLimitConfig, RateLimitDecision, RateLimiter};

    fn limiter(max_requests: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig { max_requests, window: Duration::from_secs(60) })
    }

    fn t(secs: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn allows_up_to_the_ceiling_then_denies() {
        let limiter = limiter(50);
        for _ in 0..50 {
            assert!(limiter.check("user-1", t(0)).is_allowed());
        }
        assert!(matches!(limiter.check("user-1", t(0)), RateLimitDecision::Denied { .. }));
    }

    #[test]
    fn denial_does_not_consume_a_slot() {
        let limiter = limiter(1);
        assert!(limiter.check("user-1", t(0)).is_allowed());
        for _ in 0..10 {
            assert!(!limiter.check("user-1", t(1)).is_allowed());
        }
        // A fresh window still admits exactly one request.
        assert!(limiter.check("user-1", t(61)).is_allowed());
        assert!(!limiter.check("user-1", t(62)).is_allowed());
    }

    #[test]
    fn window_expiry_resets_the_count() {
        let limiter = limiter(2);
        assert!(limiter.check("user-1", t(0)).is_allowed());
        assert!(limiter.check("user-1", t(30)).is_allowed());
        assert!(!limiter.check("user-1", t(59)).is_allowed());
        // Exactly at the window boundary the count resets.
        assert!(limiter.check("user-1", t(60)).is_allowed());
    }

    #[test]
    fn keys_are_independent() {
        let limiter = limiter(1);
        assert!(limiter.check("user-1", t(0)).is_allowed());
        assert!(limiter.check("user-2", t(0)).is_allowed());
        assert!(!limiter.check("user-1", t(1)).is_allowed());
    }

    #[test]
    fn remaining_counts_down() {
        let limiter = limiter(3);
        assert_eq!(limiter.check("u", t(0)), RateLimitDecision::Allowed { remaining: 2 });
        assert_eq!(limiter.check("u", t(0)), RateLimitDecision::Allowed { remaining: 1 });
        assert_eq!(limiter.check("u", t(0)), RateLimitDecision::Allowed { remaining: 0 });
    }

    #[test]
    fn denied_reports_retry_after() {
        let limiter = limiter(1);
        assert!(limiter.check("u", t(0)).is_allowed());
        match limiter.check("u", t(20)) {
            RateLimitDecision::Denied { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(40));
            }
            RateLimitDecision::Allowed { .. } => panic!("expected denial"),
        }
    }

    #[test]
    fn prune_drops_expired_windows_only() {
        let limiter = limiter(1);
        limiter.check("old", t(0));
        limiter.check("fresh", t(50));
        limiter.prune(t(70));
        // "old" expired, so its next request starts a new window.
        assert!(limiter.check("old", t(70)).is_allowed());
        // "fresh" survived the prune and is still saturated.
        assert!(!limiter.check("fresh", t(70)).is_allowed());
    }
}
