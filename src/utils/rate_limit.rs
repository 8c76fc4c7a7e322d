//! Best-effort request rate limiting
//!
//! Sliding window of request timestamps per identity, pruned lazily on
//! each check. Windows are tracked in-process and are not shared across
//! instances, so the limit is approximate.

use chrono::Utc;
use dashmap::DashMap;

/// Sliding-window rate limiter keyed by caller identity
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: usize,
    window_ms: i64,
    hits: DashMap<String, Vec<i64>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_ms: (window_secs as i64) * 1000,
            hits: DashMap::new(),
        }
    }

    /// Record a request for `identity`; returns false when over the limit
    pub fn check(&self, identity: &str) -> bool {
        self.check_at(identity, Utc::now().timestamp_millis())
    }

    fn check_at(&self, identity: &str, now_ms: i64) -> bool {
        let mut entry = self.hits.entry(identity.to_string()).or_default();
        entry.retain(|&t| now_ms - t < self.window_ms);
        if entry.len() >= self.max_requests {
            return false;
        }
        entry.push(now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit_then_rejects() {
        let limiter = RateLimiter::new(3, 60);
        assert!(limiter.check_at("ip:1", 0));
        assert!(limiter.check_at("ip:1", 10));
        assert!(limiter.check_at("ip:1", 20));
        assert!(!limiter.check_at("ip:1", 30));
    }

    #[test]
    fn identities_are_independent() {
        let limiter = RateLimiter::new(1, 60);
        assert!(limiter.check_at("ip:1", 0));
        assert!(limiter.check_at("ip:2", 0));
        assert!(!limiter.check_at("ip:1", 1));
    }

    #[test]
    fn window_elapse_frees_slots() {
        let limiter = RateLimiter::new(2, 1);
        assert!(limiter.check_at("u", 0));
        assert!(limiter.check_at("u", 100));
        assert!(!limiter.check_at("u", 500));
        // Both hits fall out of the 1s window
        assert!(limiter.check_at("u", 1500));
    }
}
