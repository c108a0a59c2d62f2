//! Coarse per-client request throttle using the governor crate.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter as GovernorRateLimiter};

/// Throttle configuration.
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Sustained requests per minute per client, also used as the burst size.
    pub per_minute: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self { per_minute: 120 }
    }
}

/// Keyed GCRA throttle in front of the whole API.
///
/// This only smooths traffic bursts; endpoint quotas are enforced separately
/// by the fixed-window limiter.
pub struct RequestThrottle {
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl RequestThrottle {
    /// Returns `None` when `per_minute` is zero (throttle disabled).
    pub fn new(config: &ThrottleConfig) -> Option<Self> {
        let per_minute = NonZeroU32::new(config.per_minute)?;
        let limiter = GovernorRateLimiter::keyed(Quota::per_minute(per_minute));

        Some(Self {
            limiter,
            clock: DefaultClock::default(),
        })
    }

    /// Returns how long the client must wait, or `None` if the request may proceed.
    pub fn check(&self, key: &str) -> Option<Duration> {
        match self.limiter.check_key(&key.to_string()) {
            Ok(()) => None,
            Err(not_until) => Some(not_until.wait_time_from(self.clock.now())),
        }
    }

    /// Forget clients whose state has fully replenished.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_when_zero() {
        assert!(RequestThrottle::new(&ThrottleConfig { per_minute: 0 }).is_none());
    }

    #[test]
    fn test_burst_then_wait() {
        let throttle = RequestThrottle::new(&ThrottleConfig { per_minute: 3 }).unwrap();

        for _ in 0..3 {
            assert!(throttle.check("198.51.100.4").is_none());
        }
        let wait = throttle.check("198.51.100.4").unwrap();
        assert!(wait > Duration::ZERO);
        assert!(wait <= Duration::from_secs(20));

        assert!(throttle.check("198.51.100.5").is_none());
        assert_eq!(throttle.tracked_clients(), 2);
    }
}
