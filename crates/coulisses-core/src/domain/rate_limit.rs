//! Fixed-window request counting.
//!
//! A window opens on the first request seen for a key and lasts for the
//! policy's duration. Requests are counted into the open window until the
//! policy's maximum is reached; later requests are rejected without being
//! counted. A request arriving at or after the window end opens a new window.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::ports::RateLimitError;

/// Maximum accepted requests per window, and the window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    max_requests: u32,
    window: TimeDelta,
}

impl RateLimitPolicy {
    /// Build a policy, rejecting a zero limit or an empty window.
    pub fn new(max_requests: u32, window: Duration) -> Result<Self, RateLimitError> {
        if max_requests == 0 {
            return Err(RateLimitError::InvalidPolicy(
                "max_requests must be positive".to_string(),
            ));
        }

        let window = TimeDelta::from_std(window)
            .map_err(|e| RateLimitError::InvalidPolicy(format!("window out of range: {e}")))?;
        if window <= TimeDelta::zero() {
            return Err(RateLimitError::InvalidPolicy(
                "window must be positive".to_string(),
            ));
        }

        Ok(Self {
            max_requests,
            window,
        })
    }

    /// Contact form: 5 submissions per 15 minutes per client address.
    pub fn contact() -> Self {
        Self {
            max_requests: 5,
            window: TimeDelta::minutes(15),
        }
    }

    /// Newsletter signup: 3 attempts per hour per email address.
    pub fn newsletter() -> Self {
        Self {
            max_requests: 3,
            window: TimeDelta::minutes(60),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }
}

/// Outcome of recording one request against a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    /// Whether this request was accepted.
    pub success: bool,
    /// Requests still permitted in the current window after this one.
    pub remaining: u32,
    /// When the current window ends and the counter resets.
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Time left until `reset_at`, never negative.
    pub fn retry_after(&self, now: DateTime<Utc>) -> TimeDelta {
        (self.reset_at - now).max(TimeDelta::zero())
    }

    /// Whole minutes to wait before retrying, rounded up.
    pub fn retry_after_minutes(&self, now: DateTime<Utc>) -> i64 {
        let millis = self.retry_after(now).num_milliseconds();
        ((millis + 59_999) / 60_000).max(1)
    }

    /// Whole seconds to wait before retrying, rounded up (for `Retry-After`).
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> u64 {
        let millis = self.retry_after(now).num_milliseconds();
        ((millis + 999) / 1_000).max(1) as u64
    }
}

/// Request-counting state for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitEntry {
    count: u32,
    window_start: DateTime<Utc>,
    window: TimeDelta,
}

impl RateLimitEntry {
    /// A fresh, empty window opened at `now`.
    pub fn new(now: DateTime<Utc>, policy: &RateLimitPolicy) -> Self {
        Self {
            count: 0,
            window_start: now,
            window: policy.window,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn window_start(&self) -> DateTime<Utc> {
        self.window_start
    }

    pub fn window_end(&self) -> DateTime<Utc> {
        self.window_start + self.window
    }

    /// Whether the window this entry was opened with has fully elapsed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.window_end()
    }

    /// Count one request at `now` under `policy`.
    ///
    /// Expiry is judged by the window the entry was opened with, the same
    /// test the sweep uses. A new window takes `policy`'s length. Rejected
    /// requests leave the count untouched.
    pub fn record(&mut self, now: DateTime<Utc>, policy: &RateLimitPolicy) -> RateLimitDecision {
        if self.is_expired(now) {
            *self = Self::new(now, policy);
        }

        let reset_at = self.window_end();

        if self.count >= policy.max_requests {
            return RateLimitDecision {
                success: false,
                remaining: 0,
                reset_at,
            };
        }

        self.count += 1;
        RateLimitDecision {
            success: true,
            remaining: policy.max_requests - self.count,
            reset_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 20, 30, 0).unwrap()
    }

    fn policy(max: u32, secs: u64) -> RateLimitPolicy {
        RateLimitPolicy::new(max, Duration::from_secs(secs)).unwrap()
    }

    #[test]
    fn test_policy_rejects_zero_limit() {
        let err = RateLimitPolicy::new(0, Duration::from_secs(60)).unwrap_err();
        assert!(matches!(err, RateLimitError::InvalidPolicy(_)));
    }

    #[test]
    fn test_policy_rejects_empty_window() {
        let err = RateLimitPolicy::new(3, Duration::ZERO).unwrap_err();
        assert!(matches!(err, RateLimitError::InvalidPolicy(_)));
    }

    #[test]
    fn test_named_policies() {
        let contact = RateLimitPolicy::contact();
        assert_eq!(contact.max_requests(), 5);
        assert_eq!(contact.window().num_milliseconds(), 900_000);

        let newsletter = RateLimitPolicy::newsletter();
        assert_eq!(newsletter.max_requests(), 3);
        assert_eq!(newsletter.window().num_milliseconds(), 3_600_000);
    }

    #[test]
    fn test_counts_down_then_rejects() {
        let policy = policy(3, 60);
        let mut entry = RateLimitEntry::new(t0(), &policy);

        let remaining: Vec<u32> = (0..3)
            .map(|_| {
                let decision = entry.record(t0(), &policy);
                assert!(decision.success);
                decision.remaining
            })
            .collect();
        assert_eq!(remaining, vec![2, 1, 0]);

        let rejected = entry.record(t0(), &policy);
        assert!(!rejected.success);
        assert_eq!(rejected.remaining, 0);
        assert_eq!(rejected.reset_at, t0() + TimeDelta::seconds(60));
        assert_eq!(entry.count(), 3);
    }

    #[test]
    fn test_window_boundary_opens_new_window() {
        let policy = policy(1, 60);
        let mut entry = RateLimitEntry::new(t0(), &policy);
        assert!(entry.record(t0(), &policy).success);

        let just_before = t0() + TimeDelta::seconds(60) - TimeDelta::milliseconds(1);
        assert!(!entry.record(just_before, &policy).success);

        let boundary = t0() + TimeDelta::seconds(60);
        let decision = entry.record(boundary, &policy);
        assert!(decision.success);
        assert_eq!(decision.remaining, 0);
        assert_eq!(entry.window_start(), boundary);
        assert_eq!(decision.reset_at, boundary + TimeDelta::seconds(60));
    }

    #[test]
    fn test_expiry_follows_the_open_window() {
        let short = policy(1, 60);
        let long = policy(1, 600);
        let mut entry = RateLimitEntry::new(t0(), &short);
        assert!(entry.record(t0(), &short).success);

        // A longer policy does not stretch a window already opened
        let rejected = entry.record(t0() + TimeDelta::seconds(30), &long);
        assert!(!rejected.success);
        assert_eq!(rejected.reset_at, t0() + TimeDelta::seconds(60));

        let later = t0() + TimeDelta::seconds(60);
        assert!(entry.is_expired(later));
        let decision = entry.record(later, &long);
        assert!(decision.success);
        assert_eq!(decision.reset_at, later + TimeDelta::seconds(600));
        assert!(!entry.is_expired(later + TimeDelta::seconds(599)));
    }

    #[test]
    fn test_retry_after_minutes_rounds_up() {
        let decision = RateLimitDecision {
            success: false,
            remaining: 0,
            reset_at: t0() + TimeDelta::minutes(15),
        };
        assert_eq!(decision.retry_after_minutes(t0()), 15);
        assert_eq!(
            decision.retry_after_minutes(t0() + TimeDelta::seconds(30)),
            15
        );
        assert_eq!(
            decision.retry_after_minutes(t0() + TimeDelta::minutes(14) + TimeDelta::seconds(1)),
            1
        );
        assert_eq!(decision.retry_after_secs(t0()), 900);
    }

    #[test]
    fn test_retry_after_never_below_one_minute() {
        let decision = RateLimitDecision {
            success: false,
            remaining: 0,
            reset_at: t0(),
        };
        assert_eq!(decision.retry_after(t0() + TimeDelta::seconds(5)), TimeDelta::zero());
        assert_eq!(decision.retry_after_minutes(t0() + TimeDelta::seconds(5)), 1);
    }
}
