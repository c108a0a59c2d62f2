//! In-memory fixed-window rate limiter.

use std::sync::Arc;

use dashmap::DashMap;

use coulisses_core::domain::{RateLimitDecision, RateLimitEntry, RateLimitPolicy};
use coulisses_core::ports::{Clock, RateLimitError, RateLimiter, SystemClock};

/// Per-key fixed-window rate limiter backed by a concurrent map.
///
/// The entry for a key is read, reset if expired, checked and incremented
/// while its shard write guard is held, so concurrent requests for the same
/// key are serialized and never lose an increment.
///
/// Note: Counters are per-process and are lost on restart.
pub struct InMemoryRateLimiter {
    entries: DashMap<String, RateLimitEntry>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRateLimiter {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Number of keys currently holding a counter.
    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// The part of a key before the first `:`, safe to log.
fn namespace(key: &str) -> &str {
    key.split_once(':').map(|(ns, _)| ns).unwrap_or("default")
}

impl RateLimiter for InMemoryRateLimiter {
    fn record_request(
        &self,
        key: &str,
        policy: &RateLimitPolicy,
    ) -> Result<RateLimitDecision, RateLimitError> {
        if key.is_empty() {
            return Err(RateLimitError::EmptyKey);
        }

        let decision = {
            let mut entry = self
                .entries
                .entry(key.to_string())
                .or_insert_with(|| RateLimitEntry::new(self.clock.now(), policy));
            let now = self.clock.now();
            entry.record(now, policy)
        };

        if decision.success {
            tracing::debug!(
                namespace = namespace(key),
                remaining = decision.remaining,
                "Request counted"
            );
        } else {
            tracing::warn!(
                namespace = namespace(key),
                reset_at = %decision.reset_at,
                "Rate limit exceeded"
            );
        }

        Ok(decision)
    }

    fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());

        if removed > 0 {
            tracing::debug!(removed, remaining = self.entries.len(), "Purged expired rate limit entries");
        }

        removed
    }
}
