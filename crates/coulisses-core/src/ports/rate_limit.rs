//! Rate limiting port.

use crate::domain::{RateLimitDecision, RateLimitPolicy};

/// Rate limiter trait - per-key request quotas over fixed windows.
///
/// Implementations must make the check and the increment for one key a
/// single atomic step with respect to other callers.
pub trait RateLimiter: Send + Sync {
    /// Record one request for `key` under `policy` and decide whether it is accepted.
    ///
    /// A rejected request is `Ok` with `success == false`; errors are reserved
    /// for caller bugs such as an empty key.
    fn record_request(
        &self,
        key: &str,
        policy: &RateLimitPolicy,
    ) -> Result<RateLimitDecision, RateLimitError>;

    /// Drop entries whose window has fully elapsed. Returns how many were removed.
    fn purge_expired(&self) -> usize;
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Rate limit key must not be empty")]
    EmptyKey,

    #[error("Invalid rate limit policy: {0}")]
    InvalidPolicy(String),
}
