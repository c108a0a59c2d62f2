//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use coulisses_core::domain::RateLimitPolicy;
use coulisses_core::ports::RateLimitError;

/// Configuration errors - fail startup rather than run with bad limits.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{name}: {source}")]
    RateLimit {
        name: &'static str,
        source: RateLimitError,
    },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub contact_limit: RateLimitPolicy,
    pub newsletter_limit: RateLimitPolicy,
    /// Requests per minute per client across the API; 0 disables the throttle.
    pub throttle_per_minute: u32,
    /// Key clients on `Forwarded`/`X-Forwarded-For`. Only safe behind a
    /// reverse proxy that overwrites those headers.
    pub trust_forwarded_headers: bool,
    /// Staff inbox receiving contact form notifications.
    pub contact_notify_address: String,
    /// Cron expression for the rate limit sweep.
    pub sweep_schedule: String,
    pub scheduler_enabled: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080)?,
            contact_limit: policy_from_env(
                "CONTACT_RATE_LIMIT",
                "CONTACT_RATE_LIMIT_MAX",
                "CONTACT_RATE_LIMIT_WINDOW_SECS",
                RateLimitPolicy::contact(),
            )?,
            newsletter_limit: policy_from_env(
                "NEWSLETTER_RATE_LIMIT",
                "NEWSLETTER_RATE_LIMIT_MAX",
                "NEWSLETTER_RATE_LIMIT_WINDOW_SECS",
                RateLimitPolicy::newsletter(),
            )?,
            throttle_per_minute: parse_var("API_THROTTLE_PER_MINUTE", 120)?,
            trust_forwarded_headers: parse_var("TRUST_FORWARDED_HEADERS", false)?,
            contact_notify_address: env::var("CONTACT_NOTIFY_ADDRESS")
                .unwrap_or_else(|_| "contact@example.com".to_string()),
            sweep_schedule: env::var("RATE_LIMIT_SWEEP_CRON")
                .unwrap_or_else(|_| "0 */10 * * * *".to_string()),
            scheduler_enabled: env::var("SCHEDULER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        })
    }
}

/// Parse an optional variable, rejecting values that are set but malformed.
fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn policy_from_env(
    name: &'static str,
    max_var: &'static str,
    window_var: &'static str,
    default: RateLimitPolicy,
) -> Result<RateLimitPolicy, ConfigError> {
    let max_requests = parse_var(max_var, default.max_requests())?;
    let window_secs = parse_var(window_var, default.window().num_seconds().max(0) as u64)?;

    RateLimitPolicy::new(max_requests, Duration::from_secs(window_secs))
        .map_err(|source| ConfigError::RateLimit { name, source })
}
