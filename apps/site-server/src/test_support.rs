//! Shared fixtures for handler tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};

use coulisses_core::domain::RateLimitPolicy;
use coulisses_infra::ManualClock;

use crate::config::AppConfig;
use crate::state::AppState;

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        contact_limit: RateLimitPolicy::contact(),
        newsletter_limit: RateLimitPolicy::newsletter(),
        throttle_per_minute: 0,
        trust_forwarded_headers: false,
        contact_notify_address: "equipe@example.com".to_string(),
        sweep_schedule: "0 */10 * * * *".to_string(),
        scheduler_enabled: false,
    }
}

/// In-memory state driven by a manual clock; the clock handle is returned
/// so tests can move time forward.
pub fn test_state() -> (AppState, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 4, 11, 14, 0, 0).unwrap());
    let state = AppState::in_memory(&test_config(), Arc::new(clock.clone()));
    (state, clock)
}
