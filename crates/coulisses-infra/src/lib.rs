//! # Coulisses Infrastructure
//!
//! Concrete implementations of the ports defined in `coulisses-core`.
//! This crate contains the rate limiters, repositories, and mailers.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `throttle` - Per-client request throttle via governor
//! - `remote` - Hosted backend repositories and HTTP mailer via reqwest
//! - `test-util` - `ManualClock` for driving time in tests

#[cfg(any(test, feature = "test-util"))]
pub mod clock;
pub mod mail;
pub mod rate_limit;
pub mod repository;

// Re-exports - In-Memory
#[cfg(any(test, feature = "test-util"))]
pub use clock::ManualClock;
pub use mail::LogMailer;
pub use rate_limit::InMemoryRateLimiter;
pub use repository::{InMemoryContactRepository, InMemoryNewsletterRepository};

#[cfg(feature = "throttle")]
pub use rate_limit::{RequestThrottle, ThrottleConfig};

// Re-exports - Remote
#[cfg(feature = "remote")]
pub use mail::{HttpMailer, MailConfig};
#[cfg(feature = "remote")]
pub use repository::{BackendConfig, RestBackend, RestContactRepository, RestNewsletterRepository};
