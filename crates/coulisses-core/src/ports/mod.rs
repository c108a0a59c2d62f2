//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod mail;
mod rate_limit;
mod repository;

pub use clock::{Clock, SystemClock};
pub use mail::{MailError, Mailer, OutgoingEmail};
pub use rate_limit::{RateLimitError, RateLimiter};
pub use repository::{ContactRepository, NewsletterRepository};
