//! Domain entities and rules.

mod contact;
mod email;
mod newsletter;
mod rate_limit;

pub use contact::{ContactInput, ContactMessage};
pub use email::{is_valid_email, mask_email, normalize_email};
pub use newsletter::NewsletterSubscriber;
pub use rate_limit::{RateLimitDecision, RateLimitEntry, RateLimitPolicy};
