//! Mailer implementations - HTTP provider and logging fallback.

mod log;

pub use log::LogMailer;

#[cfg(feature = "remote")]
mod http;
#[cfg(feature = "remote")]
pub use http::{HttpMailer, MailConfig};
