//! Logging mailer - used in development when no provider key is set.

use async_trait::async_trait;

use coulisses_core::domain::mask_email;
use coulisses_core::ports::{MailError, Mailer, OutgoingEmail};

/// Writes emails to the log instead of sending them.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        tracing::info!(
            to = %mask_email(&email.to),
            subject = %email.subject,
            bytes = email.text.len(),
            "Email not sent (no provider configured)"
        );
        Ok(())
    }
}
