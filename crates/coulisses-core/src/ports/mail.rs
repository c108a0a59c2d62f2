//! Transactional email port.

use async_trait::async_trait;

/// A plain-text email ready to hand to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub reply_to: Option<String>,
}

/// Mailer trait - abstraction over email delivery providers.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one email.
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// Mail delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Provider rejected the email ({status}): {body}")]
    Provider { status: u16, body: String },
}
