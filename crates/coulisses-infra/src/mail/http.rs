//! Transactional email over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use coulisses_core::domain::mask_email;
use coulisses_core::ports::{MailError, Mailer, OutgoingEmail};

/// Email provider configuration.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Send endpoint of the provider
    pub api_url: String,
    /// API key sent as bearer token
    pub api_key: String,
    /// Sender, e.g. `Compagnie <contact@compagnie.fr>`
    pub from: String,
    /// Request timeout
    pub timeout: Duration,
}

impl MailConfig {
    /// Load configuration from environment variables, if a provider key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("MAIL_API_KEY").ok()?;

        Some(Self {
            api_url: std::env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
            api_key,
            from: std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Coulisses <no-reply@example.com>".to_string()),
            timeout: Duration::from_secs(10),
        })
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

/// Mailer posting JSON to the provider's send endpoint.
pub struct HttpMailer {
    client: Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MailError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let request = SendRequest {
            from: &self.config.from,
            to: [&email.to],
            subject: &email.subject,
            text: &email.text,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| MailError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %mask_email(&email.to), subject = %email.subject, "Email sent");
        Ok(())
    }
}
