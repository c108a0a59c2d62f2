//! Repositories backed by the hosted backend's REST interface.
//!
//! Rows are inserted with `POST {url}/rest/v1/{table}` using the service key,
//! the PostgREST convention the hosted platform exposes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use uuid::Uuid;

use coulisses_core::domain::{ContactMessage, NewsletterSubscriber, mask_email};
use coulisses_core::error::RepoError;
use coulisses_core::ports::{ContactRepository, NewsletterRepository};

const CONTACT_TABLE: &str = "contact_messages";
const NEWSLETTER_TABLE: &str = "newsletter_subscribers";
/// Postgres `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Hosted backend connection configuration.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Project base URL (e.g., https://xyz.supabase.co)
    pub url: String,
    /// Service role key, sent as `apikey` and bearer token
    pub service_key: String,
    /// Request timeout
    pub timeout: Duration,
}

impl BackendConfig {
    /// Load configuration from environment variables, if the backend is configured.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("BACKEND_URL").ok()?;
        let service_key = std::env::var("BACKEND_SERVICE_KEY").ok()?;

        Some(Self {
            url: url.trim_end_matches('/').to_string(),
            service_key,
            timeout: Duration::from_secs(
                std::env::var("BACKEND_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
        })
    }
}

/// Shared HTTP plumbing for table inserts.
#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    config: Arc<BackendConfig>,
}

impl RestBackend {
    pub fn new(config: BackendConfig) -> Result<Self, RepoError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        tracing::info!(url = %config.url, "Hosted backend client configured");

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.url, table)
    }

    async fn insert<T: Serialize + Sync>(&self, table: &str, row: &T) -> Result<(), RepoError> {
        let response = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.config.service_key)
            .bearer_auth(&self.config.service_key)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_failure(status, &body))
    }
}

/// Map a failed insert to a repository error.
fn classify_failure(status: StatusCode, body: &str) -> RepoError {
    if status == StatusCode::CONFLICT || body.contains(UNIQUE_VIOLATION) {
        RepoError::Constraint("row already exists".to_string())
    } else {
        RepoError::Query(format!("backend answered {status}: {body}"))
    }
}

#[derive(Debug, Serialize)]
struct ContactRow<'a> {
    id: Uuid,
    name: &'a str,
    email: &'a str,
    subject: Option<&'a str>,
    message: &'a str,
    created_at: DateTime<Utc>,
}

impl<'a> From<&'a ContactMessage> for ContactRow<'a> {
    fn from(msg: &'a ContactMessage) -> Self {
        Self {
            id: msg.id,
            name: &msg.name,
            email: &msg.email,
            subject: msg.subject.as_deref(),
            message: &msg.message,
            created_at: msg.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct SubscriberRow<'a> {
    id: Uuid,
    email: &'a str,
    subscribed_at: DateTime<Utc>,
}

impl<'a> From<&'a NewsletterSubscriber> for SubscriberRow<'a> {
    fn from(sub: &'a NewsletterSubscriber) -> Self {
        Self {
            id: sub.id,
            email: &sub.email,
            subscribed_at: sub.subscribed_at,
        }
    }
}

/// Contact repository writing to the `contact_messages` table.
pub struct RestContactRepository {
    backend: RestBackend,
}

impl RestContactRepository {
    pub fn new(backend: RestBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ContactRepository for RestContactRepository {
    async fn save(&self, message: ContactMessage) -> Result<ContactMessage, RepoError> {
        self.backend
            .insert(CONTACT_TABLE, &ContactRow::from(&message))
            .await?;
        tracing::debug!(message_id = %message.id, "Contact message stored");
        Ok(message)
    }
}

/// Newsletter repository writing to the `newsletter_subscribers` table.
pub struct RestNewsletterRepository {
    backend: RestBackend,
}

impl RestNewsletterRepository {
    pub fn new(backend: RestBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl NewsletterRepository for RestNewsletterRepository {
    async fn subscribe(
        &self,
        subscriber: NewsletterSubscriber,
    ) -> Result<NewsletterSubscriber, RepoError> {
        tracing::debug!(subscriber_email = %mask_email(&subscriber.email), "Storing subscriber");
        self.backend
            .insert(NEWSLETTER_TABLE, &SubscriberRow::from(&subscriber))
            .await?;
        Ok(subscriber)
    }
}
