//! Application state - shared across all handlers.

use std::sync::Arc;

use coulisses_core::domain::RateLimitPolicy;
use coulisses_core::ports::{
    Clock, ContactRepository, Mailer, NewsletterRepository, RateLimiter, SystemClock,
};
use coulisses_infra::{
    InMemoryContactRepository, InMemoryNewsletterRepository, InMemoryRateLimiter, LogMailer,
};

use crate::config::AppConfig;

/// Per-endpoint quotas.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub contact: RateLimitPolicy,
    pub newsletter: RateLimitPolicy,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<dyn ContactRepository>,
    pub subscribers: Arc<dyn NewsletterRepository>,
    pub mailer: Arc<dyn Mailer>,
    pub limiter: Arc<dyn RateLimiter>,
    pub clock: Arc<dyn Clock>,
    pub limits: Limits,
    pub contact_notify_address: String,
    pub trust_forwarded_headers: bool,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub fn new(config: &AppConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        #[cfg_attr(not(feature = "remote"), allow(unused_mut))]
        let mut state = Self::in_memory(config, clock);

        #[cfg(feature = "remote")]
        {
            use coulisses_infra::{
                BackendConfig, HttpMailer, MailConfig, RestBackend, RestContactRepository,
                RestNewsletterRepository,
            };

            match BackendConfig::from_env().map(RestBackend::new) {
                Some(Ok(backend)) => {
                    state.contacts = Arc::new(RestContactRepository::new(backend.clone()));
                    state.subscribers = Arc::new(RestNewsletterRepository::new(backend));
                }
                Some(Err(e)) => {
                    tracing::error!(
                        "Failed to configure hosted backend: {}. Using in-memory fallback.",
                        e
                    );
                }
                None => {
                    tracing::warn!(
                        "BACKEND_URL/BACKEND_SERVICE_KEY not set. Submissions are kept in memory."
                    );
                }
            }

            match MailConfig::from_env().map(HttpMailer::new) {
                Some(Ok(mailer)) => state.mailer = Arc::new(mailer),
                Some(Err(e)) => {
                    tracing::error!("Failed to configure mailer: {}. Emails will be logged.", e);
                }
                None => tracing::warn!("MAIL_API_KEY not set. Emails will be logged."),
            }
        }

        #[cfg(not(feature = "remote"))]
        tracing::info!("Running without remote feature - using in-memory storage and log mailer");

        tracing::info!("Application state initialized");

        state
    }

    /// State backed entirely by in-process implementations.
    pub fn in_memory(config: &AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            contacts: Arc::new(InMemoryContactRepository::new()),
            subscribers: Arc::new(InMemoryNewsletterRepository::new()),
            mailer: Arc::new(LogMailer),
            limiter: Arc::new(InMemoryRateLimiter::with_clock(clock.clone())),
            clock,
            limits: Limits {
                contact: config.contact_limit,
                newsletter: config.newsletter_limit,
            },
            contact_notify_address: config.contact_notify_address.clone(),
            trust_forwarded_headers: config.trust_forwarded_headers,
        }
    }
}
