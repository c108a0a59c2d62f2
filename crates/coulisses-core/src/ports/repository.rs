use async_trait::async_trait;

use crate::domain::{ContactMessage, NewsletterSubscriber};
use crate::error::RepoError;

/// Storage for contact form submissions.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Persist a new message.
    async fn save(&self, message: ContactMessage) -> Result<ContactMessage, RepoError>;
}

/// Storage for newsletter subscriptions.
#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    /// Persist a new subscriber.
    ///
    /// Returns `RepoError::Constraint` when the address is already subscribed.
    async fn subscribe(
        &self,
        subscriber: NewsletterSubscriber,
    ) -> Result<NewsletterSubscriber, RepoError>;
}
