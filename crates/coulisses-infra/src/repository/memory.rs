//! In-memory repositories - used when no hosted backend is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use coulisses_core::domain::{ContactMessage, NewsletterSubscriber, mask_email};
use coulisses_core::error::RepoError;
use coulisses_core::ports::{ContactRepository, NewsletterRepository};

/// Contact messages kept in a HashMap behind an async RwLock.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryContactRepository {
    store: RwLock<HashMap<Uuid, ContactMessage>>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn save(&self, message: ContactMessage) -> Result<ContactMessage, RepoError> {
        let mut store = self.store.write().await;
        store.insert(message.id, message.clone());
        tracing::debug!(message_id = %message.id, "Contact message stored in memory");
        Ok(message)
    }
}

/// Newsletter subscribers keyed by normalized email.
#[derive(Default)]
pub struct InMemoryNewsletterRepository {
    store: RwLock<HashMap<String, NewsletterSubscriber>>,
}

impl InMemoryNewsletterRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl NewsletterRepository for InMemoryNewsletterRepository {
    async fn subscribe(
        &self,
        subscriber: NewsletterSubscriber,
    ) -> Result<NewsletterSubscriber, RepoError> {
        let mut store = self.store.write().await;

        if store.contains_key(&subscriber.email) {
            return Err(RepoError::Constraint(format!(
                "{} is already subscribed",
                mask_email(&subscriber.email)
            )));
        }

        store.insert(subscriber.email.clone(), subscriber.clone());
        Ok(subscriber)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coulisses_core::domain::ContactInput;

    #[tokio::test]
    async fn test_save_contact_message() {
        let repo = InMemoryContactRepository::new();
        let msg = ContactMessage::try_new(ContactInput {
            name: "Lou".to_string(),
            email: "lou@example.com".to_string(),
            subject: None,
            message: "Une question sur la tournée.".to_string(),
            consent: true,
        })
        .unwrap();

        let saved = repo.save(msg.clone()).await.unwrap();
        assert_eq!(saved.id, msg.id);
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_subscriber_is_a_constraint_error() {
        let repo = InMemoryNewsletterRepository::new();
        let first = NewsletterSubscriber::try_new("fan@example.com", true).unwrap();
        let again = NewsletterSubscriber::try_new(" FAN@example.com", true).unwrap();

        repo.subscribe(first).await.unwrap();
        let err = repo.subscribe(again).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
        assert_eq!(repo.count().await, 1);
    }
}
