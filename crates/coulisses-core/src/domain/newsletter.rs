use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::email::{is_valid_email, normalize_email};
use crate::error::DomainError;

/// A newsletter subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    pub id: Uuid,
    /// Normalized (trimmed, lower-cased) address.
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}

impl NewsletterSubscriber {
    /// Validate a signup and build a new subscriber.
    pub fn try_new(email: &str, consent: bool) -> Result<Self, DomainError> {
        let email = normalize_email(email);

        let mut errors = Vec::new();
        if !is_valid_email(&email) {
            errors.push("email is not a valid address".to_string());
        }
        if !consent {
            errors.push("consent to receive the newsletter is required".to_string());
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            email,
            subscribed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_address() {
        let sub = NewsletterSubscriber::try_new("  Test@Example.com ", true).unwrap();
        assert_eq!(sub.email, "test@example.com");
    }

    #[test]
    fn test_requires_consent() {
        let DomainError::Validation(errors) =
            NewsletterSubscriber::try_new("test@example.com", false).unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
