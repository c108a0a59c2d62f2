use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::email::{is_valid_email, normalize_email};
use crate::error::DomainError;

const NAME_LEN: (usize, usize) = (2, 100);
const SUBJECT_MAX_LEN: usize = 150;
const MESSAGE_LEN: (usize, usize) = (10, 5000);

/// Raw contact form fields as submitted by a visitor.
#[derive(Debug, Clone, Default)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub consent: bool,
}

/// A validated message sent through the public contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl ContactMessage {
    /// Validate the submitted fields and build a new message.
    ///
    /// All field errors are collected so the visitor sees them at once.
    pub fn try_new(input: ContactInput) -> Result<Self, DomainError> {
        let name = input.name.trim().to_string();
        let email = normalize_email(&input.email);
        let subject = input
            .subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let message = input.message.trim().to_string();

        let mut errors = Vec::new();

        let name_len = name.chars().count();
        if name_len < NAME_LEN.0 || name_len > NAME_LEN.1 {
            errors.push(format!(
                "name must be between {} and {} characters",
                NAME_LEN.0, NAME_LEN.1
            ));
        }
        if !is_valid_email(&email) {
            errors.push("email is not a valid address".to_string());
        }
        if subject
            .as_ref()
            .is_some_and(|s| s.chars().count() > SUBJECT_MAX_LEN)
        {
            errors.push(format!(
                "subject must be at most {SUBJECT_MAX_LEN} characters"
            ));
        }
        let message_len = message.chars().count();
        if message_len < MESSAGE_LEN.0 || message_len > MESSAGE_LEN.1 {
            errors.push(format!(
                "message must be between {} and {} characters",
                MESSAGE_LEN.0, MESSAGE_LEN.1
            ));
        }
        if !input.consent {
            errors.push("consent to be contacted is required".to_string());
        }

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            subject,
            message,
            created_at: Utc::now(),
        })
    }
}
