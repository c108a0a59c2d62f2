//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Contact form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    #[serde(default)]
    pub consent: bool,
}

/// Newsletter signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterRequest {
    pub email: String,
    #[serde(default)]
    pub consent: bool,
}

/// Identifier of a stored submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub id: String,
}
