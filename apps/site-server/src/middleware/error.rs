//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use coulisses_shared::ErrorResponse;
use std::fmt;

use coulisses_core::error::{DomainError, RepoError};
use coulisses_core::ports::RateLimitError;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    TooManyRequests {
        detail: String,
        retry_after_secs: u64,
    },
    Internal(String),
    Validation(Vec<String>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::TooManyRequests { detail, .. } => write!(f, "Too many requests: {}", detail),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());

        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::TooManyRequests {
                detail,
                retry_after_secs,
            } => {
                builder
                    .insert_header(("Retry-After", retry_after_secs.to_string()))
                    .insert_header(("X-RateLimit-Remaining", "0"));
                ErrorResponse::too_many_requests(detail)
            }
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::validation_failed(errors.clone()),
        };

        builder.json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(errors) => AppError::Validation(errors),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => {
                tracing::error!("Unhandled constraint violation: {}", msg);
                AppError::Internal("Storage error".to_string())
            }
            RepoError::Connection(msg) => {
                tracing::error!("Backend connection error: {}", msg);
                AppError::Internal("Storage error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Backend query error: {}", msg);
                AppError::Internal("Storage error".to_string())
            }
        }
    }
}

// A limiter error means the caller built a bad key or policy.
impl From<RateLimitError> for AppError {
    fn from(err: RateLimitError) -> Self {
        AppError::Internal(format!("Rate limiter misuse: {}", err))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_many_requests_sets_headers() {
        let err = AppError::TooManyRequests {
            detail: "wait".to_string(),
            retry_after_secs: 90,
        };
        let res = err.error_response();
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers().get("Retry-After").unwrap(), "90");
    }

    #[test]
    fn test_repo_errors_are_internal() {
        let err: AppError = RepoError::Query("boom".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
