//! HTTP handlers and route configuration.

mod contact;
mod health;
mod newsletter;

use actix_web::{HttpRequest, error::JsonPayloadError, web};

use coulisses_core::domain::RateLimitPolicy;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(16 * 1024).error_handler(json_error))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .route("/contact", web::post().to(contact::submit))
                .route("/newsletter", web::post().to(newsletter::subscribe)),
        );
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Charge one request against `key` and turn a rejection into a 429.
///
/// Called before any validation or side effect.
pub(crate) fn enforce_quota(
    state: &AppState,
    key: &str,
    policy: &RateLimitPolicy,
) -> AppResult<()> {
    let decision = state.limiter.record_request(key, policy)?;
    if decision.success {
        return Ok(());
    }

    let now = state.clock.now();
    let minutes = decision.retry_after_minutes(now);
    Err(AppError::TooManyRequests {
        detail: format!(
            "Trop de requêtes. Veuillez réessayer dans {} minute{}.",
            minutes,
            if minutes > 1 { "s" } else { "" }
        ),
        retry_after_secs: decision.retry_after_secs(now),
    })
}
