//! Health check endpoint.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: state.clock.now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    use crate::handlers::configure_routes;
    use crate::test_support::test_state;

    use super::*;

    #[actix_rt::test]
    async fn test_health_reports_ok() {
        let (state, _clock) = test_state();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["timestamp"], "2026-04-11T14:00:00+00:00");
    }
}
