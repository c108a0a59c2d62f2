//! # Coulisses Site Server
//!
//! The Actix-web HTTP server behind the theater company's public contact
//! form and newsletter signup.

use actix_web::{App, HttpResponse, HttpServer, web};
use tracing_actix_web::TracingLogger;

#[cfg(feature = "scheduler")]
mod background;
mod client;
mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

#[cfg(test)]
mod test_support;

use config::AppConfig;
use middleware::error::{AppError, AppResult};
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    tracing::info!(
        contact_max = config.contact_limit.max_requests(),
        contact_window_secs = config.contact_limit.window().num_seconds(),
        newsletter_max = config.newsletter_limit.max_requests(),
        newsletter_window_secs = config.newsletter_limit.window().num_seconds(),
        "Starting Coulisses site server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config);

    #[cfg(feature = "throttle")]
    let throttle = coulisses_infra::RequestThrottle::new(&coulisses_infra::ThrottleConfig {
        per_minute: config.throttle_per_minute,
    })
    .map(std::sync::Arc::new);

    #[cfg(feature = "throttle")]
    if throttle.is_none() {
        tracing::info!("API throttle disabled");
    }

    #[cfg(feature = "scheduler")]
    let mut scheduler = {
        let scheduler = background::Scheduler::new(config.scheduler_enabled)
            .await
            .map_err(std::io::Error::other)?;
        background::register_rate_limit_sweep(
            &scheduler,
            &config.sweep_schedule,
            state.limiter.clone(),
            #[cfg(feature = "throttle")]
            throttle.clone(),
        )
        .await
        .map_err(std::io::Error::other)?;
        scheduler.start().await.map_err(std::io::Error::other)?;
        scheduler
    };

    if config.trust_forwarded_headers {
        tracing::info!("Client addresses taken from forwarded headers");
    }

    let app_state = state;
    #[cfg(feature = "throttle")]
    let app_throttle = throttle.clone();
    #[cfg(feature = "throttle")]
    let trust_forwarded_headers = config.trust_forwarded_headers;

    // Start HTTP server
    let result = HttpServer::new(move || {
        let app = App::new()
            .app_data(web::Data::new(app_state.clone()))
            .configure(handlers::configure_routes)
            .default_service(web::to(not_found));

        #[cfg(feature = "throttle")]
        let app = app.wrap(middleware::throttle::ThrottleMiddleware::new(
            app_throttle.clone(),
            trust_forwarded_headers,
        ));

        app.wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    #[cfg(feature = "scheduler")]
    if let Err(e) = scheduler.shutdown().await {
        tracing::warn!("Scheduler shutdown failed: {}", e);
    }

    result
}

async fn not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("No such route".to_string()))
}
