//! Contact form handler.

use actix_web::{HttpRequest, HttpResponse, web};

use coulisses_core::domain::{ContactInput, ContactMessage};
use coulisses_core::ports::OutgoingEmail;
use coulisses_shared::ApiResponse;
use coulisses_shared::dto::{ContactRequest, SubmissionResponse};

use super::enforce_quota;
use crate::client::client_address;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/contact
pub async fn submit(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<ContactRequest>,
) -> AppResult<HttpResponse> {
    let client = client_address(&req.connection_info(), state.trust_forwarded_headers);
    let key = format!("contact:{}", client);
    enforce_quota(&state, &key, &state.limits.contact)?;

    let body = body.into_inner();
    let message = ContactMessage::try_new(ContactInput {
        name: body.name,
        email: body.email,
        subject: body.subject,
        message: body.message,
        consent: body.consent,
    })?;

    let saved = state.contacts.save(message).await?;
    tracing::info!(message_id = %saved.id, "Contact message received");

    // The message is stored; a failed notification must not fail the visitor.
    if let Err(e) = state
        .mailer
        .send(notification(&saved, &state.contact_notify_address))
        .await
    {
        tracing::error!(message_id = %saved.id, error = %e, "Failed to send contact notification");
    }

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        SubmissionResponse {
            id: saved.id.to_string(),
        },
        "Merci ! Votre message a bien été envoyé.",
    )))
}

/// Staff notification for a new contact message.
fn notification(message: &ContactMessage, staff_address: &str) -> OutgoingEmail {
    let subject = match &message.subject {
        Some(subject) => format!("[Contact] {}", subject),
        None => format!("[Contact] Message de {}", message.name),
    };

    OutgoingEmail {
        to: staff_address.to_string(),
        subject,
        text: format!(
            "Nom : {}\nEmail : {}\nReçu le : {}\n\n{}",
            message.name,
            message.email,
            message.created_at.format("%d/%m/%Y %H:%M"),
            message.message
        ),
        reply_to: Some(message.email.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use actix_web::{App, http::StatusCode, test as actix_test};
    use async_trait::async_trait;
    use chrono::{TimeDelta, TimeZone, Utc};
    use serde_json::{Value, json};

    use coulisses_core::ports::{MailError, Mailer};
    use coulisses_infra::InMemoryContactRepository;

    use super::*;
    use crate::handlers::configure_routes;
    use crate::test_support::test_state;

    fn valid_body() -> Value {
        json!({
            "name": "Camille Martin",
            "email": "camille@example.com",
            "message": "Bonjour, proposez-vous des ateliers pour enfants ?",
            "consent": true
        })
    }

    fn post(ip: &str, body: &Value) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/contact")
            .peer_addr(format!("{ip}:4000").parse().unwrap())
            .set_json(body)
    }

    #[actix_rt::test]
    async fn test_sixth_submission_is_rejected_with_wait_time() {
        let (state, _clock) = test_state();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        for _ in 0..5 {
            let req = post("203.0.113.7", &valid_body()).to_request();
            let res = actix_test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::CREATED);
        }

        let req = post("203.0.113.7", &valid_body()).to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers().get("Retry-After").unwrap(), "900");

        let body: Value = actix_test::read_body_json(res).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("15 minutes"), "{detail}");
    }

    #[actix_rt::test]
    async fn test_forwarded_header_does_not_open_new_quota() {
        let (state, _clock) = test_state();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let mut statuses = Vec::new();
        for i in 0..6 {
            let req = post("203.0.113.7", &valid_body())
                .insert_header(("x-forwarded-for", format!("10.0.0.{i}")))
                .to_request();
            statuses.push(actix_test::call_service(&app, req).await.status());
        }

        assert_eq!(statuses[..5], [StatusCode::CREATED; 5]);
        assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_rt::test]
    async fn test_quota_is_charged_before_validation() {
        let (state, clock) = test_state();
        let contacts = Arc::new(InMemoryContactRepository::new());
        let state = AppState {
            contacts: contacts.clone(),
            ..state
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let invalid = json!({ "name": "", "email": "nope", "message": "" });
        for _ in 0..5 {
            let req = post("198.51.100.1", &invalid).to_request();
            let res = actix_test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }

        // Quota exhausted by invalid submissions: a valid one is now refused too
        let req = post("198.51.100.1", &valid_body()).to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(contacts.count().await, 0);

        // Another address is unaffected
        let req = post("198.51.100.2", &valid_body()).to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        // And the first address recovers once the window has ended
        clock.advance(TimeDelta::minutes(15));
        let req = post("198.51.100.1", &valid_body()).to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(contacts.count().await, 2);
    }

    struct FailingMailer(AtomicUsize);

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _email: OutgoingEmail) -> Result<(), MailError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(MailError::Connection("provider down".to_string()))
        }
    }

    #[actix_rt::test]
    async fn test_mail_failure_does_not_fail_submission() {
        let (state, _clock) = test_state();
        let mailer = Arc::new(FailingMailer(AtomicUsize::new(0)));
        let state = AppState {
            mailer: mailer.clone(),
            ..state
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(configure_routes),
        )
        .await;

        let req = post("192.0.2.33", &valid_body()).to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(mailer.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_notification_replies_to_visitor() {
        let mut message = ContactMessage::try_new(ContactInput {
            name: "Lou".to_string(),
            email: "lou@example.com".to_string(),
            subject: None,
            message: "Une question sur la billetterie.".to_string(),
            consent: true,
        })
        .unwrap();
        message.created_at = Utc.with_ymd_and_hms(2026, 1, 9, 18, 45, 0).unwrap();

        let email = notification(&message, "equipe@example.com");
        assert_eq!(email.to, "equipe@example.com");
        assert_eq!(email.subject, "[Contact] Message de Lou");
        assert_eq!(email.reply_to.as_deref(), Some("lou@example.com"));
        assert!(email.text.contains("09/01/2026 18:45"));
    }
}
