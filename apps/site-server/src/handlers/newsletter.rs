//! Newsletter signup handler.

use actix_web::{HttpResponse, web};

use coulisses_core::domain::{NewsletterSubscriber, mask_email, normalize_email};
use coulisses_core::error::RepoError;
use coulisses_core::ports::OutgoingEmail;
use coulisses_shared::ApiResponse;
use coulisses_shared::dto::{NewsletterRequest, SubmissionResponse};

use super::enforce_quota;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const WELCOME_SUBJECT: &str = "Bienvenue dans notre newsletter";

/// POST /api/newsletter
pub async fn subscribe(
    state: web::Data<AppState>,
    body: web::Json<NewsletterRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let email = normalize_email(&body.email);

    let key = format!("newsletter:{}", email);
    enforce_quota(&state, &key, &state.limits.newsletter)?;

    let subscriber = NewsletterSubscriber::try_new(&email, body.consent)?;

    let saved = match state.subscribers.subscribe(subscriber).await {
        Ok(saved) => saved,
        Err(RepoError::Constraint(_)) => {
            tracing::debug!(subscriber_email = %mask_email(&email), "Already subscribed");
            return Ok(HttpResponse::Ok().json(ApiResponse::message(
                "Vous êtes déjà inscrit(e) à notre newsletter.",
            )));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(subscriber_email = %mask_email(&saved.email), "New newsletter subscriber");

    if let Err(e) = state.mailer.send(welcome(&saved)).await {
        tracing::error!(
            subscriber_email = %mask_email(&saved.email),
            error = %e,
            "Failed to send welcome email"
        );
    }

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        SubmissionResponse {
            id: saved.id.to_string(),
        },
        "Merci ! Votre inscription est confirmée.",
    )))
}

fn welcome(subscriber: &NewsletterSubscriber) -> OutgoingEmail {
    OutgoingEmail {
        to: subscriber.email.clone(),
        subject: WELCOME_SUBJECT.to_string(),
        text: "Merci de votre inscription ! Vous recevrez nos prochaines dates, \
               créations et actualités de la compagnie.\n\n\
               Pour vous désinscrire, répondez simplement à cet email."
            .to_string(),
        reply_to: None,
    }
}
