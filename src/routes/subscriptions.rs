use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use anyhow::Context;
use sqlx::PgPool;

use crate::content::SiteContent;
use crate::domain::new_subscriber::{NewSubscriber, SubscribeBody};
use crate::email_client::EmailClient;
use crate::notifier;
use crate::routes::error_chain_fmt;
use crate::startup::{AdminEmail, ApplicationBaseUrl};
use crate::store::{self, SignupMetadata};

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("Please provide a valid email address")]
    ValidationError(#[source] anyhow::Error),
    // Defensive: the upsert's ON CONFLICT clause already absorbs duplicates,
    // so a raw unique violation reaching the handler is a dead path.
    #[error("This email is already subscribed!")]
    DuplicateSubscriber,
    #[error("Something went wrong. Please try again.")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::DuplicateSubscriber => StatusCode::CONFLICT,
            SubscribeError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Internal detail stays in the logs; the client only sees the
        // message from the Display impl.
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

#[tracing::instrument(
    name = "Handling a newsletter signup",
    skip(request, body, db_pool, email_client, base_url, admin_email, content)
)]
pub async fn handle_subscribe(
    request: HttpRequest,
    body: web::Json<SubscribeBody>,
    db_pool: web::Data<PgPool>,
    email_client: web::Data<EmailClient>,
    base_url: web::Data<ApplicationBaseUrl>,
    admin_email: web::Data<AdminEmail>,
    content: web::Data<SiteContent>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscriber: NewSubscriber = body
        .into_inner()
        .try_into()
        .map_err(|err: String| SubscribeError::ValidationError(anyhow::anyhow!(err)))?;
    let signup = signup_metadata(&request);

    store::ensure_schema(&db_pool)
        .await
        .context("Failed to ensure the subscribers schema exists")?;

    let subscriber = store::upsert_subscriber(&db_pool, &new_subscriber, &signup)
        .await
        .map_err(|err| {
            if store::is_unique_violation(&err) {
                SubscribeError::DuplicateSubscriber
            } else {
                anyhow::Error::new(err)
                    .context("Failed to insert or reactivate the subscriber")
                    .into()
            }
        })?;

    tracing::info!(
        "Subscriber {} recorded (source: {})",
        subscriber.email.as_ref(),
        subscriber.source
    );

    let response = HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Thanks for subscribing! Check your inbox for a welcome email.",
        "subscriber": {
            "email": subscriber.email.as_ref(),
            "name": subscriber.name.clone(),
        },
    }));

    // Best-effort sends; the response never waits on them
    notifier::spawn_signup_notifications(
        email_client,
        content,
        base_url.0.clone(),
        admin_email.0.clone(),
        subscriber,
    );

    Ok(response)
}

fn signup_metadata(request: &HttpRequest) -> SignupMetadata {
    let ip_address = request
        .connection_info()
        .realip_remote_addr()
        .map(str::to_owned);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    SignupMetadata {
        ip_address,
        user_agent,
    }
}
