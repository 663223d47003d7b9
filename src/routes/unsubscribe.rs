use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use sqlx::PgPool;

use crate::domain::subscriber_email::SubscriberEmail;
use crate::routes::error_chain_fmt;
use crate::store;

#[derive(serde::Deserialize)]
pub struct UnsubscribeBody {
    pub email: Option<String>,
}

#[derive(thiserror::Error)]
pub enum UnsubscribeError {
    #[error("Please provide a valid email address")]
    ValidationError(#[source] anyhow::Error),
    #[error("This email was not found in our list")]
    UnknownSubscriber,
    #[error("Something went wrong. Please try again.")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for UnsubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for UnsubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            UnsubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            UnsubscribeError::UnknownSubscriber => StatusCode::NOT_FOUND,
            UnsubscribeError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

/// Soft-deletes a subscriber. Idempotent: repeating the call finds the same
/// row again and reports success both times.
#[tracing::instrument(name = "Handling an unsubscribe request", skip(body, db_pool))]
pub async fn handle_unsubscribe(
    body: web::Json<UnsubscribeBody>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, UnsubscribeError> {
    let email = SubscriberEmail::parse(body.into_inner().email.unwrap_or_default())
        .map_err(|err| UnsubscribeError::ValidationError(anyhow::anyhow!(err)))?;

    store::ensure_schema(&db_pool)
        .await
        .context("Failed to ensure the subscribers schema exists")?;

    let unsubscribed_id = store::mark_unsubscribed(&db_pool, &email)
        .await
        .context("Failed to mark the subscriber as unsubscribed")?
        .ok_or(UnsubscribeError::UnknownSubscriber)?;

    tracing::info!("Subscriber {} unsubscribed", unsubscribed_id);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "You've been successfully unsubscribed. We're sorry to see you go!",
    })))
}
