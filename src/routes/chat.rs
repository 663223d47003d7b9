use actix_web::{web, HttpResponse, Responder};

use crate::chat;
use crate::content::SiteContent;

#[derive(serde::Deserialize)]
pub struct ChatBody {
    pub message: Option<String>,
}

/// Stateless FAQ endpoint. Every call is independent; the reply is a pure
/// function of the message text and the static site content.
#[tracing::instrument(name = "Handling a chat message", skip(body, content))]
pub async fn handle_chat_message(
    body: web::Json<ChatBody>,
    content: web::Data<SiteContent>,
) -> impl Responder {
    let message = body
        .into_inner()
        .message
        .map(|message| message.trim().to_owned())
        .filter(|message| !message.is_empty());

    match message {
        Some(message) => HttpResponse::Ok().json(serde_json::json!({
            "response": chat::respond(&message, &content),
        })),
        None => HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Please provide a message",
        })),
    }
}
