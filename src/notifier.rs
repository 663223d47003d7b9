//! Best-effort signup notifications. Both sends are detached from the
//! request that triggered them: one attempt each, failures logged and
//! dropped, the subscriber never sees a delivery error.

use actix_web::web;

use crate::content::SiteContent;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::email_client::EmailClient;
use crate::store::SubscriberRecord;

/// Spawns the admin alert and the welcome email as two independent tasks.
/// Returns immediately; neither task is ever joined.
pub fn spawn_signup_notifications(
    email_client: web::Data<EmailClient>,
    content: web::Data<SiteContent>,
    base_url: String,
    admin_email: Option<SubscriberEmail>,
    subscriber: SubscriberRecord,
) {
    match admin_email {
        Some(admin) => {
            let email_client = email_client.clone();
            let subscriber = subscriber.clone();

            tokio::spawn(async move {
                if let Err(err) = send_admin_alert(&email_client, &admin, &subscriber).await {
                    tracing::warn!(
                        "Failed to send admin alert for {}: {:?}",
                        subscriber.email.as_ref(),
                        err
                    );
                }
            });
        }
        None => {
            tracing::info!("No notification address configured, skipping admin alert");
        }
    }

    tokio::spawn(async move {
        if let Err(err) =
            send_welcome_email(&email_client, &content, &base_url, &subscriber).await
        {
            tracing::warn!(
                "Failed to send welcome email to {}: {:?}",
                subscriber.email.as_ref(),
                err
            );
        }
    });
}

#[tracing::instrument(
    name = "Send an admin alert for a new subscriber",
    skip(email_client, admin, subscriber),
    fields(subscriber_email = %subscriber.email.as_ref())
)]
pub async fn send_admin_alert(
    email_client: &EmailClient,
    admin: &SubscriberEmail,
    subscriber: &SubscriberRecord,
) -> Result<(), reqwest::Error> {
    let name = subscriber.name.as_deref().unwrap_or("Not provided");
    let subject = format!("New subscriber: {}", subscriber.email.as_ref());
    let text_body = format!(
        "New subscriber!\n\nEmail: {}\nName: {}\nSource: {}\nTime: {}",
        subscriber.email.as_ref(),
        name,
        subscriber.source,
        subscriber.subscribed_at,
    );
    let html_body = format!(
        r#"
            <div>
                <h2>New subscriber!</h2>
                <p><strong>Email:</strong> {}</p>
                <p><strong>Name:</strong> {}</p>
                <p><strong>Source:</strong> {}</p>
                <p><strong>Subscribed at:</strong> {}</p>
            </div>
        "#,
        subscriber.email.as_ref(),
        name,
        subscriber.source,
        subscriber.subscribed_at,
    );

    email_client
        .send_email(admin, &subject, &text_body, &html_body)
        .await
}

#[tracing::instrument(
    name = "Send a welcome email to a new subscriber",
    skip(email_client, content, subscriber),
    fields(subscriber_email = %subscriber.email.as_ref())
)]
pub async fn send_welcome_email(
    email_client: &EmailClient,
    content: &SiteContent,
    base_url: &str,
    subscriber: &SubscriberRecord,
) -> Result<(), reqwest::Error> {
    let first_name = subscriber
        .name
        .as_deref()
        .and_then(|name| name.split_whitespace().next())
        .unwrap_or("there");
    let link = unsubscribe_link(base_url, subscriber.email.as_ref());

    let subject = format!("Welcome aboard, {}!", first_name);
    let text_body = format!(
        "Hey {first_name}!\n\n\
         Thanks for subscribing to my newsletter. You'll get updates on new \
         articles, book news and behind-the-scenes looks at what I'm building.\n\n\
         In the meantime, check out \"{book}\" if you haven't already.\n\n\
         Talk soon,\n{owner}\n\n---\n\
         You're receiving this because you signed up at {site}.\n\
         Unsubscribe: {link}",
        first_name = first_name,
        book = content.book_title,
        owner = content.owner,
        site = content.site_url_label,
        link = link,
    );
    let html_body = format!(
        r#"
            <div>
                <h1>Hey {first_name}!</h1>
                <p>Thanks for subscribing to my newsletter. You'll get updates on new
                articles, book news and behind-the-scenes looks at what I'm building.</p>
                <p>In the meantime, check out <strong>"{book}"</strong> if you haven't already.</p>
                <p>Talk soon,<br><strong>{owner}</strong></p>
                <hr>
                <p>You're receiving this because you signed up at {site}.</p>
                <p><a href="{link}">Unsubscribe</a></p>
            </div>
        "#,
        first_name = first_name,
        book = content.book_title,
        owner = content.owner,
        site = content.site_url_label,
        link = link,
    );

    email_client
        .send_email(&subscriber.email, &subject, &text_body, &html_body)
        .await
}

/// Builds `<base-url>/unsubscribe?email=<url-encoded-email>`, the link
/// consumed by the welcome email and the unsubscribe page.
pub fn unsubscribe_link(base_url: &str, email: &str) -> String {
    format!(
        "{}/unsubscribe?email={}",
        base_url,
        urlencoding::encode(email)
    )
}
