use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber_email::SubscriberEmail;

/// A subscriber row as stored. `id` and `subscribed_at` are assigned on the
/// first insert for an email and survive any later reactivation.
#[derive(Debug, Clone)]
pub struct SubscriberRecord {
    pub id: Uuid,
    pub email: SubscriberEmail,
    pub name: Option<String>,
    pub source: String,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed: bool,
}

/// Client details captured at signup for abuse review. Never displayed back
/// to the subscriber.
#[derive(Debug, Default)]
pub struct SignupMetadata {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Creates the subscribers table and its email index if they do not exist.
/// Idempotent; called by the write endpoints before touching the table.
#[tracing::instrument(name = "Ensure the subscribers schema exists", skip(db_pool))]
pub async fn ensure_schema(db_pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subscribers (
            id UUID PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            name TEXT,
            source TEXT NOT NULL DEFAULT 'website',
            subscribed_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            confirmed BOOLEAN NOT NULL DEFAULT FALSE,
            confirmed_at TIMESTAMPTZ,
            unsubscribed BOOLEAN NOT NULL DEFAULT FALSE,
            unsubscribed_at TIMESTAMPTZ,
            ip_address TEXT,
            user_agent TEXT
        )
        "#,
    )
    .execute(db_pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_subscribers_email ON subscribers (email)")
        .execute(db_pool)
        .await?;

    Ok(())
}

/// Inserts a subscriber, or reactivates the existing row when the email is
/// already present. The unique index on `email` is the only concurrency
/// control: concurrent calls for the same address both succeed and the last
/// committed write wins. Reactivation clears the soft-delete flag and only
/// overwrites `name` when the new signup actually provided one.
#[tracing::instrument(
    name = "Insert or reactivate a subscriber",
    skip(new_subscriber, signup, db_pool),
    fields(subscriber_email = %new_subscriber.email.as_ref())
)]
pub async fn upsert_subscriber(
    db_pool: &PgPool,
    new_subscriber: &NewSubscriber,
    signup: &SignupMetadata,
) -> Result<SubscriberRecord, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO subscribers (id, email, name, source, subscribed_at, ip_address, user_agent)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (email) DO UPDATE SET
            name = COALESCE(EXCLUDED.name, subscribers.name),
            unsubscribed = FALSE,
            unsubscribed_at = NULL
        RETURNING id, email, name, source, subscribed_at, unsubscribed
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_subscriber.email.as_ref())
    .bind(new_subscriber.name.as_ref().map(|name| name.as_ref()))
    .bind(&new_subscriber.source)
    .bind(Utc::now())
    .bind(signup.ip_address.as_deref())
    .bind(signup.user_agent.as_deref())
    .map(|row: PgRow| SubscriberRecord {
        id: row.get("id"),
        email: SubscriberEmail::parse(row.get("email")).unwrap(),
        name: row.get("name"),
        source: row.get("source"),
        subscribed_at: row.get("subscribed_at"),
        unsubscribed: row.get("unsubscribed"),
    })
    .fetch_one(db_pool)
    .await
}

/// Soft-deletes the row matching `email`. Returns the row id, or `None` when
/// the address was never subscribed. Rows are never physically deleted.
#[tracing::instrument(
    name = "Mark a subscriber as unsubscribed",
    skip(email, db_pool),
    fields(subscriber_email = %email.as_ref())
)]
pub async fn mark_unsubscribed(
    db_pool: &PgPool,
    email: &SubscriberEmail,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE subscribers
        SET unsubscribed = TRUE, unsubscribed_at = $1
        WHERE email = $2
        RETURNING id
        "#,
    )
    .bind(Utc::now())
    .bind(email.as_ref())
    .map(|row: PgRow| row.get::<Uuid, _>("id"))
    .fetch_optional(db_pool)
    .await
}

/// True when the error is a raw Postgres unique violation that the upsert's
/// conflict clause did not absorb. Should not trigger in practice.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}
