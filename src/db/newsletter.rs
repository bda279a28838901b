use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::newsletter::{Subscriber, Subscription};

pub async fn subscribe(pool: &SqlitePool, subscriber: &Subscriber) -> Result<Subscription, sqlx::Error> {
    let existing = sqlx::query_as::<_, (String, Option<NaiveDateTime>)>(
        "SELECT id, unsubscribed_at FROM newsletter_subscribers WHERE email = ?",
    )
    .bind(&subscriber.email)
    .fetch_optional(pool)
    .await?;

    match existing {
        Some((_, None)) => Ok(Subscription::AlreadyActive),
        Some((id, Some(_))) => {
            sqlx::query(
                r#"
                UPDATE newsletter_subscribers
                SET unsubscribed_at = NULL,
                    subscribed_at = CURRENT_TIMESTAMP,
                    name = COALESCE(?, name),
                    source = ?
                WHERE id = ?
                "#,
            )
            .bind(&subscriber.name)
            .bind(&subscriber.source)
            .bind(id)
            .execute(pool)
            .await?;
            Ok(Subscription::Reactivated)
        }
        None => {
            let inserted = sqlx::query(
                r#"
                INSERT INTO newsletter_subscribers (id, email, name, source)
                VALUES (?, ?, ?, ?)
                ON CONFLICT (email) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&subscriber.email)
            .bind(&subscriber.name)
            .bind(&subscriber.source)
            .execute(pool)
            .await?;
            // A concurrent request may have inserted the same address first.
            if inserted.rows_affected() == 0 {
                Ok(Subscription::AlreadyActive)
            } else {
                Ok(Subscription::Created)
            }
        }
    }
}

/// Returns `false` if the address is unknown or already unsubscribed.
pub async fn unsubscribe(pool: &SqlitePool, email: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE newsletter_subscribers
        SET unsubscribed_at = CURRENT_TIMESTAMP
        WHERE email = ? AND unsubscribed_at IS NULL
        "#,
    )
    .bind(email)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
