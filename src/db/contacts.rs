use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::contact::NewContactMessage;

pub async fn insert(pool: &SqlitePool, message: &NewContactMessage) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO contact_messages (id, name, email, phone, subject, inquiry_type, message)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(&message.name)
    .bind(&message.email)
    .bind(&message.phone)
    .bind(&message.subject)
    .bind(message.inquiry_type.as_str())
    .bind(&message.message)
    .execute(pool)
    .await?;

    Ok(id)
}
