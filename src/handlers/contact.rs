use actix_web::{web, HttpResponse};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::db::contacts;
use crate::error::AppResult;
use crate::models::contact::{ContactReceived, ContactRequest};
use crate::models::response::ApiResponse;

pub async fn submit_contact(
    pool: web::Data<SqlitePool>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let message = ContactRequest::from_json(&body)?;
    let id = contacts::insert(&pool, &message).await?;
    log::info!("contact message {} received ({})", id, message.inquiry_type.as_str());

    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(ContactReceived { id })
            .with_message("Thank you for reaching out. We will get back to you soon."),
    ))
}
