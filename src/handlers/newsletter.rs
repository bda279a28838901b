use actix_web::{web, HttpResponse};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::db::newsletter;
use crate::error::{AppError, AppResult};
use crate::models::newsletter::{SubscribeRequest, UnsubscribeRequest};
use crate::models::response::ApiResponse;

pub async fn subscribe(
    pool: web::Data<SqlitePool>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let subscriber = SubscribeRequest::from_json(&body)?;
    let outcome = newsletter::subscribe(&pool, &subscriber).await?;
    log::debug!("newsletter subscribe via {}: {:?}", subscriber.source, outcome);

    Ok(HttpResponse::Ok().json(ApiResponse::message(outcome.message())))
}

pub async fn unsubscribe(
    pool: web::Data<SqlitePool>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let email = UnsubscribeRequest::from_json(&body)?;
    if !newsletter::unsubscribe(&pool, &email).await? {
        return Err(AppError::NotFound("Email is not subscribed".to_string()));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::message("You have been unsubscribed")))
}
