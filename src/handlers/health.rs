use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::db;
use crate::error::AppResult;

pub async fn health_check(pool: web::Data<SqlitePool>) -> AppResult<HttpResponse> {
    db::ping(&pool).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "status": "ok" })))
}
