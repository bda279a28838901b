use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use heck::ToLowerCamelCase;
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::pricing::PricingError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid request: {0}")]
    Payload(String),

    #[error("Room not found")]
    RoomNotFound,

    #[error("Room is not available for the selected dates")]
    RoomUnavailable,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

/// Flattens validator output into `{field, message}` pairs, sorted by field.
/// Field names are reported in their camelCase JSON form.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_lower_camel_case();
            errs.iter().map(move |e| FieldError {
                field: field.clone(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", e.code)),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::Payload(_)
            | AppError::RoomNotFound
            | AppError::RoomUnavailable
            | AppError::Pricing(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (message, errors) = match self {
            AppError::Validation(errors) => ("Validation failed".to_string(), field_errors(errors)),
            AppError::Payload(detail) => (
                "Invalid request".to_string(),
                vec![FieldError {
                    field: "body".to_string(),
                    message: detail.clone(),
                }],
            ),
            AppError::Database(e) => {
                log::error!("database failure: {e:?}");
                ("Something went wrong. Please try again later.".to_string(), Vec::new())
            }
            other => (other.to_string(), Vec::new()),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            message,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::ValidationError;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn field_names_match_the_json_keys() {
        let mut errors = ValidationErrors::new();
        errors.add("guest_email", ValidationError::new("email"));
        errors.add("special_requests", ValidationError::new("length"));
        errors.add("adults", ValidationError::new("range"));
        let fields: Vec<String> = field_errors(&errors).into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["adults", "guestEmail", "specialRequests"]);
    }

    #[actix_web::test]
    async fn validation_errors_list_every_field() {
        let mut errors = ValidationErrors::new();
        errors.add("guest_name", ValidationError::new("length"));
        errors.add("check_out", ValidationError::new("date_order"));

        let (status, body) = body_of(AppError::Validation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["checkOut", "guestName"]);
    }

    #[actix_web::test]
    async fn business_rejections_carry_a_single_message() {
        let (status, body) = body_of(AppError::RoomUnavailable).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Room is not available for the selected dates");
        assert!(body.get("errors").is_none());

        let capacity = PricingError::CapacityExceeded { requested: 4, max_occupancy: 3 };
        let (status, body) = body_of(capacity.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "This room accommodates at most 3 guests (4 requested)");
    }

    #[actix_web::test]
    async fn database_details_are_not_leaked() {
        let (status, body) = body_of(AppError::Database(sqlx::Error::PoolTimedOut)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Something went wrong. Please try again later.");
        assert!(!body.to_string().contains("pool"));
    }
}
