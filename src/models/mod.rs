pub mod booking;
pub mod contact;
pub mod input;
pub mod newsletter;
pub mod response;
pub mod room;

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate};
use uuid::Uuid;
use validator::ValidationError;

// Prices and ids are stored as TEXT, so their columns are decoded by hand.
pub(crate) fn decode_error<E>(column: &str, source: E) -> sqlx::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

pub(crate) fn decode_uuid(column: &str, value: &str) -> Result<Uuid, sqlx::Error> {
    Uuid::parse_str(value).map_err(|e| decode_error(column, e))
}

/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp, keeping only the date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

pub(crate) fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
