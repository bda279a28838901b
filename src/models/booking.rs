use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::input::{absorb, JsonFields};
use super::{decode_error, decode_uuid, field_error, parse_date};
use crate::availability::Stay;
use crate::pricing::{Party, PriceBreakdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// Statuses that keep the room occupied for their dates.
    pub const OCCUPYING: [BookingStatus; 2] = [BookingStatus::Pending, BookingStatus::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown booking status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            "COMPLETED" => Ok(BookingStatus::Completed),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub room_id: Uuid,
    pub room_name: String,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub adults: u32,
    pub children: u32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
    pub source: String,
    pub created_at: NaiveDateTime,
}

impl Booking {
    pub fn stay(&self) -> Stay {
        Stay::new(self.check_in, self.check_out)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Booking {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let room_id: String = row.try_get("room_id")?;
        let total_price: String = row.try_get("total_price")?;
        let status: String = row.try_get("status")?;
        let adults: i64 = row.try_get("adults")?;
        let children: i64 = row.try_get("children")?;

        Ok(Self {
            id: decode_uuid("id", &id)?,
            room_id: decode_uuid("room_id", &room_id)?,
            room_name: row.try_get("room_name")?,
            guest_name: row.try_get("guest_name")?,
            guest_email: row.try_get("guest_email")?,
            guest_phone: row.try_get("guest_phone")?,
            check_in: row.try_get("check_in")?,
            check_out: row.try_get("check_out")?,
            adults: u32::try_from(adults).map_err(|e| decode_error("adults", e))?,
            children: u32::try_from(children).map_err(|e| decode_error("children", e))?,
            total_price: Decimal::from_str(&total_price).map_err(|e| decode_error("total_price", e))?,
            status: status.parse().map_err(|e| decode_error("status", e))?,
            special_requests: row.try_get("special_requests")?,
            source: row.try_get("source")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

const DEFAULT_SOURCE: &str = "website";

#[derive(Debug, Validate)]
pub struct CreateBookingRequest {
    #[validate(
        required(message = "Name is required"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters")
    )]
    pub guest_name: Option<String>,
    #[validate(
        required(message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    pub guest_email: Option<String>,
    #[validate(
        required(message = "Phone number is required"),
        length(min = 10, message = "Phone number must be at least 10 characters")
    )]
    pub guest_phone: Option<String>,
    #[validate(required(message = "Check-in date is required"))]
    pub check_in: Option<String>,
    #[validate(required(message = "Check-out date is required"))]
    pub check_out: Option<String>,
    #[validate(
        required(message = "Number of adults is required"),
        range(min = 1, max = 8, message = "Adults must be between 1 and 8")
    )]
    pub adults: Option<i64>,
    #[validate(range(min = 0, max = 6, message = "Children must be between 0 and 6"))]
    pub children: Option<i64>,
    #[validate(required(message = "Room is required"))]
    pub room_id: Option<String>,
    #[validate(length(max = 500, message = "Special requests must be 500 characters or fewer"))]
    pub special_requests: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Source must be between 1 and 50 characters"))]
    pub source: Option<String>,
}

/// A booking request that passed every field and cross-field rule.
#[derive(Debug, Clone)]
pub struct ValidBookingRequest {
    pub room_id: Uuid,
    pub stay: Stay,
    pub party: Party,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub special_requests: Option<String>,
    pub source: String,
}

impl CreateBookingRequest {
    /// Reads and checks a JSON body, reporting every violation at once.
    pub fn from_json(body: &Value, today: NaiveDate) -> Result<ValidBookingRequest, ValidationErrors> {
        let mut fields = JsonFields::new(body);
        let request = Self {
            guest_name: fields.text("guest_name"),
            guest_email: fields.text("guest_email"),
            guest_phone: fields.text("guest_phone"),
            check_in: fields.text("check_in"),
            check_out: fields.text("check_out"),
            adults: fields.integer("adults"),
            children: fields.integer("children"),
            room_id: fields.text("room_id"),
            special_requests: fields.text("special_requests"),
            source: fields.text("source"),
        };
        request.check(fields.into_errors(), today)
    }

    fn normalize(&mut self) {
        let trim = |value: &mut Option<String>| {
            if let Some(v) = value.as_mut() {
                *v = v.trim().to_string();
            }
        };
        trim(&mut self.guest_name);
        trim(&mut self.guest_phone);
        self.guest_email = self.guest_email.take().map(|e| e.trim().to_ascii_lowercase());
        self.special_requests = self
            .special_requests
            .take()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.source = Some(
            self.source
                .take()
                .map(|s| s.trim().to_string())
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        );
        self.children = self.children.or(Some(0));
    }

    /// Runs all checks on top of `errors` already found while reading.
    pub fn check(
        mut self,
        mut errors: ValidationErrors,
        today: NaiveDate,
    ) -> Result<ValidBookingRequest, ValidationErrors> {
        self.normalize();
        absorb(&mut errors, self.validate());
        let target = check_room_and_stay(
            &mut errors,
            self.room_id.as_deref(),
            self.check_in.as_deref(),
            self.check_out.as_deref(),
            Some(today),
        );

        match (target, self.guest_name, self.guest_email, self.guest_phone, self.adults) {
            (Some((room_id, stay)), Some(guest_name), Some(guest_email), Some(guest_phone), Some(adults))
                if errors.is_empty() =>
            {
                Ok(ValidBookingRequest {
                    room_id,
                    stay,
                    // Ranges above guarantee both fit.
                    party: Party::new(adults as u32, self.children.unwrap_or(0) as u32),
                    guest_name,
                    guest_email,
                    guest_phone,
                    special_requests: self.special_requests,
                    source: self.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Shared room id and date checks. With `today` set, the stay may not start in the past.
/// Absent values are skipped; `required` rules report them.
fn check_room_and_stay(
    errors: &mut ValidationErrors,
    room_id: Option<&str>,
    check_in: Option<&str>,
    check_out: Option<&str>,
    today: Option<NaiveDate>,
) -> Option<(Uuid, Stay)> {
    let room_id = room_id.and_then(|raw| match Uuid::parse_str(raw.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add("room_id", field_error("uuid", "Invalid room ID"));
            None
        }
    });

    let check_in = check_in.and_then(|raw| {
        let date = parse_date(raw);
        if date.is_none() {
            errors.add("check_in", field_error("date", "Invalid check-in date"));
        }
        date
    });
    let check_out = check_out.and_then(|raw| {
        let date = parse_date(raw);
        if date.is_none() {
            errors.add("check_out", field_error("date", "Invalid check-out date"));
        }
        date
    });

    let mut dates_ok = true;
    if let (Some(today), Some(check_in)) = (today, check_in) {
        if check_in < today {
            errors.add("check_in", field_error("past_date", "Check-in date cannot be in the past"));
            dates_ok = false;
        }
    }
    if let (Some(check_in), Some(check_out)) = (check_in, check_out) {
        if check_out <= check_in {
            errors.add("check_out", field_error("date_order", "Check-out date must be after check-in date"));
            dates_ok = false;
        }
    }

    match (room_id, check_in, check_out) {
        (Some(id), Some(check_in), Some(check_out)) if dates_ok => Some((id, Stay::new(check_in, check_out))),
        _ => None,
    }
}

#[derive(Debug, Validate)]
pub struct AvailabilityRequest {
    #[validate(required(message = "Room is required"))]
    pub room_id: Option<String>,
    #[validate(required(message = "Check-in date is required"))]
    pub check_in: Option<String>,
    #[validate(required(message = "Check-out date is required"))]
    pub check_out: Option<String>,
}

impl AvailabilityRequest {
    /// Past dates are allowed here; the check only answers whether the dates are free.
    pub fn from_json(body: &Value) -> Result<(Uuid, Stay), ValidationErrors> {
        let mut fields = JsonFields::new(body);
        let request = Self {
            room_id: fields.text("room_id"),
            check_in: fields.text("check_in"),
            check_out: fields.text("check_out"),
        };
        request.check(fields.into_errors())
    }

    pub fn check(&self, mut errors: ValidationErrors) -> Result<(Uuid, Stay), ValidationErrors> {
        absorb(&mut errors, self.validate());
        let target = check_room_and_stay(
            &mut errors,
            self.room_id.as_deref(),
            self.check_in.as_deref(),
            self.check_out.as_deref(),
            None,
        );
        match target {
            Some(target) if errors.is_empty() => Ok(target),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Validate)]
pub struct QuoteRequest {
    #[validate(required(message = "Room is required"))]
    pub room_id: Option<String>,
    #[validate(required(message = "Check-in date is required"))]
    pub check_in: Option<String>,
    #[validate(required(message = "Check-out date is required"))]
    pub check_out: Option<String>,
    #[validate(
        required(message = "Number of adults is required"),
        range(min = 1, max = 8, message = "Adults must be between 1 and 8")
    )]
    pub adults: Option<i64>,
    #[validate(range(min = 0, max = 6, message = "Children must be between 0 and 6"))]
    pub children: Option<i64>,
}

impl QuoteRequest {
    pub fn from_json(body: &Value, today: NaiveDate) -> Result<(Uuid, Stay, Party), ValidationErrors> {
        let mut fields = JsonFields::new(body);
        let request = Self {
            room_id: fields.text("room_id"),
            check_in: fields.text("check_in"),
            check_out: fields.text("check_out"),
            adults: fields.integer("adults"),
            children: fields.integer("children"),
        };
        request.check(fields.into_errors(), today)
    }

    pub fn check(
        &self,
        mut errors: ValidationErrors,
        today: NaiveDate,
    ) -> Result<(Uuid, Stay, Party), ValidationErrors> {
        absorb(&mut errors, self.validate());
        let target = check_room_and_stay(
            &mut errors,
            self.room_id.as_deref(),
            self.check_in.as_deref(),
            self.check_out.as_deref(),
            Some(today),
        );
        match (target, self.adults) {
            (Some((room_id, stay)), Some(adults)) if errors.is_empty() => {
                Ok((room_id, stay, Party::new(adults as u32, self.children.unwrap_or(0) as u32)))
            }
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BookingListQuery {
    #[validate(range(min = 1, message = "Page must be 1 or greater"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u32>,
    pub status: Option<String>,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: Option<String>,
}

/// Listing filters after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingFilter {
    pub page: u32,
    pub limit: u32,
    pub status: Option<BookingStatus>,
    pub email: Option<String>,
}

impl BookingListQuery {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn into_filter(self) -> Result<BookingFilter, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        let status = match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => None,
            Some(raw) => match raw.parse::<BookingStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.add("status", field_error("status", "Unknown booking status"));
                    None
                }
            },
        };
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BookingFilter {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(Self::DEFAULT_LIMIT),
            status,
            email: self.email.map(|e| e.trim().to_ascii_lowercase()),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreated {
    pub booking_id: Uuid,
    pub guest_name: String,
    pub room_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: Decimal,
    pub nights: i64,
    pub price_breakdown: PriceBreakdown,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub available: bool,
    pub message: String,
}

impl AvailabilityResponse {
    pub fn new(available: bool) -> Self {
        let message = if available {
            "Room is available for the selected dates"
        } else {
            "Room is not available for the selected dates"
        };
        Self {
            available,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub available: bool,
    pub room_name: String,
    pub nights: i64,
    pub total_price: Decimal,
    pub price_breakdown: PriceBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
    }

    fn body() -> Value {
        json!({
            "guestName": "Asha Rao",
            "guestEmail": "Asha@Example.com ",
            "guestPhone": "+91 98765 43210",
            "checkIn": "2024-12-10",
            "checkOut": "2024-12-13",
            "adults": 2,
            "roomId": "6f1c2a3e-8b4d-4c1a-9e2f-1a2b3c4d5e01",
            "specialRequests": "   ",
        })
    }

    fn fields(errors: &ValidationErrors) -> Vec<String> {
        let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        fields
    }

    #[test]
    fn valid_request_is_normalized() {
        let valid = CreateBookingRequest::from_json(&body(), today()).unwrap();
        assert_eq!(valid.guest_email, "asha@example.com");
        assert_eq!(valid.special_requests, None);
        assert_eq!(valid.source, "website");
        assert_eq!(valid.stay.nights(), 3);
        assert_eq!(valid.party, Party::new(2, 0));
    }

    #[test]
    fn same_day_check_out_is_rejected() {
        let mut body = body();
        body["checkOut"] = json!("2024-12-10");
        let errors = CreateBookingRequest::from_json(&body, today()).unwrap_err();
        assert_eq!(fields(&errors), vec!["check_out"]);
    }

    #[test]
    fn every_violation_is_reported() {
        let body = json!({
            "guestName": "A",
            "guestEmail": "not-an-email",
            "guestPhone": "123",
            "checkIn": "2024-11-30",
            "checkOut": "2024-12-13",
            "adults": 9,
            "children": -1,
            "roomId": "room-1",
            "specialRequests": "x".repeat(501),
        });
        let errors = CreateBookingRequest::from_json(&body, today()).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec![
                "adults",
                "check_in",
                "children",
                "guest_email",
                "guest_name",
                "guest_phone",
                "room_id",
                "special_requests"
            ]
        );
    }

    #[test]
    fn missing_and_mistyped_fields_are_reported_with_rule_violations() {
        let body = json!({
            "guestPhone": "12",
            "checkIn": "2024-12-10",
            "checkOut": "2024-12-10",
            "adults": "two",
            "children": 1.5,
            "roomId": "6f1c2a3e-8b4d-4c1a-9e2f-1a2b3c4d5e01",
        });
        let errors = CreateBookingRequest::from_json(&body, today()).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["adults", "check_out", "children", "guest_email", "guest_name", "guest_phone"]
        );
        let field_errors = errors.field_errors();
        assert_eq!(field_errors["adults"].len(), 1);
        assert_eq!(field_errors["adults"][0].code, "type");
        assert_eq!(field_errors["guest_name"][0].code, "required");
    }

    #[test]
    fn unparseable_dates_are_field_errors() {
        let mut body = body();
        body["checkIn"] = json!("next friday");
        body["checkOut"] = json!("");
        let errors = CreateBookingRequest::from_json(&body, today()).unwrap_err();
        assert_eq!(fields(&errors), vec!["check_in", "check_out"]);
    }

    #[test]
    fn check_in_today_is_allowed() {
        let mut body = body();
        body["checkIn"] = json!("2024-12-01");
        assert!(CreateBookingRequest::from_json(&body, today()).is_ok());
    }

    #[test]
    fn availability_check_accepts_past_dates_but_not_reversed_ones() {
        let dates = json!({
            "roomId": "6f1c2a3e-8b4d-4c1a-9e2f-1a2b3c4d5e01",
            "checkIn": "2020-01-05",
            "checkOut": "2020-01-07",
        });
        assert!(AvailabilityRequest::from_json(&dates).is_ok());

        let reversed = json!({
            "roomId": "6f1c2a3e-8b4d-4c1a-9e2f-1a2b3c4d5e01",
            "checkIn": "2020-01-07",
            "checkOut": "2020-01-05",
        });
        assert_eq!(fields(&AvailabilityRequest::from_json(&reversed).unwrap_err()), vec!["check_out"]);

        let empty = AvailabilityRequest::from_json(&json!({})).unwrap_err();
        assert_eq!(fields(&empty), vec!["check_in", "check_out", "room_id"]);
    }

    #[test]
    fn quote_defaults_children_to_zero() {
        let body = json!({
            "roomId": "6f1c2a3e-8b4d-4c1a-9e2f-1a2b3c4d5e01",
            "checkIn": "2024-12-10",
            "checkOut": "2024-12-12",
            "adults": 3,
        });
        let (_, stay, party) = QuoteRequest::from_json(&body, today()).unwrap();
        assert_eq!(stay.nights(), 2);
        assert_eq!(party, Party::new(3, 0));
    }

    #[test]
    fn list_query_defaults_and_status_parsing() {
        let filter = BookingListQuery { page: None, limit: None, status: Some("confirmed".into()), email: None }
            .into_filter()
            .unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.status, Some(BookingStatus::Confirmed));

        let errors = BookingListQuery { page: Some(0), limit: Some(500), status: Some("lost".into()), email: None }
            .into_filter()
            .unwrap_err();
        assert_eq!(fields(&errors), vec!["limit", "page", "status"]);
    }

    #[test]
    fn unknown_status_names_the_input() {
        let err = "lost".parse::<BookingStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("lost".into()));
        assert_eq!(err.to_string(), "unknown booking status `lost`");
    }

    #[test]
    fn only_pending_and_confirmed_occupy() {
        let occupying = BookingStatus::OCCUPYING;
        assert!(occupying.contains(&BookingStatus::Pending));
        assert!(occupying.contains(&BookingStatus::Confirmed));
        assert!(!occupying.contains(&BookingStatus::Cancelled));
        assert!(!occupying.contains(&BookingStatus::Completed));
    }
}
