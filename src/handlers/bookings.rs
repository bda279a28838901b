use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::availability;
use crate::db::{bookings, rooms};
use crate::error::{AppError, AppResult};
use crate::models::booking::{
    AvailabilityRequest, AvailabilityResponse, BookingCreated, BookingListQuery, CreateBookingRequest,
    QuoteRequest, QuoteResponse,
};
use crate::models::response::{ApiResponse, Paginated, Pagination};
use crate::pricing::{self, PricingPolicy};

fn today() -> NaiveDate {
    chrono::Utc::now().naive_utc().date()
}

pub async fn create_booking(
    pool: web::Data<SqlitePool>,
    policy: web::Data<PricingPolicy>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    // 1. Presence, types, field and date rules, all reported together
    let request = CreateBookingRequest::from_json(&body, today())?;

    // 2. Room must exist and be open for bookings
    let room = rooms::find_bookable(&pool, request.room_id)
        .await?
        .ok_or(AppError::RoomNotFound)?;

    // 3. Availability
    if !availability::is_available(&pool, room.id, &request.stay).await? {
        return Err(AppError::RoomUnavailable);
    }

    // 4. Price, with the party checked against this room's occupancy
    let quote = pricing::compute_price(policy.get_ref(), &room, &request.stay, request.party)?;

    // 5. Persist. The insert re-checks overlap atomically, so a booking
    //    that slipped in since step 3 still wins.
    let new_booking = bookings::NewBooking {
        room_id: room.id,
        guest_name: request.guest_name,
        guest_email: request.guest_email,
        guest_phone: request.guest_phone,
        stay: request.stay,
        adults: request.party.adults,
        children: request.party.children,
        total_price: quote.total_price,
        special_requests: request.special_requests,
        source: request.source,
    };
    let booking_id = match bookings::insert_pending(&pool, &new_booking).await? {
        Some(id) => id,
        None => {
            log::warn!(
                "room {} was booked concurrently for {}..{}",
                room.id,
                request.stay.check_in,
                request.stay.check_out
            );
            return Err(AppError::RoomUnavailable);
        }
    };

    log::info!(
        "booking {} created: room {} {}..{} total {}",
        booking_id,
        room.slug,
        request.stay.check_in,
        request.stay.check_out,
        quote.total_price
    );

    let created = BookingCreated {
        booking_id,
        guest_name: new_booking.guest_name,
        room_name: room.name,
        check_in: request.stay.check_in,
        check_out: request.stay.check_out,
        total_price: quote.total_price,
        nights: quote.nights,
        price_breakdown: quote.breakdown,
    };
    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(created).with_message("Booking request received. We will confirm your stay shortly."),
    ))
}

pub async fn list_bookings(
    pool: web::Data<SqlitePool>,
    query: web::Query<BookingListQuery>,
) -> AppResult<HttpResponse> {
    let filter = query.into_inner().into_filter()?;
    let (items, total) = bookings::list(&pool, &filter).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(Paginated {
        items,
        pagination: Pagination::new(filter.page, filter.limit, total),
    })))
}

pub async fn check_availability(
    pool: web::Data<SqlitePool>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let (room_id, stay) = AvailabilityRequest::from_json(&body)?;
    let room = rooms::find_bookable(&pool, room_id)
        .await?
        .ok_or(AppError::RoomNotFound)?;

    let available = availability::is_available(&pool, room.id, &stay).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(AvailabilityResponse::new(available))))
}

pub async fn quote_booking(
    pool: web::Data<SqlitePool>,
    policy: web::Data<PricingPolicy>,
    body: web::Json<Value>,
) -> AppResult<HttpResponse> {
    let (room_id, stay, party) = QuoteRequest::from_json(&body, today())?;
    let room = rooms::find_bookable(&pool, room_id)
        .await?
        .ok_or(AppError::RoomNotFound)?;

    let quote = pricing::compute_price(policy.get_ref(), &room, &stay, party)?;
    let available = availability::is_available(&pool, room.id, &stay).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(QuoteResponse {
        available,
        room_name: room.name,
        nights: quote.nights,
        total_price: quote.total_price,
        price_breakdown: quote.breakdown,
    })))
}

pub async fn get_booking(pool: web::Data<SqlitePool>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let not_found = || AppError::NotFound("Booking not found".to_string());
    let id = Uuid::parse_str(&path.into_inner()).map_err(|_| not_found())?;

    let booking = bookings::find_by_id(&pool, id).await?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(booking)))
}
