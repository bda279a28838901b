use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::availability::Stay;
use crate::models::booking::{Booking, BookingFilter, BookingStatus};
use crate::models::response::Pagination;

const SELECT_BOOKING: &str = r#"
    SELECT b.id, b.room_id, r.name AS room_name, b.guest_name, b.guest_email, b.guest_phone,
           b.check_in, b.check_out, b.adults, b.children, b.total_price, b.status,
           b.special_requests, b.source, b.created_at
    FROM bookings b
    JOIN rooms r ON r.id = b.room_id
"#;

#[derive(Debug, Clone)]
pub struct NewBooking {
    pub room_id: Uuid,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub stay: Stay,
    pub adults: u32,
    pub children: u32,
    pub total_price: Decimal,
    pub special_requests: Option<String>,
    pub source: String,
}

/// Stays of the room's pending and confirmed bookings.
pub async fn active_stays_for_room(pool: &SqlitePool, room_id: Uuid) -> Result<Vec<Stay>, sqlx::Error> {
    let [pending, confirmed] = BookingStatus::OCCUPYING;
    let rows = sqlx::query_as::<_, (NaiveDate, NaiveDate)>(
        r#"
        SELECT check_in, check_out FROM bookings
        WHERE room_id = ? AND status IN (?, ?)
        ORDER BY check_in
        "#,
    )
    .bind(room_id.to_string())
    .bind(pending.as_str())
    .bind(confirmed.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(check_in, check_out)| Stay::new(check_in, check_out))
        .collect())
}

/// Stores a `PENDING` booking unless an occupying booking of the same room
/// overlaps its stay. Returns `None` when the room was taken.
///
/// The overlap test and the insert are one statement, so SQLite's write
/// lock makes them atomic: of two concurrent requests for the same nights
/// only one row is written.
pub async fn insert_pending(pool: &SqlitePool, booking: &NewBooking) -> Result<Option<Uuid>, sqlx::Error> {
    let id = Uuid::new_v4();
    let room_id = booking.room_id.to_string();
    let [pending, confirmed] = BookingStatus::OCCUPYING;

    let result = sqlx::query(
        r#"
        INSERT INTO bookings (
            id, room_id, guest_name, guest_email, guest_phone, check_in, check_out,
            adults, children, total_price, status, special_requests, source
        )
        SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
        WHERE NOT EXISTS (
            SELECT 1 FROM bookings
            WHERE room_id = ?
              AND status IN (?, ?)
              AND check_in < ?
              AND check_out > ?
        )
        "#,
    )
    .bind(id.to_string())
    .bind(&room_id)
    .bind(&booking.guest_name)
    .bind(&booking.guest_email)
    .bind(&booking.guest_phone)
    .bind(booking.stay.check_in)
    .bind(booking.stay.check_out)
    .bind(i64::from(booking.adults))
    .bind(i64::from(booking.children))
    .bind(booking.total_price.to_string())
    .bind(BookingStatus::Pending.as_str())
    .bind(&booking.special_requests)
    .bind(&booking.source)
    .bind(&room_id)
    .bind(pending.as_str())
    .bind(confirmed.as_str())
    .bind(booking.stay.check_out)
    .bind(booking.stay.check_in)
    .execute(pool)
    .await?;

    Ok((result.rows_affected() == 1).then_some(id))
}

pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Booking>, sqlx::Error> {
    let mut select = QueryBuilder::<Sqlite>::new(SELECT_BOOKING);
    select.push(" WHERE b.id = ").push_bind(id.to_string());
    select.build_query_as::<Booking>().fetch_optional(pool).await
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &BookingFilter) {
    let mut keyword = " WHERE ";
    if let Some(status) = filter.status {
        qb.push(keyword).push("b.status = ").push_bind(status.as_str());
        keyword = " AND ";
    }
    if let Some(email) = &filter.email {
        qb.push(keyword).push("b.guest_email = ").push_bind(email.clone());
    }
}

/// One page of bookings, newest first, plus the number of matching rows.
pub async fn list(pool: &SqlitePool, filter: &BookingFilter) -> Result<(Vec<Booking>, i64), sqlx::Error> {
    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM bookings b");
    push_filters(&mut count, filter);
    let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Sqlite>::new(SELECT_BOOKING);
    push_filters(&mut select, filter);
    select
        .push(" ORDER BY b.created_at DESC, b.rowid DESC LIMIT ")
        .push_bind(i64::from(filter.limit))
        .push(" OFFSET ")
        .push_bind(Pagination::offset(filter.page, filter.limit));
    let items = select.build_query_as::<Booking>().fetch_all(pool).await?;

    Ok((items, total))
}

#[cfg(test)]
pub(crate) async fn set_status(pool: &SqlitePool, id: Uuid, status: BookingStatus) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id.to_string())
        .execute(pool)
        .await
        .map(|_| ())
}
