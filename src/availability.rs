use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db;

/// A stay as a half-open interval of calendar dates: `[check_in, check_out)`.
///
/// The guest occupies the room every night from `check_in` up to but not
/// including `check_out`, so one party may check out on the same day the
/// next one checks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl Stay {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            check_in,
            check_out,
        }
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    pub fn overlaps(&self, other: &Stay) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

/// Returns `true` when no pending or confirmed booking of `room_id` overlaps `requested`.
///
/// The caller is responsible for `requested.check_out > requested.check_in`.
pub async fn is_available(
    pool: &SqlitePool,
    room_id: Uuid,
    requested: &Stay,
) -> Result<bool, sqlx::Error> {
    let occupied = db::bookings::active_stays_for_room(pool, room_id).await?;
    let conflict = occupied.iter().find(|stay| stay.overlaps(requested));

    if let Some(stay) = conflict {
        log::debug!(
            "room {} taken {}..{}, requested {}..{}",
            room_id,
            stay.check_in,
            stay.check_out,
            requested.check_in,
            requested.check_out
        );
    }

    Ok(conflict.is_none())
}
