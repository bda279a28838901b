use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::room::Room;

/// Looks up a room that is open for bookings. Retired rooms are treated as missing.
pub async fn find_bookable(pool: &SqlitePool, id: Uuid) -> Result<Option<Room>, sqlx::Error> {
    sqlx::query_as::<_, Room>(
        r#"
        SELECT id, slug, name, base_rate, max_occupancy, is_active
        FROM rooms
        WHERE id = ? AND is_active = 1
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await
}
