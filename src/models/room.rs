use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub base_rate: Decimal,
    pub max_occupancy: u32,
    pub is_active: bool,
}

impl<'r> FromRow<'r, SqliteRow> for Room {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let base_rate: String = row.try_get("base_rate")?;
        let max_occupancy: i64 = row.try_get("max_occupancy")?;

        Ok(Self {
            id: super::decode_uuid("id", &id)?,
            slug: row.try_get("slug")?,
            name: row.try_get("name")?,
            base_rate: Decimal::from_str(&base_rate).map_err(|e| super::decode_error("base_rate", e))?,
            max_occupancy: u32::try_from(max_occupancy)
                .map_err(|e| super::decode_error("max_occupancy", e))?,
            is_active: row.try_get("is_active")?,
        })
    }
}
