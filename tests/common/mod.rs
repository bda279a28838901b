#![allow(dead_code)]

use serde_json::{json, Value};

pub const TREEHOUSE: &str = "6f1c2a3e-8b4d-4c1a-9e2f-1a2b3c4d5e01";
pub const COTTAGE: &str = "6f1c2a3e-8b4d-4c1a-9e2f-1a2b3c4d5e02";
pub const VILLA: &str = "6f1c2a3e-8b4d-4c1a-9e2f-1a2b3c4d5e03";
pub const TENT: &str = "6f1c2a3e-8b4d-4c1a-9e2f-1a2b3c4d5e05";

/// Builds the full application over a fresh in-memory database.
/// Expands to `(pool, service)`.
#[macro_export]
macro_rules! spawn_app {
    () => {{
        let pool = ecolodge_booking::db::memory_pool().await.expect("in-memory database");
        let app = actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(pool.clone()))
                .app_data(actix_web::web::Data::new(
                    ecolodge_booking::pricing::PricingPolicy::default(),
                ))
                .configure(ecolodge_booking::routes),
        )
        .await;
        (pool, app)
    }};
}

pub fn booking(room_id: &str, check_in: &str, check_out: &str, adults: i64, children: i64) -> Value {
    json!({
        "guestName": "Asha Rao",
        "guestEmail": "asha@example.com",
        "guestPhone": "+91 98765 43210",
        "checkIn": check_in,
        "checkOut": check_out,
        "adults": adults,
        "children": children,
        "roomId": room_id,
    })
}

pub fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
