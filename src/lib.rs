pub mod availability;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pricing;

use actix_web::web;

use crate::error::AppError;

/// Malformed JSON bodies get the same error envelope as failed validation.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| AppError::Payload(err.to_string()).into())
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| AppError::Payload(err.to_string()).into())
}

/// Registers every route. Callers provide `web::Data<SqlitePool>` and `web::Data<PricingPolicy>`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .route("/health", web::get().to(handlers::health::health_check))
        .service(
            web::scope("/booking")
                .route("", web::post().to(handlers::bookings::create_booking))
                .route("", web::get().to(handlers::bookings::list_bookings))
                .route("", web::put().to(handlers::bookings::check_availability))
                .route("/quote", web::post().to(handlers::bookings::quote_booking))
                .route("/{id}", web::get().to(handlers::bookings::get_booking)),
        )
        .route("/contact", web::post().to(handlers::contact::submit_contact))
        .service(
            web::scope("/newsletter")
                .route("", web::post().to(handlers::newsletter::subscribe))
                .route("", web::delete().to(handlers::newsletter::unsubscribe)),
        );
}
