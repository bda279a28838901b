use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use env_logger::Env;

use ecolodge_booking::config::AppConfig;
use ecolodge_booking::{db, routes};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger and environment
    dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    log::info!("Connecting to database...");
    let pool = db::get_db_pool(&config.database)
        .await
        .context("Failed to create pool")?;

    log::info!("Running migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    log::info!(
        "Pricing: extra adult {} / child {} per night, tax {}",
        config.pricing.extra_adult_rate,
        config.pricing.child_rate,
        config.pricing.tax_rate
    );
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let pool_data = web::Data::new(pool);
    let pricing_data = web::Data::new(config.pricing.clone());

    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .app_data(pricing_data.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
