//! Main entry point for the campsite search server.
//! This crate exposes the campground scan pipeline over a small REST API.

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use campground_scan::RecGovClient;

mod handlers;
mod server_config;

use handlers::{AppState, health, list_units, search_campsites};
use server_config::ServerConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    log::info!("🚀 Starting campsite search server...");

    let config = ServerConfig::from_env()?;
    if config.api_key.is_none() {
        log::warn!("🔑 RECREATION_GOV_API_KEY not set, RIDB lookups may be rejected");
    }
    log::info!(
        "⏱️ Rate limit between campgrounds: {:.2}-{:.2}s",
        config.search.rate_limit.min_secs,
        config.search.rate_limit.max_secs
    );

    let state = AppState {
        finder: Arc::new(RecGovClient::new(config.api_key.clone())?),
        search_config: config.search,
    };

    log::info!(
        "🌐 Server will be available at: http://{}",
        config.bind_address
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .service(
                web::scope("/api")
                    .route("/search", web::post().to(search_campsites))
                    .route("/units", web::post().to(list_units)),
            )
            .route("/health", web::get().to(health))
    })
    .bind(&config.bind_address)?
    .run()
    .await?;

    Ok(())
}
