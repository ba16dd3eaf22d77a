// src/main.rs
use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use dotenv::dotenv;
use std::io;

use results_dashboard::api::{self, StaticFiles};
use results_dashboard::config::{Args, DashboardConfig};
use results_dashboard::logging::init_logging;
use results_dashboard::storage::ResultStore;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    let args = Args::parse();
    let config = DashboardConfig::from_env(args)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
    init_logging(&config.log_config, config.debug);

    let store = ResultStore::from_config(&config.storage);
    store
        .prepare()
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    log::info!("📊 Results dashboard starting on http://{}:{}", config.host, config.port);
    log::info!("Storage: {}", store.describe());
    log::info!("Static files: {}", config.static_dir.display());
    log::info!("Available endpoints (also under /api):");
    log::info!("  GET  /results, /archived, /summary, /runs, /runs/archived, /health");
    log::info!("  POST /results, /upload, /archive-runs, /restore-runs");

    let store = web::Data::new(store);
    let static_files = web::Data::new(StaticFiles::new(config.static_dir.clone()));
    let max_upload_bytes = config.max_upload_bytes;

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(api::cors())
            .app_data(store.clone())
            .app_data(static_files.clone())
            .app_data(web::PayloadConfig::new(max_upload_bytes))
            .configure(api::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
