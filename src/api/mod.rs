// src/api/mod.rs
pub mod archive_handler;
pub mod results_handler;
pub mod runs_handler;
pub mod static_files;
pub mod upload_handler;

use actix_cors::Cors;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{guard, web, HttpResponse, Responder};

pub use static_files::StaticFiles;

async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}

async fn preflight() -> impl Responder {
    HttpResponse::NoContent().finish()
}

/// Any origin, GET/POST/OPTIONS, Content-Type only.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![CONTENT_TYPE])
        .max_age(3600)
}

fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .service(
            web::resource("/results")
                .route(web::get().to(results_handler::get_results))
                .route(web::post().to(upload_handler::post_results)),
        )
        .route("/archived", web::get().to(results_handler::get_archived_results))
        .route("/summary", web::get().to(results_handler::get_summary))
        .route("/upload", web::post().to(upload_handler::upload_raw))
        .route("/runs", web::get().to(runs_handler::get_runs))
        .route("/runs/archived", web::get().to(runs_handler::get_archived_runs))
        .route("/archive-runs", web::post().to(archive_handler::post_archive_runs))
        .route("/restore-runs", web::post().to(archive_handler::post_restore_runs));
}

/// Pre-flight requests are answered before any route sees them. Every
/// endpoint is reachable with and without the `/api` prefix, and any other
/// GET is a static file.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{tail:.*}")
            .guard(guard::Options())
            .to(preflight),
    )
    .service(web::scope("/api").configure(api_routes))
    .configure(api_routes)
    .service(
        web::resource("/{tail:.*}")
            .guard(guard::Get())
            .to(static_files::serve_static),
    );
}
