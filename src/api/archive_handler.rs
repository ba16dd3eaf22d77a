// src/api/archive_handler.rs
use actix_web::{web, HttpResponse};

use crate::archive::{archive_runs, restore_runs};
use crate::errors::ServiceError;
use crate::storage::ResultStore;

/// The body must be a JSON array of file names.
pub fn parse_file_list(body: &[u8]) -> Result<Vec<String>, ServiceError> {
    serde_json::from_slice::<Vec<String>>(body).map_err(|e| {
        ServiceError::Validation(format!("Expected a JSON array of file names: {}", e))
    })
}

/// POST /archive-runs
pub async fn post_archive_runs(
    body: web::Bytes,
    store: web::Data<ResultStore>,
) -> Result<HttpResponse, ServiceError> {
    let files = parse_file_list(&body)?;
    let response = archive_runs(&store, &files).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /restore-runs
pub async fn post_restore_runs(
    body: web::Bytes,
    store: web::Data<ResultStore>,
) -> Result<HttpResponse, ServiceError> {
    let files = parse_file_list(&body)?;
    let response = restore_runs(&store, &files).await?;
    Ok(HttpResponse::Ok().json(response))
}
