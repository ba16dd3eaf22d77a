// src/api/runs_handler.rs
use actix_web::{web, HttpResponse};
use log::debug;

use crate::errors::ServiceError;
use crate::results::load_run_index;
use crate::storage::{ResultStore, Scope};

async fn runs_for_scope(store: &ResultStore, scope: Scope) -> Result<HttpResponse, ServiceError> {
    let runs = load_run_index(store, scope).await?;
    debug!("Listing {} {} runs", runs.len(), scope.label());
    Ok(HttpResponse::Ok().json(runs))
}

/// GET /runs
pub async fn get_runs(store: web::Data<ResultStore>) -> Result<HttpResponse, ServiceError> {
    runs_for_scope(&store, Scope::Active).await
}

/// GET /runs/archived
pub async fn get_archived_runs(store: web::Data<ResultStore>) -> Result<HttpResponse, ServiceError> {
    runs_for_scope(&store, Scope::Archived).await
}
