// src/api/results_handler.rs
use actix_web::{web, HttpResponse};
use log::info;

use crate::errors::ServiceError;
use crate::results::load_results;
use crate::results::query::{select, summarize, ResultQuery};
use crate::storage::{ResultStore, Scope};

async fn results_for_scope(
    store: &ResultStore,
    scope: Scope,
    query: &ResultQuery,
) -> Result<HttpResponse, ServiceError> {
    let records = load_results(store, scope).await?;
    let total = records.len();
    let selected = select(records, query);
    if selected.len() != total {
        info!("Filtered {} {} results down to {}", total, scope.label(), selected.len());
    }
    Ok(HttpResponse::Ok().json(selected))
}

/// GET /results
pub async fn get_results(
    store: web::Data<ResultStore>,
    query: web::Query<ResultQuery>,
) -> Result<HttpResponse, ServiceError> {
    results_for_scope(&store, Scope::Active, &query).await
}

/// GET /archived
pub async fn get_archived_results(
    store: web::Data<ResultStore>,
    query: web::Query<ResultQuery>,
) -> Result<HttpResponse, ServiceError> {
    results_for_scope(&store, Scope::Archived, &query).await
}

/// GET /summary - headline numbers over the filtered active results.
pub async fn get_summary(
    store: web::Data<ResultStore>,
    query: web::Query<ResultQuery>,
) -> Result<HttpResponse, ServiceError> {
    let records = load_results(&store, Scope::Active).await?;
    let selected = select(records, &query);
    Ok(HttpResponse::Ok().json(summarize(&selected)))
}
