// src/errors.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Blob storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::Json(_) => StatusCode::BAD_REQUEST,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Io(_)
            | ServiceError::Http(_)
            | ServiceError::Storage(_)
            | ServiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        match self {
            ServiceError::Io(e) => log::error!("File system error: {}", e),
            ServiceError::Http(e) => log::error!("Blob storage error: {}", e),
            ServiceError::Storage(msg) => log::error!("Storage error: {}", msg),
            ServiceError::Config(msg) => log::error!("Configuration error: {}", msg),
            ServiceError::Validation(_) | ServiceError::Json(_) => {
                log::warn!("Rejected request: {}", self)
            }
            ServiceError::Forbidden | ServiceError::NotFound => {}
        }

        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}
