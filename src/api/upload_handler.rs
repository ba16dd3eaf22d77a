// src/api/upload_handler.rs
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::info;
use serde::Deserialize;

use crate::errors::ServiceError;
use crate::storage::{ResultStore, Scope, CSV_CONTENT_TYPE};
use crate::types::{UploadEnvelope, UploadReceipt};

#[derive(Deserialize, Debug, Default)]
pub struct UploadQuery {
    pub filename: Option<String>,
}

fn default_upload_name() -> String {
    format!("upload_{}.csv", Utc::now().timestamp_millis())
}

fn is_json_request(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.contains("application/json"))
}

async fn store_upload(
    store: &ResultStore,
    filename: String,
    content: Vec<u8>,
) -> Result<HttpResponse, ServiceError> {
    let size = content.len();
    let url = store
        .put(Scope::Active, &filename, content, CSV_CONTENT_TYPE)
        .await?;
    info!("📥 Stored upload {} ({} bytes)", filename, size);
    Ok(HttpResponse::Ok().json(UploadReceipt {
        uploaded: filename,
        url,
    }))
}

/// Reads `{filename, content}` from a JSON body.
pub fn parse_envelope(body: &[u8]) -> Result<(String, Vec<u8>), ServiceError> {
    let envelope: UploadEnvelope = serde_json::from_slice(body)?;
    let filename = envelope
        .filename
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| ServiceError::Validation("Missing 'filename' in upload body".to_string()))?;
    let content = envelope
        .content
        .ok_or_else(|| ServiceError::Validation("Missing 'content' in upload body".to_string()))?;
    Ok((filename, content.into_bytes()))
}

/// POST /results - JSON envelope, or raw CSV with `?filename=`.
pub async fn post_results(
    req: HttpRequest,
    body: web::Bytes,
    query: web::Query<UploadQuery>,
    store: web::Data<ResultStore>,
) -> Result<HttpResponse, ServiceError> {
    let (filename, content) = if is_json_request(&req) {
        parse_envelope(&body)?
    } else {
        let filename = query.into_inner().filename.unwrap_or_else(default_upload_name);
        (filename, body.to_vec())
    };
    store_upload(&store, filename, content).await
}

/// POST /upload - raw CSV body with `?filename=`.
pub async fn upload_raw(
    body: web::Bytes,
    query: web::Query<UploadQuery>,
    store: web::Data<ResultStore>,
) -> Result<HttpResponse, ServiceError> {
    let filename = query.into_inner().filename.unwrap_or_else(default_upload_name);
    store_upload(&store, filename, body.to_vec()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope() {
        let (name, content) =
            parse_envelope(br#"{"filename":"parallel_results_1.csv","content":"a,b\n1,2\n"}"#).unwrap();
        assert_eq!(name, "parallel_results_1.csv");
        assert_eq!(content, b"a,b\n1,2\n".to_vec());
    }

    #[test]
    fn test_parse_envelope_rejects_missing_fields() {
        assert!(matches!(
            parse_envelope(br#"{"content":"a"}"#),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            parse_envelope(br#"{"filename":"a.csv"}"#),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(parse_envelope(b"not json"), Err(ServiceError::Json(_))));
    }

    #[test]
    fn test_default_upload_name() {
        let name = default_upload_name();
        assert!(name.starts_with("upload_"));
        assert!(name.ends_with(".csv"));
    }
}
