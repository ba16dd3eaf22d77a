// src/storage/blob_store.rs
// Vercel-Blob-compatible HTTP storage. Active runs live under `<prefix>`,
// archived runs under `<prefix>archived/`.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{Scope, StoredFile};
use crate::errors::ServiceError;

const API_VERSION: &str = "7";

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct BlobListResponse {
    blobs: Vec<BlobEntry>,
    cursor: Option<String>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct BlobEntry {
    url: String,
    pathname: String,
    size: u64,
    uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug)]
struct BlobPutResponse {
    url: String,
}

#[derive(Debug, Clone)]
pub struct BlobStore {
    client: Client,
    base_url: String,
    token: String,
    prefix: String,
}

impl BlobStore {
    pub fn new(base_url: String, token: String, prefix: String) -> Self {
        let mut prefix = prefix.trim_start_matches('/').to_string();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            prefix,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn scope_prefix(&self, scope: Scope) -> String {
        match scope {
            Scope::Active => self.prefix.clone(),
            Scope::Archived => format!("{}archived/", self.prefix),
        }
    }

    /// Lists the blobs directly under the scope prefix, following the
    /// pagination cursor until the listing is exhausted.
    pub async fn list(&self, scope: Scope) -> Result<Vec<StoredFile>, ServiceError> {
        let prefix = self.scope_prefix(scope);
        let mut files = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&self.base_url)
                .bearer_auth(&self.token)
                .header("x-api-version", API_VERSION)
                .query(&[("prefix", prefix.as_str())]);
            if let Some(c) = &cursor {
                request = request.query(&[("cursor", c.as_str())]);
            }

            let page: BlobListResponse = request
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            for blob in page.blobs {
                let Some(name) = blob.pathname.strip_prefix(&prefix) else {
                    continue;
                };
                if name.is_empty() || name.contains('/') {
                    continue;
                }
                files.push(StoredFile {
                    name: name.to_string(),
                    size: blob.size,
                    modified: blob.uploaded_at,
                    url: Some(blob.url),
                });
            }

            match (page.has_more, page.cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        debug!("Listed {} blobs under {}", files.len(), prefix);
        Ok(files)
    }

    async fn fetch_bytes(&self, file: &StoredFile) -> Result<Vec<u8>, ServiceError> {
        let url = file
            .url
            .as_deref()
            .ok_or_else(|| ServiceError::Storage(format!("No URL known for blob {}", file.name)))?;
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }

    pub async fn read_text(&self, file: &StoredFile) -> Result<String, ServiceError> {
        let bytes = self.fetch_bytes(file).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn put(
        &self,
        scope: Scope,
        name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ServiceError> {
        let pathname = format!("{}{}", self.scope_prefix(scope), name);
        let response: BlobPutResponse = self
            .client
            .put(format!("{}/", self.base_url))
            .bearer_auth(&self.token)
            .header("x-api-version", API_VERSION)
            .header("x-content-type", content_type)
            .header("x-add-random-suffix", "0")
            .header("x-allow-overwrite", "1")
            .query(&[("pathname", pathname.as_str())])
            .body(content)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!("💾 Uploaded blob {} -> {}", pathname, response.url);
        Ok(response.url)
    }

    async fn delete(&self, url: &str) -> Result<(), ServiceError> {
        self.client
            .post(format!("{}/delete", self.base_url))
            .bearer_auth(&self.token)
            .header("x-api-version", API_VERSION)
            .json(&json!({ "urls": [url] }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Blob storage has no rename: copy the bytes to the target scope, then
    /// delete the source blob.
    pub async fn move_file(&self, file: &StoredFile, to: Scope) -> Result<(), ServiceError> {
        let content = self.fetch_bytes(file).await?;
        let content_type = if file.name.ends_with(".json") {
            super::JSON_CONTENT_TYPE
        } else {
            super::CSV_CONTENT_TYPE
        };
        self.put(to, &file.name, content, content_type).await?;

        if let Some(url) = &file.url {
            if let Err(e) = self.delete(url).await {
                warn!("Copied {} but could not delete the source blob: {}", file.name, e);
                return Err(e);
            }
        }
        Ok(())
    }
}
