// src/storage/mod.rs
pub mod blob_store;
pub mod local_store;

use chrono::{DateTime, Utc};

use crate::config::StorageConfig;
use crate::errors::ServiceError;

pub use blob_store::BlobStore;
pub use local_store::LocalDirStore;

pub const CSV_CONTENT_TYPE: &str = "text/csv";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The two file sets the dashboard works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Active,
    Archived,
}

impl Scope {
    pub fn is_archived(self) -> bool {
        matches!(self, Scope::Archived)
    }

    pub fn label(self) -> &'static str {
        match self {
            Scope::Active => "active",
            Scope::Archived => "archived",
        }
    }
}

/// A file as reported by a store listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    /// Retrieval location, only known for blob storage.
    pub url: Option<String>,
}

impl StoredFile {
    pub fn is_csv(&self) -> bool {
        self.name.ends_with(".csv")
    }
}

/// Rejects identifiers that could escape their scope.
pub fn validate_file_name(name: &str) -> Result<(), ServiceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation("File name must not be empty".to_string()));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains('/') || trimmed.contains('\\') {
        return Err(ServiceError::Validation(format!(
            "Invalid file name: {}",
            name
        )));
    }
    Ok(())
}

/// Storage behind the results endpoints.
#[derive(Debug, Clone)]
pub enum ResultStore {
    Local(LocalDirStore),
    Blob(BlobStore),
}

impl ResultStore {
    pub fn from_config(config: &StorageConfig) -> Self {
        match config {
            StorageConfig::Local {
                results_dir,
                archive_dir,
            } => ResultStore::Local(LocalDirStore::new(results_dir.clone(), archive_dir.clone())),
            StorageConfig::Blob {
                base_url,
                token,
                prefix,
            } => ResultStore::Blob(BlobStore::new(base_url.clone(), token.clone(), prefix.clone())),
        }
    }

    /// Creates whatever the backend needs before serving.
    pub async fn prepare(&self) -> Result<(), ServiceError> {
        match self {
            ResultStore::Local(store) => store.ensure_dirs().await,
            ResultStore::Blob(_) => Ok(()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ResultStore::Local(store) => format!(
                "local directory {} (archive: {})",
                store.results_dir().display(),
                store.archive_dir().display()
            ),
            ResultStore::Blob(store) => format!("blob storage {}", store.base_url()),
        }
    }

    /// Every file in the scope, sorted by name.
    pub async fn list(&self, scope: Scope) -> Result<Vec<StoredFile>, ServiceError> {
        let mut files = match self {
            ResultStore::Local(store) => store.list(scope).await?,
            ResultStore::Blob(store) => store.list(scope).await?,
        };
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    pub async fn list_csv(&self, scope: Scope) -> Result<Vec<StoredFile>, ServiceError> {
        let files = self.list(scope).await?;
        Ok(files.into_iter().filter(StoredFile::is_csv).collect())
    }

    pub async fn read_text(&self, scope: Scope, file: &StoredFile) -> Result<String, ServiceError> {
        match self {
            ResultStore::Local(store) => store.read_text(scope, &file.name).await,
            ResultStore::Blob(store) => store.read_text(file).await,
        }
    }

    /// Writes a file and returns where it can be fetched from.
    pub async fn put(
        &self,
        scope: Scope,
        name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ServiceError> {
        validate_file_name(name)?;
        match self {
            ResultStore::Local(store) => store.put(scope, name, content).await,
            ResultStore::Blob(store) => store.put(scope, name, content, content_type).await,
        }
    }

    pub async fn move_file(
        &self,
        file: &StoredFile,
        from: Scope,
        to: Scope,
    ) -> Result<(), ServiceError> {
        match self {
            ResultStore::Local(store) => store.move_file(&file.name, from, to).await,
            ResultStore::Blob(store) => store.move_file(file, to).await,
        }
    }
}
