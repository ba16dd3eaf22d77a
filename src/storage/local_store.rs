// src/storage/local_store.rs
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Scope, StoredFile};
use crate::errors::ServiceError;

/// Results directory on local disk, with archived runs in a second directory
/// (by default `archived/` inside the results directory).
#[derive(Debug, Clone)]
pub struct LocalDirStore {
    results_dir: PathBuf,
    archive_dir: PathBuf,
}

impl LocalDirStore {
    pub fn new(results_dir: PathBuf, archive_dir: PathBuf) -> Self {
        Self {
            results_dir,
            archive_dir,
        }
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn archive_dir(&self) -> &Path {
        &self.archive_dir
    }

    fn dir(&self, scope: Scope) -> &Path {
        match scope {
            Scope::Active => &self.results_dir,
            Scope::Archived => &self.archive_dir,
        }
    }

    pub async fn ensure_dirs(&self) -> Result<(), ServiceError> {
        for dir in [&self.results_dir, &self.archive_dir] {
            if !dir.exists() {
                tokio::fs::create_dir_all(dir).await?;
                info!("📁 Created directory: {}", dir.display());
            }
        }
        Ok(())
    }

    /// Regular files only, symlinks resolved to their target; the archive
    /// directory nested in the results directory is skipped.
    pub async fn list(&self, scope: Scope) -> Result<Vec<StoredFile>, ServiceError> {
        let dir = self.dir(scope);
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!("Skipping dangling link {}", path.display());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            files.push(StoredFile {
                name,
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
                url: None,
            });
        }

        debug!("Listed {} files in {}", files.len(), dir.display());
        Ok(files)
    }

    pub async fn read_text(&self, scope: Scope, name: &str) -> Result<String, ServiceError> {
        let path = self.dir(scope).join(name);
        let bytes = tokio::fs::read(&path).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn put(
        &self,
        scope: Scope,
        name: &str,
        content: Vec<u8>,
    ) -> Result<String, ServiceError> {
        let path = self.dir(scope).join(name);
        tokio::fs::write(&path, content).await?;
        info!("💾 Wrote {}", path.display());
        Ok(path.display().to_string())
    }

    pub async fn move_file(&self, name: &str, from: Scope, to: Scope) -> Result<(), ServiceError> {
        let src = self.dir(from).join(name);
        let dst = self.dir(to).join(name);
        tokio::fs::rename(&src, &dst).await?;
        debug!("Moved {} -> {}", src.display(), dst.display());
        Ok(())
    }
}
