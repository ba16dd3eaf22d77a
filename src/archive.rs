// src/archive.rs
// Moving runs between the active and archived file sets. Best effort per
// item: identifiers that are not in the source set are skipped.

use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::ServiceError;
use crate::storage::{ResultStore, Scope, StoredFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Archive,
    Restore,
}

impl Transition {
    pub fn source(self) -> Scope {
        match self {
            Transition::Archive => Scope::Active,
            Transition::Restore => Scope::Archived,
        }
    }

    pub fn target(self) -> Scope {
        match self {
            Transition::Archive => Scope::Archived,
            Transition::Restore => Scope::Active,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ArchiveResponse {
    pub moved: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RestoreResponse {
    pub restored: Vec<String>,
}

/// `parallel_results_X.csv` -> `parallel_top_10_X.json`.
pub fn companion_file_name(file: &str) -> String {
    file.replacen("_results_", "_top_10_", 1)
        .replacen(".csv", ".json", 1)
}

/// Moves each identifier found in the source scope, plus its top-10
/// companion when one exists. Returns the identifiers that were moved.
/// Only names from the scope listing can match, so path-like identifiers
/// are skipped like any other unknown name.
pub async fn transition_runs(
    store: &ResultStore,
    files: &[String],
    transition: Transition,
) -> Result<Vec<String>, ServiceError> {
    let (from, to) = (transition.source(), transition.target());
    let mut present: HashMap<String, StoredFile> = store
        .list(from)
        .await?
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect();

    let mut moved = Vec::new();
    for file in files {
        let Some(stored) = present.remove(file) else {
            warn!("Skipping {}: not in the {} set", file, from.label());
            continue;
        };

        store.move_file(&stored, from, to).await?;
        moved.push(file.clone());

        let companion = companion_file_name(file);
        if companion == *file {
            continue;
        }
        if let Some(stored_companion) = present.remove(&companion) {
            if let Err(e) = store.move_file(&stored_companion, from, to).await {
                warn!("Moved {} but not its companion {}: {}", file, companion, e);
            }
        }
    }

    info!(
        "Moved {} of {} requested runs from {} to {}",
        moved.len(),
        files.len(),
        from.label(),
        to.label()
    );
    Ok(moved)
}

pub async fn archive_runs(store: &ResultStore, files: &[String]) -> Result<ArchiveResponse, ServiceError> {
    let moved = transition_runs(store, files, Transition::Archive).await?;
    Ok(ArchiveResponse { moved })
}

pub async fn restore_runs(store: &ResultStore, files: &[String]) -> Result<RestoreResponse, ServiceError> {
    let restored = transition_runs(store, files, Transition::Restore).await?;
    Ok(RestoreResponse { restored })
}
