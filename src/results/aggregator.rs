// src/results/aggregator.rs
use log::{debug, info};

use crate::errors::ServiceError;
use crate::results::csv_parser::parse_table;
use crate::results::enricher::enrich_table;
use crate::storage::{ResultStore, Scope};
use crate::types::{ResultRecord, RunInfo};

/// Merges already-loaded files into one collection, keeping file order and
/// the row order inside each file.
pub fn aggregate_files<I, N, T>(files: I, archived: bool) -> Vec<ResultRecord>
where
    I: IntoIterator<Item = (N, T)>,
    N: AsRef<str>,
    T: AsRef<str>,
{
    let mut all_records = Vec::new();
    for (name, text) in files {
        let table = parse_table(text.as_ref());
        let records = enrich_table(name.as_ref(), table, archived);
        debug!("Loaded {} rows from {}", records.len(), name.as_ref());
        all_records.extend(records);
    }
    all_records
}

/// Loads every CSV in the scope. The first file that cannot be listed or read
/// fails the whole load; no partial collection is returned.
pub async fn load_results(
    store: &ResultStore,
    scope: Scope,
) -> Result<Vec<ResultRecord>, ServiceError> {
    let files = store.list_csv(scope).await?;
    let mut loaded = Vec::with_capacity(files.len());
    for file in &files {
        let text = store.read_text(scope, file).await?;
        loaded.push((file.name.as_str(), text));
    }

    let all_records = aggregate_files(loaded, scope.is_archived());
    info!(
        "Aggregated {} {} results from {} files",
        all_records.len(),
        scope.label(),
        files.len()
    );
    Ok(all_records)
}

/// Per-file metadata for the runs listing, with row counts.
pub async fn load_run_index(store: &ResultStore, scope: Scope) -> Result<Vec<RunInfo>, ServiceError> {
    let files = store.list_csv(scope).await?;
    let mut runs = Vec::with_capacity(files.len());

    for file in files {
        let text = store.read_text(scope, &file).await?;
        let row_count = parse_table(&text).rows.len();
        runs.push(RunInfo {
            file: file.name,
            size: file.size,
            modified: file.modified,
            results: Some(row_count),
            url: file.url,
        });
    }

    Ok(runs)
}
