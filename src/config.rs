// src/config.rs
use clap::Parser;
use std::path::PathBuf;

use crate::errors::ServiceError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3848;
pub const DEFAULT_RESULTS_DIR: &str = "optimization_results";
pub const DEFAULT_STATIC_DIR: &str = "public";
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yaml";
pub const DEFAULT_BLOB_BASE_URL: &str = "https://blob.vercel-storage.com";
pub const DEFAULT_BLOB_PREFIX: &str = "results/";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Parser, Debug, Default)]
#[command(name = "results-dashboard")]
#[command(about = "Serve optimization run results to the dashboard")]
pub struct Args {
    /// Address to bind (env: DASHBOARD_HOST, default 0.0.0.0)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (env: DASHBOARD_PORT, default 3848)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding the active result CSVs (env: RESULTS_DIR)
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Directory for archived runs (env: ARCHIVE_DIR, default <results-dir>/archived)
    #[arg(long)]
    pub archive_dir: Option<PathBuf>,

    /// Dashboard static files (env: STATIC_DIR)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Storage backend: "local" or "blob" (env: STORAGE_BACKEND)
    #[arg(long)]
    pub storage: Option<String>,

    /// Blob API endpoint (env: BLOB_BASE_URL)
    #[arg(long)]
    pub blob_base_url: Option<String>,

    /// log4rs configuration file (env: LOG_CONFIG)
    #[arg(long)]
    pub log_config: Option<String>,

    /// Enable debug logging when falling back to env_logger
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    Local {
        results_dir: PathBuf,
        archive_dir: PathBuf,
    },
    Blob {
        base_url: String,
        token: String,
        prefix: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub storage: StorageConfig,
    pub log_config: String,
    pub debug: bool,
    pub max_upload_bytes: usize,
}

impl DashboardConfig {
    /// Command line first, then the process environment, then defaults.
    pub fn from_env(args: Args) -> Result<Self, ServiceError> {
        Self::from_sources(args, |key| std::env::var(key).ok())
    }

    pub fn from_sources<F>(args: Args, env: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = args
            .host
            .or_else(|| var("DASHBOARD_HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match args.port {
            Some(port) => port,
            None => match var("DASHBOARD_PORT") {
                Some(raw) => raw.parse::<u16>().map_err(|e| {
                    ServiceError::Config(format!("DASHBOARD_PORT '{}' is not a port: {}", raw, e))
                })?,
                None => DEFAULT_PORT,
            },
        };

        let static_dir = args
            .static_dir
            .or_else(|| var("STATIC_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let backend = args
            .storage
            .or_else(|| var("STORAGE_BACKEND"))
            .unwrap_or_else(|| "local".to_string())
            .to_lowercase();

        let storage = match backend.as_str() {
            "local" => {
                let results_dir = args
                    .results_dir
                    .or_else(|| var("RESULTS_DIR").map(PathBuf::from))
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR));
                let archive_dir = args
                    .archive_dir
                    .or_else(|| var("ARCHIVE_DIR").map(PathBuf::from))
                    .unwrap_or_else(|| results_dir.join("archived"));
                StorageConfig::Local {
                    results_dir,
                    archive_dir,
                }
            }
            "blob" => {
                let token = var("BLOB_READ_WRITE_TOKEN").ok_or_else(|| {
                    ServiceError::Config("BLOB_READ_WRITE_TOKEN must be set for blob storage".to_string())
                })?;
                StorageConfig::Blob {
                    base_url: args
                        .blob_base_url
                        .or_else(|| var("BLOB_BASE_URL"))
                        .unwrap_or_else(|| DEFAULT_BLOB_BASE_URL.to_string()),
                    token,
                    prefix: var("BLOB_PREFIX").unwrap_or_else(|| DEFAULT_BLOB_PREFIX.to_string()),
                }
            }
            other => {
                return Err(ServiceError::Config(format!(
                    "Unknown storage backend '{}', expected 'local' or 'blob'",
                    other
                )))
            }
        };

        let max_upload_bytes = var("MAX_UPLOAD_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Ok(Self {
            host,
            port,
            static_dir,
            storage,
            log_config: args
                .log_config
                .or_else(|| var("LOG_CONFIG"))
                .unwrap_or_else(|| DEFAULT_LOG_CONFIG.to_string()),
            debug: args.debug,
            max_upload_bytes,
        })
    }
}
