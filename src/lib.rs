// src/lib.rs
pub mod api;
pub mod archive;
pub mod config;
pub mod errors;
pub mod logging;
pub mod results;
pub mod storage;
pub mod types;
