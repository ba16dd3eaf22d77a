// src/logging.rs
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::path::Path;

/// log4rs from the given file when it exists, otherwise env_logger on stdout.
pub fn init_logging(log_config: &str, debug: bool) {
    if Path::new(log_config).exists() {
        match log4rs::init_file(log_config, Default::default()) {
            Ok(()) => {
                log::info!("Logging configured from {}", log_config);
                return;
            }
            Err(e) => eprintln!("Failed to initialize log4rs from {}: {}", log_config, e),
        }
    }

    let mut builder = Builder::from_default_env();
    builder.target(Target::Stdout);
    builder.filter_level(if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
    if let Err(e) = builder.try_init() {
        eprintln!("Logger already initialized: {}", e);
    }
}
