// src/results/mod.rs
pub mod aggregator;
pub mod csv_parser;
pub mod enricher;
pub mod formatting;
pub mod query;
pub mod schema;

pub use aggregator::{aggregate_files, load_results, load_run_index};
pub use csv_parser::{parse_table, tokenize_line, ParsedTable};
pub use schema::is_renko_headers;
