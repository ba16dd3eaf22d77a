// src/results/schema.rs
use std::collections::HashSet;

/// Columns every Renko zone-analysis export carries.
pub const RENKO_COLUMNS: [&str; 14] = [
    "asset",
    "block_size",
    "ema_fast",
    "ema_medium",
    "ema_slow",
    "zone",
    "total",
    "up",
    "down",
    "up_ratio",
    "down_ratio",
    "chi2",
    "p_value",
    "significant",
];

pub const PARALLEL_FILE_PREFIX: &str = "parallel_results_";
pub const RENKO_FILE_PREFIX: &str = "renko_results_";

/// True when the header set contains every Renko analysis column, compared
/// trimmed and case-insensitively. Extra columns are ignored.
pub fn is_renko_headers<S: AsRef<str>>(headers: &[S]) -> bool {
    let header_set: HashSet<String> = headers
        .iter()
        .map(|h| h.as_ref().trim().to_lowercase())
        .collect();
    RENKO_COLUMNS.iter().all(|col| header_set.contains(*col))
}

/// Renko runs are recognised by the `renko_` file name prefix as well.
pub fn has_renko_file_prefix(file: &str) -> bool {
    file.starts_with("renko_")
}

/// `parallel_results_20240101.csv` -> `20240101`.
pub fn run_timestamp(file: &str) -> String {
    let stem = file
        .strip_prefix(PARALLEL_FILE_PREFIX)
        .or_else(|| file.strip_prefix(RENKO_FILE_PREFIX))
        .unwrap_or(file);
    stem.replacen(".csv", "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renko_headers() -> Vec<String> {
        RENKO_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_full_renko_header_set_with_extras() {
        let mut headers: Vec<String> = renko_headers()
            .into_iter()
            .map(|h| format!(" {} ", h.to_uppercase()))
            .collect();
        headers.push("strategy".to_string());
        headers.push("timeframe".to_string());
        assert!(is_renko_headers(&headers));
    }

    #[test]
    fn test_one_missing_column_is_not_renko() {
        for skip in 0..RENKO_COLUMNS.len() {
            let headers: Vec<&str> = RENKO_COLUMNS
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, c)| *c)
                .collect();
            assert!(!is_renko_headers(&headers), "missing {}", RENKO_COLUMNS[skip]);
        }
    }

    #[test]
    fn test_generic_headers_are_not_renko() {
        let headers = ["strategy", "symbol", "timeframe", "net_profit", "best_params"];
        assert!(!is_renko_headers(&headers));
        let empty: [&str; 0] = [];
        assert!(!is_renko_headers(&empty));
    }

    #[test]
    fn test_run_timestamp_strips_prefix_and_extension() {
        assert_eq!(run_timestamp("parallel_results_20240101.csv"), "20240101");
        assert_eq!(run_timestamp("renko_results_20240102_1530.csv"), "20240102_1530");
        assert_eq!(run_timestamp("upload_1700000000000.csv"), "upload_1700000000000");
    }
}
