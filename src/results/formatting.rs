// src/results/formatting.rs
// Label builders for Renko zone analysis rows. A missing input renders as
// `PLACEHOLDER`, never as NaN.

use crate::types::{FieldMap, FieldValue};

pub const PLACEHOLDER: &str = "-";

fn present(value: Option<&FieldValue>) -> Option<&FieldValue> {
    value.filter(|v| match v {
        FieldValue::Text(s) => !s.is_empty(),
        FieldValue::Number(n) => !n.is_nan(),
        FieldValue::Bool(_) => true,
    })
}

/// Ratios up to 1 are fractions and get scaled to percent; anything above 1
/// is taken as already being a percentage.
pub fn format_ratio(value: Option<&FieldValue>) -> String {
    let Some(value) = present(value) else {
        return PLACEHOLDER.to_string();
    };
    match value.to_number().filter(|n| n.is_finite()) {
        Some(n) => {
            let pct = if n <= 1.0 { n * 100.0 } else { n };
            format!("{:.1}%", pct)
        }
        None => value.to_display(),
    }
}

pub fn format_number(value: Option<&FieldValue>, decimals: usize) -> String {
    let Some(value) = present(value) else {
        return PLACEHOLDER.to_string();
    };
    match value.to_number().filter(|n| n.is_finite()) {
        Some(n) => format!("{:.*}", decimals, n),
        None => value.to_display(),
    }
}

/// `Renko_<block size>`; `None` when there is no block size to show.
pub fn format_renko_timeframe(block_size: &FieldValue) -> Option<String> {
    if block_size.is_blank() {
        return None;
    }
    Some(format!("Renko_{}", block_size.to_display()))
}

fn display_or(value: Option<&FieldValue>, fallback: &str) -> String {
    value
        .map(|v| v.to_display())
        .unwrap_or_else(|| fallback.to_string())
}

/// One-line zone summary shown in the results table, e.g.
/// `Zone 3: 120 total (Up 70, Down 50) • Up 58.3%, Down 41.7% • chi2 3.33, p 0.0679 • Not significant`.
pub fn format_zone_stats(row: &FieldMap) -> String {
    let zone = display_or(row.get("zone"), PLACEHOLDER);
    let total = display_or(row.get("total"), "0");
    let up = display_or(row.get("up"), "0");
    let down = display_or(row.get("down"), "0");
    let up_ratio = format_ratio(row.get("up_ratio"));
    let down_ratio = format_ratio(row.get("down_ratio"));
    let chi2 = format_number(row.get("chi2"), 2);
    let p_value = format_number(row.get("p_value"), 4);
    let significance = if row.get("significant").map_or(false, |v| v.is_truthy()) {
        "Significant"
    } else {
        "Not significant"
    };

    format!(
        "Zone {}: {} total (Up {}, Down {}) • Up {}, Down {} • chi2 {}, p {} • {}",
        zone, total, up, down, up_ratio, down_ratio, chi2, p_value, significance
    )
}
