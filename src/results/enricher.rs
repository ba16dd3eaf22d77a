// src/results/enricher.rs
use crate::results::csv_parser::ParsedTable;
use crate::results::formatting::{format_renko_timeframe, format_zone_stats};
use crate::results::schema::{has_renko_file_prefix, is_renko_headers, run_timestamp};
use crate::types::{FieldMap, FieldValue, ResultRecord, RunType};

/// Keys owned by the record core; a CSV column with one of these names is
/// replaced by the derived value.
const CORE_KEYS: [&str; 4] = ["source_file", "run_timestamp", "type", "archived"];

/// What is known about a file before its rows are enriched.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub source_file: String,
    pub run_timestamp: String,
    /// Header set matched the Renko analysis columns.
    pub renko_analysis: bool,
    /// File name carries the `renko_` prefix.
    pub renko_prefix: bool,
    pub archived: bool,
}

impl SourceContext {
    pub fn new(source_file: &str, headers: &[String], archived: bool) -> Self {
        Self {
            source_file: source_file.to_string(),
            run_timestamp: run_timestamp(source_file),
            renko_analysis: is_renko_headers(headers),
            renko_prefix: has_renko_file_prefix(source_file),
            archived,
        }
    }

    pub fn is_renko(&self) -> bool {
        self.renko_analysis || self.renko_prefix
    }
}

/// Block size for the timeframe label: `block_size`, else `brick_size`.
pub fn renko_block_size(row: &FieldMap) -> Option<&FieldValue> {
    if row.has_value("block_size") {
        row.get("block_size")
    } else {
        row.get("brick_size")
    }
}

fn resolve_run_type(ctx: &SourceContext, row_type: Option<FieldValue>) -> RunType {
    if ctx.is_renko() {
        return RunType::Renko;
    }
    match row_type {
        Some(tag) if tag.is_truthy() => RunType::from_tag(&tag.to_display()),
        _ => RunType::Parallel,
    }
}

fn derive_renko_fields(row: &mut FieldMap) {
    let needs_symbol = !row.get("symbol").map_or(false, |v| v.is_truthy());
    if needs_symbol {
        if let Some(asset) = row.get("asset").filter(|v| v.is_truthy()).cloned() {
            row.insert("symbol", asset);
        }
    }

    let needs_timeframe = !row.get("timeframe").map_or(false, |v| v.is_truthy());
    if needs_timeframe {
        if let Some(label) = renko_block_size(row).and_then(format_renko_timeframe) {
            row.insert("timeframe", FieldValue::Text(label));
        }
    }

    let zone_stats = format_zone_stats(row);
    row.insert("zone_stats", FieldValue::Text(zone_stats));
}

/// Older Renko exports only had a `brick_size` column and no analysis
/// columns; they still get a timeframe label.
fn derive_brick_timeframe(row: &mut FieldMap) {
    if row.get("timeframe").map_or(false, |v| v.is_truthy()) {
        return;
    }
    if let Some(label) = row.get("brick_size").and_then(format_renko_timeframe) {
        row.insert("timeframe", FieldValue::Text(label));
    }
}

pub fn enrich_row(mut row: FieldMap, ctx: &SourceContext) -> ResultRecord {
    let row_type = row.remove("type");
    for key in CORE_KEYS {
        row.remove(key);
    }

    let run_type = resolve_run_type(ctx, row_type);

    if ctx.renko_analysis {
        derive_renko_fields(&mut row);
    } else if ctx.renko_prefix {
        derive_brick_timeframe(&mut row);
    }

    ResultRecord {
        fields: row,
        source_file: ctx.source_file.clone(),
        run_timestamp: ctx.run_timestamp.clone(),
        run_type,
        archived: ctx.archived,
    }
}

/// Classifies the table once, then enriches each row in order.
pub fn enrich_table(source_file: &str, table: ParsedTable, archived: bool) -> Vec<ResultRecord> {
    let ctx = SourceContext::new(source_file, &table.headers, archived);
    table
        .rows
        .into_iter()
        .map(|row| enrich_row(row, &ctx))
        .collect()
}
