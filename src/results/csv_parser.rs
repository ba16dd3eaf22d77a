// src/results/csv_parser.rs
// Lenient CSV reading for optimization result files. Nothing in here fails:
// ragged rows are padded or truncated and unbalanced quotes are tolerated.

use crate::types::{parse_js_number, FieldMap, FieldValue};

/// Column that holds a nested parameter blob and is never coerced to a number.
pub const BEST_PARAMS_COLUMN: &str = "best_params";

const BYTE_ORDER_MARK: char = '\u{FEFF}';

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<FieldMap>,
}

impl ParsedTable {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }
}

/// Splits one line into raw fields. A `"` flips the quoted state and is
/// dropped; commas inside quotes are kept as content.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => values.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    values.push(current);

    values
}

/// Coerces one trimmed cell according to its column.
pub fn coerce_value(column: &str, raw: &str) -> FieldValue {
    if !raw.is_empty() && column != BEST_PARAMS_COLUMN {
        if let Some(n) = parse_js_number(raw) {
            return FieldValue::Number(n);
        }
    }
    match raw {
        "True" => FieldValue::Bool(true),
        "False" => FieldValue::Bool(false),
        _ => FieldValue::Text(raw.to_string()),
    }
}

pub fn parse_table(text: &str) -> ParsedTable {
    let lines: Vec<&str> = text
        .trim()
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return ParsedTable::default();
    }

    let mut headers: Vec<String> = tokenize_line(lines[0])
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();
    if let Some(first) = headers.first_mut() {
        if let Some(stripped) = first.strip_prefix(BYTE_ORDER_MARK) {
            *first = stripped.to_string();
        }
    }

    let rows = lines[1..]
        .iter()
        .map(|line| {
            let values = tokenize_line(line);
            let mut row = FieldMap::with_capacity(headers.len());
            for (idx, header) in headers.iter().enumerate() {
                let raw = values.get(idx).map(|v| v.trim()).unwrap_or("");
                row.insert(header.clone(), coerce_value(header, raw));
            }
            row
        })
        .collect();

    ParsedTable { headers, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_plain_line() {
        assert_eq!(tokenize_line("a,b,,c"), vec!["a", "b", "", "c"]);
    }

    #[test]
    fn test_tokenize_keeps_commas_inside_quotes_and_drops_quotes() {
        let fields = tokenize_line(r#"EURUSD,"{'sl': 1.5, 'tp': 2}",10"#);
        assert_eq!(fields, vec!["EURUSD", "{'sl': 1.5, 'tp': 2}", "10"]);
    }

    #[test]
    fn test_tokenize_tolerates_unclosed_quote() {
        let fields = tokenize_line(r#"a,"b,c"#);
        assert_eq!(fields, vec!["a", "b,c"]);
    }

    #[test]
    fn test_tokenize_empty_line_yields_one_empty_field() {
        assert_eq!(tokenize_line(""), vec![""]);
    }

    #[test]
    fn test_parse_table_pads_and_truncates_rows() {
        let table = parse_table("a,b,c\n1,2\n4,5,6,7\n");
        assert_eq!(table.headers, vec!["a", "b", "c"]);
        assert_eq!(table.rows.len(), 2);
        for row in &table.rows {
            assert_eq!(row.len(), 3);
        }
        assert_eq!(table.rows[0].get("c"), Some(&FieldValue::Text(String::new())));
        assert_eq!(table.rows[1].get("c"), Some(&FieldValue::Number(6.0)));
    }

    #[test]
    fn test_parse_table_skips_blank_lines_and_handles_crlf() {
        let table = parse_table("sym,net_profit\r\n\r\nEURUSD,10.5\r\n\nGBPUSD,-3\r\n");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].get("net_profit"), Some(&FieldValue::Number(10.5)));
        assert_eq!(table.rows[1].get("sym"), Some(&FieldValue::from("GBPUSD")));
    }

    #[test]
    fn test_parse_table_needs_two_lines() {
        assert!(parse_table("").is_empty());
        assert!(parse_table("a,b,c\n").is_empty());
        assert!(parse_table("\n\n a,b \n\n").is_empty());
    }

    #[test]
    fn test_parse_table_strips_bom_and_trims_headers() {
        let table = parse_table("\u{FEFF}symbol , timeframe\nEURUSD,H1");
        assert_eq!(table.headers, vec!["symbol", "timeframe"]);
        assert_eq!(table.rows[0].get("symbol"), Some(&FieldValue::from("EURUSD")));
    }

    #[test]
    fn test_coercion_rules() {
        let table = parse_table(
            "passed,trades,best_params,note,flag\nTrue, 42 ,\"{sl_atr_mult: 1.5}\",true,False",
        );
        let row = &table.rows[0];
        assert_eq!(row.get("passed"), Some(&FieldValue::Bool(true)));
        assert_eq!(row.get("trades"), Some(&FieldValue::Number(42.0)));
        assert_eq!(
            row.get("best_params"),
            Some(&FieldValue::from("{sl_atr_mult: 1.5}"))
        );
        assert_eq!(row.get("note"), Some(&FieldValue::from("true")));
        assert_eq!(row.get("flag"), Some(&FieldValue::Bool(false)));
    }

    #[test]
    fn test_best_params_stays_text_even_when_numeric() {
        assert_eq!(coerce_value("best_params", "1.5"), FieldValue::from("1.5"));
        assert_eq!(coerce_value("sl_atr_mult", "1.5"), FieldValue::Number(1.5));
    }
}
