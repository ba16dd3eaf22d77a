// src/types.rs
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A single CSV cell after coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Empty text cell, the only "blank" a parsed row can hold.
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.is_empty())
    }

    /// Dashboard truthiness: `false`, `0`, NaN and empty text are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Bool(b) => *b,
            FieldValue::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric reading of the value, `None` when it is not a number at all.
    /// Booleans read as 1/0 and empty text as 0, like a browser's `Number()`.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    parse_js_number(trimmed)
                }
            }
        }
    }

    /// Text rendering used when a value is embedded in a label.
    pub fn to_display(&self) -> String {
        match self {
            FieldValue::Number(n) => format_plain_number(*n),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Parses text the way the results dashboard always has: plain decimal
/// notation with optional sign, fraction and exponent, plus the
/// `Infinity` literals. `NaN`, `inf` and radix prefixes are rejected.
pub fn parse_js_number(text: &str) -> Option<f64> {
    match text {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let only_numeric_chars = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !only_numeric_chars || !text.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    text.parse::<f64>().ok()
}

/// `500.0` -> `500`, `0.5` -> `0.5`, infinities spelled out. Magnitudes of
/// at least 1e21 or below 1e-6 switch to exponent form (`1e+21`, `1.5e-7`),
/// as the dashboard's own number rendering does.
pub fn format_plain_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => formatted,
        };
    }
    format!("{}", n)
}

/// Insertion-ordered field map. Rows keep their column order so the JSON
/// handed to the dashboard reads like the source CSV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Overwrites in place when the key exists, otherwise appends.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Present and not an empty text cell.
    pub fn has_value(&self, key: &str) -> bool {
        self.get(key).map_or(false, |v| !v.is_blank())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Which kind of optimization run produced a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunType {
    Parallel,
    Renko,
    /// A `type` tag carried by the row itself.
    Other(String),
}

impl RunType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Parallel" => RunType::Parallel,
            "Renko" => RunType::Renko,
            other => RunType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RunType::Parallel => "Parallel",
            RunType::Renko => "Renko",
            RunType::Other(tag) => tag.as_str(),
        }
    }
}

impl Serialize for RunType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One normalized result row. The core fields are guaranteed on every record;
/// everything else the source CSV carried lives in `fields`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResultRecord {
    #[serde(flatten)]
    pub fields: FieldMap,
    pub source_file: String,
    pub run_timestamp: String,
    #[serde(rename = "type")]
    pub run_type: RunType,
    pub archived: bool,
}

impl ResultRecord {
    /// Looks a field up by its dashboard name, core fields included.
    pub fn value_of(&self, key: &str) -> Option<FieldValue> {
        match key {
            "source_file" => Some(FieldValue::Text(self.source_file.clone())),
            "run_timestamp" => Some(FieldValue::Text(self.run_timestamp.clone())),
            "type" => Some(FieldValue::Text(self.run_type.as_str().to_string())),
            "archived" => Some(FieldValue::Bool(self.archived)),
            other => self.fields.get(other).cloned(),
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

/// Per-file listing entry returned by the runs endpoints.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunInfo {
    pub file: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub uploaded: String,
    pub url: String,
}

/// JSON envelope accepted by `POST /results`.
#[derive(Deserialize, Debug, Clone)]
pub struct UploadEnvelope {
    pub filename: Option<String>,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_js_number_accepts_decimal_forms() {
        assert_eq!(parse_js_number("42"), Some(42.0));
        assert_eq!(parse_js_number("-1.5"), Some(-1.5));
        assert_eq!(parse_js_number(".5"), Some(0.5));
        assert_eq!(parse_js_number("1e3"), Some(1000.0));
        assert_eq!(parse_js_number("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_parse_js_number_rejects_words() {
        assert_eq!(parse_js_number("NaN"), None);
        assert_eq!(parse_js_number("inf"), None);
        assert_eq!(parse_js_number("EURUSD"), None);
        assert_eq!(parse_js_number("1.2.3"), None);
        assert_eq!(parse_js_number("e5"), None);
        assert_eq!(parse_js_number("0x1A"), None);
    }

    #[test]
    fn test_field_map_keeps_insertion_order_and_overwrites_in_place() {
        let mut map = FieldMap::new();
        map.insert("b", FieldValue::from(1.0));
        map.insert("a", FieldValue::from("x"));
        map.insert("b", FieldValue::from(2.0));

        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(&FieldValue::Number(2.0)));
        assert_eq!(map.remove("a"), Some(FieldValue::from("x")));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_truthiness_matches_dashboard_rules() {
        assert!(!FieldValue::from(0.0).is_truthy());
        assert!(!FieldValue::from("").is_truthy());
        assert!(!FieldValue::from(false).is_truthy());
        assert!(FieldValue::from("False").is_truthy());
        assert!(FieldValue::from(0.01).is_truthy());
    }

    #[test]
    fn test_record_serializes_flat() {
        let mut fields = FieldMap::new();
        fields.insert("net_profit", FieldValue::from(125.5));
        let record = ResultRecord {
            fields,
            source_file: "parallel_results_1.csv".to_string(),
            run_timestamp: "1".to_string(),
            run_type: RunType::Parallel,
            archived: false,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["net_profit"], 125.5);
        assert_eq!(json["type"], "Parallel");
        assert_eq!(json["archived"], false);
        assert_eq!(json["run_timestamp"], "1");
    }

    #[test]
    fn test_plain_number_display() {
        assert_eq!(format_plain_number(500.0), "500");
        assert_eq!(format_plain_number(0.5), "0.5");
        assert_eq!(format_plain_number(-0.0), "0");
        assert_eq!(format_plain_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_plain_number_exponent_forms() {
        assert_eq!(format_plain_number(1e21), "1e+21");
        assert_eq!(format_plain_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_plain_number(1e-7), "1e-7");
        assert_eq!(format_plain_number(1.5e-7), "1.5e-7");
        assert_eq!(format_plain_number(1e20), "100000000000000000000");
        assert_eq!(format_plain_number(0.000001), "0.000001");
    }
}
