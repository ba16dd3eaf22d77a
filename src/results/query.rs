// src/results/query.rs
// Filtering, sorting and headline numbers over an aggregated collection.
// Mirrors the dashboard's filter bar, sortable table and summary cards.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::{FieldValue, ResultRecord};

const ALL: &str = "all";

/// Query string accepted by the results endpoints.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ResultQuery {
    #[serde(rename = "type")]
    pub run_type: Option<String>,
    pub symbol: Option<String>,
    pub strategy: Option<String>,
    pub prop: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl ResultQuery {
    pub fn filter(&self) -> ResultFilter {
        fn constraint(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty() && *v != ALL)
                .map(str::to_string)
        }

        ResultFilter {
            run_type: constraint(&self.run_type),
            symbol: constraint(&self.symbol),
            strategy: constraint(&self.strategy),
            prop: match self.prop.as_deref().map(str::trim) {
                Some("passed") => PropFilter::Passed,
                Some("failed") => PropFilter::Failed,
                _ => PropFilter::All,
            },
        }
    }

    pub fn sort_spec(&self) -> Option<SortSpec> {
        let key = self.sort.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        let order = match self.order.as_deref().map(str::trim) {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        Some(SortSpec {
            key: key.to_string(),
            order,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropFilter {
    #[default]
    All,
    Passed,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultFilter {
    pub run_type: Option<String>,
    pub symbol: Option<String>,
    pub strategy: Option<String>,
    pub prop: PropFilter,
}

fn field_matches(record: &ResultRecord, key: &str, wanted: &Option<String>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => record
            .value_of(key)
            .map_or(false, |v| v.to_display() == *wanted),
    }
}

impl ResultFilter {
    pub fn matches(&self, record: &ResultRecord) -> bool {
        if let Some(wanted) = &self.run_type {
            if record.run_type.as_str() != wanted {
                return false;
            }
        }
        if !field_matches(record, "symbol", &self.symbol)
            || !field_matches(record, "strategy", &self.strategy)
        {
            return false;
        }

        let passed = record
            .field("prop_firm_passed")
            .map_or(false, FieldValue::is_truthy);
        match self.prop {
            PropFilter::All => true,
            PropFilter::Passed => passed,
            PropFilter::Failed => !passed,
        }
    }

    pub fn apply(&self, records: Vec<ResultRecord>) -> Vec<ResultRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub key: String,
    pub order: SortOrder,
}

/// Numbers (booleans as 0/1) sort ahead of text; numbers compare
/// numerically and text lexically, so mixed columns still get a total order.
/// Missing values sort as `0`.
fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Text(x), FieldValue::Text(y)) => x.cmp(y),
        (FieldValue::Text(_), _) => Ordering::Greater,
        (_, FieldValue::Text(_)) => Ordering::Less,
        _ => {
            let x = a.to_number().unwrap_or(f64::NAN);
            let y = b.to_number().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
    }
}

impl SortSpec {
    /// Stable sort, so rows with equal keys keep their file order.
    pub fn apply(&self, records: &mut [ResultRecord]) {
        let zero = FieldValue::Number(0.0);
        records.sort_by(|a, b| {
            let va = a.value_of(&self.key).unwrap_or_else(|| zero.clone());
            let vb = b.value_of(&self.key).unwrap_or_else(|| zero.clone());
            let ordering = compare_values(&va, &vb);
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

/// Filter then sort, as the results endpoint does.
pub fn select(records: Vec<ResultRecord>, query: &ResultQuery) -> Vec<ResultRecord> {
    let mut selected = query.filter().apply(records);
    if let Some(spec) = query.sort_spec() {
        spec.apply(&mut selected);
    }
    selected
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BucketCount {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub total_configs: usize,
    pub best_profit: f64,
    pub avg_win_rate: f64,
    pub prop_firm_pass_rate: f64,
    pub avg_sharpe: f64,
    pub profit_by_symbol: Vec<GroupTotal>,
    pub profit_by_timeframe: Vec<GroupTotal>,
    pub trade_count_buckets: Vec<BucketCount>,
}

fn number_or_zero(record: &ResultRecord, key: &str) -> f64 {
    record
        .field(key)
        .and_then(FieldValue::as_f64)
        .filter(|n| !n.is_nan())
        .unwrap_or(0.0)
}

fn add_to_group(groups: &mut Vec<GroupTotal>, key: String, amount: f64) {
    match groups.iter_mut().find(|g| g.key == key) {
        Some(group) => group.total += amount,
        None => groups.push(GroupTotal { key, total: amount }),
    }
}

fn trade_bucket(trades: f64) -> usize {
    if trades <= 5.0 {
        0
    } else if trades <= 10.0 {
        1
    } else if trades <= 20.0 {
        2
    } else if trades <= 50.0 {
        3
    } else {
        4
    }
}

const TRADE_BUCKET_LABELS: [&str; 5] = ["0-5", "6-10", "11-20", "21-50", "50+"];

pub fn summarize(records: &[ResultRecord]) -> ResultSummary {
    let mut profit_by_symbol = Vec::new();
    let mut profit_by_timeframe = Vec::new();
    let mut buckets = [0usize; 5];

    let mut best_profit = f64::NEG_INFINITY;
    let mut win_rate_sum = 0.0;
    let mut sharpe_sum = 0.0;
    let mut passed = 0usize;

    for record in records {
        let profit = number_or_zero(record, "net_profit");
        best_profit = best_profit.max(profit);
        win_rate_sum += number_or_zero(record, "win_rate");
        sharpe_sum += number_or_zero(record, "sharpe_ratio");
        if record
            .field("prop_firm_passed")
            .map_or(false, FieldValue::is_truthy)
        {
            passed += 1;
        }

        let group_key = |key: &str| {
            record
                .value_of(key)
                .map(|v| v.to_display())
                .unwrap_or_else(|| "-".to_string())
        };
        add_to_group(&mut profit_by_symbol, group_key("symbol"), profit);
        add_to_group(&mut profit_by_timeframe, group_key("timeframe"), profit);

        buckets[trade_bucket(number_or_zero(record, "total_trades"))] += 1;
    }

    let total = records.len();
    let average = |sum: f64| if total == 0 { 0.0 } else { sum / total as f64 };

    ResultSummary {
        total_configs: total,
        best_profit: if total == 0 { 0.0 } else { best_profit },
        avg_win_rate: average(win_rate_sum),
        prop_firm_pass_rate: average(passed as f64 * 100.0),
        avg_sharpe: average(sharpe_sum),
        profit_by_symbol,
        profit_by_timeframe,
        trade_count_buckets: TRADE_BUCKET_LABELS
            .into_iter()
            .zip(buckets)
            .map(|(label, count)| BucketCount { label, count })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldMap, RunType};

    fn record(run_type: RunType, fields: Vec<(&str, FieldValue)>) -> ResultRecord {
        ResultRecord {
            fields: fields.into_iter().collect::<FieldMap>(),
            source_file: "parallel_results_1.csv".to_string(),
            run_timestamp: "1".to_string(),
            run_type,
            archived: false,
        }
    }

    fn sample() -> Vec<ResultRecord> {
        vec![
            record(
                RunType::Parallel,
                vec![
                    ("strategy", "ema".into()),
                    ("symbol", "EURUSD".into()),
                    ("timeframe", "H1".into()),
                    ("net_profit", 100.0.into()),
                    ("win_rate", 60.0.into()),
                    ("sharpe_ratio", 1.5.into()),
                    ("total_trades", 12.0.into()),
                    ("prop_firm_passed", true.into()),
                ],
            ),
            record(
                RunType::Parallel,
                vec![
                    ("strategy", "rsi".into()),
                    ("symbol", "GBPUSD".into()),
                    ("timeframe", "H1".into()),
                    ("net_profit", (-40.0).into()),
                    ("win_rate", 40.0.into()),
                    ("sharpe_ratio", 0.5.into()),
                    ("total_trades", 3.0.into()),
                    ("prop_firm_passed", false.into()),
                ],
            ),
            record(
                RunType::Renko,
                vec![
                    ("symbol", "EURUSD".into()),
                    ("timeframe", "Renko_500".into()),
                    ("total_trades", 75.0.into()),
                ],
            ),
        ]
    }

    #[test]
    fn test_filter_by_type_symbol_and_prop() {
        let query = ResultQuery {
            run_type: Some("Parallel".to_string()),
            symbol: Some("all".to_string()),
            prop: Some("passed".to_string()),
            ..Default::default()
        };
        let selected = select(sample(), &query);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].field("strategy"), Some(&FieldValue::from("ema")));

        let query = ResultQuery {
            symbol: Some("EURUSD".to_string()),
            prop: Some("failed".to_string()),
            ..Default::default()
        };
        let selected = select(sample(), &query);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].run_type, RunType::Renko);
    }

    #[test]
    fn test_sort_numeric_desc_treats_missing_as_zero() {
        let query = ResultQuery {
            sort: Some("net_profit".to_string()),
            order: Some("desc".to_string()),
            ..Default::default()
        };
        let selected = select(sample(), &query);
        let profits: Vec<f64> = selected
            .iter()
            .map(|r| number_or_zero(r, "net_profit"))
            .collect();
        assert_eq!(profits, vec![100.0, 0.0, -40.0]);
    }

    #[test]
    fn test_sort_text_ascending() {
        let query = ResultQuery {
            sort: Some("symbol".to_string()),
            ..Default::default()
        };
        let selected = select(sample(), &query);
        let symbols: Vec<String> = selected
            .iter()
            .map(|r| r.value_of("symbol").unwrap().to_display())
            .collect();
        assert_eq!(symbols, vec!["EURUSD", "EURUSD", "GBPUSD"]);
        // stable: the Parallel EURUSD row stays ahead of the Renko one
        assert_eq!(selected[0].run_type, RunType::Parallel);
    }

    #[test]
    fn test_sort_mixed_column_puts_numbers_before_text() {
        let values: Vec<FieldValue> = vec![
            "n/a".into(),
            5.0.into(),
            true.into(),
            "abc".into(),
            (-2.0).into(),
            "n/a".into(),
            0.5.into(),
        ];
        let mut records: Vec<ResultRecord> = (0..60)
            .map(|i| record(RunType::Parallel, vec![("score", values[i % values.len()].clone())]))
            .collect();

        let spec = SortSpec {
            key: "score".to_string(),
            order: SortOrder::Asc,
        };
        spec.apply(&mut records);

        let sorted: Vec<FieldValue> = records.iter().map(|r| r.field("score").unwrap().clone()).collect();
        for pair in sorted.windows(2) {
            assert_ne!(compare_values(&pair[0], &pair[1]), Ordering::Greater, "{:?}", pair);
        }
        assert_eq!(sorted.first(), Some(&FieldValue::Number(-2.0)));
        assert_eq!(sorted.last(), Some(&FieldValue::from("n/a")));

        assert_eq!(
            compare_values(&FieldValue::from("n/a"), &FieldValue::Number(5.0)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&FieldValue::Number(5.0), &FieldValue::from("n/a")),
            Ordering::Less
        );
    }

    #[test]
    fn test_summary_numbers() {
        let summary = summarize(&sample());
        assert_eq!(summary.total_configs, 3);
        assert_eq!(summary.best_profit, 100.0);
        assert!((summary.avg_win_rate - 100.0 / 3.0).abs() < 1e-9);
        assert!((summary.prop_firm_pass_rate - 100.0 / 3.0).abs() < 1e-9);
        assert!((summary.avg_sharpe - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            summary.profit_by_symbol,
            vec![
                GroupTotal { key: "EURUSD".to_string(), total: 100.0 },
                GroupTotal { key: "GBPUSD".to_string(), total: -40.0 },
            ]
        );
        assert_eq!(summary.profit_by_timeframe[0].total, 60.0);
        let counts: Vec<usize> = summary.trade_count_buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_configs, 0);
        assert_eq!(summary.best_profit, 0.0);
        assert_eq!(summary.prop_firm_pass_rate, 0.0);
    }
}
