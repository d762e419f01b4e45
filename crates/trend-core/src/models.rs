use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the column every source must carry.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// Name of the column used by the instrument filter.
pub const INSTRUMENT_COLUMN: &str = "instrument_id";

// ── FieldValue ────────────────────────────────────────────────────────────────

/// One cell of a [`Record`].
///
/// `Missing` means the key is present but carries no usable value (JSON
/// `null`, an empty CSV cell, an unparsable `key=value` token).  A key that is
/// not in the record at all is "absent", which is a different condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Missing,
}

impl FieldValue {
    /// Build a numeric value, folding NaN into [`FieldValue::Missing`].
    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            FieldValue::Missing
        } else {
            FieldValue::Number(value)
        }
    }

    /// Build a numeric value from an optional float.
    pub fn from_optional(value: Option<f64>) -> Self {
        value.map(Self::number).unwrap_or(FieldValue::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// A single observation: a parsed timestamp plus arbitrary named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// UTC timestamp of the observation.  Records without one are never built.
    pub timestamp: DateTime<Utc>,
    /// Every other field, keyed by column name.
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style insert, handy in tests and loaders.
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Text value of `name`, or `None` when absent, missing or numeric.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Numeric value of `name`, or `None` when absent, missing or textual.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(FieldValue::as_f64)
    }
}

// ── MetricSeries ──────────────────────────────────────────────────────────────

/// A named numeric field extracted from a [`Dataset`] over time.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    pub name: String,
    /// `(timestamp, value)` pairs; `None` marks a present-but-unusable value.
    pub points: Vec<(DateTime<Utc>, Option<f64>)>,
}

impl MetricSeries {
    /// Points whose value parsed, in the original order.
    pub fn valid_points(&self) -> Vec<(DateTime<Utc>, f64)> {
        self.points
            .iter()
            .filter_map(|(ts, v)| v.map(|v| (*ts, v)))
            .collect()
    }

    /// Non-null values only.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().filter_map(|(_, v)| *v).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ── Dataset ───────────────────────────────────────────────────────────────────

/// An ordered collection of [`Record`]s read from one input file.
///
/// `columns` lists every field name seen in the source, in source order, so a
/// column can exist even when every one of its values is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
    columns: Vec<String>,
}

impl Dataset {
    pub fn new(records: Vec<Record>, columns: Vec<String>) -> Self {
        Self { records, columns }
    }

    /// Build a dataset whose column list is derived from the records.
    /// Records are scanned in order; keys within one record come in
    /// alphabetical order, since [`Record::fields`] is sorted.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.fields.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        Self { records, columns }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `true` when the source declared `name`, or the name is `timestamp`.
    pub fn has_column(&self, name: &str) -> bool {
        name == TIMESTAMP_COLUMN || self.columns.iter().any(|c| c == name)
    }

    /// Keep only records for which `keep` returns `true`.  Columns survive.
    pub fn retain<F>(self, mut keep: F) -> Self
    where
        F: FnMut(&Record) -> bool,
    {
        let records = self.records.into_iter().filter(|r| keep(r)).collect();
        Self {
            records,
            columns: self.columns,
        }
    }

    /// Stable sort by timestamp, ascending.
    pub fn sort_by_timestamp(&mut self) {
        self.records.sort_by_key(|r| r.timestamp);
    }

    /// Extract `name` as a time series.  Records where `name` is absent are
    /// skipped; records where it is missing or non-numeric yield `None`.
    pub fn metric_series(&self, name: &str) -> MetricSeries {
        let points = self
            .records
            .iter()
            .filter_map(|r| r.get(name).map(|v| (r.timestamp, v.as_f64())))
            .collect();
        MetricSeries {
            name: name.to_string(),
            points,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 10, minute, 0).unwrap()
    }

    #[test]
    fn test_field_value_number_folds_nan() {
        assert_eq!(FieldValue::number(f64::NAN), FieldValue::Missing);
        assert_eq!(FieldValue::number(1.5), FieldValue::Number(1.5));
        assert_eq!(FieldValue::from_optional(None), FieldValue::Missing);
    }

    #[test]
    fn test_field_value_accessors() {
        assert_eq!(FieldValue::Number(2.0).as_f64(), Some(2.0));
        assert_eq!(FieldValue::Text("x".into()).as_f64(), None);
        assert_eq!(FieldValue::Text("x".into()).as_text(), Some("x"));
        assert_eq!(FieldValue::Missing.as_text(), None);
    }

    #[test]
    fn test_record_accessors() {
        let record = Record::new(ts(0))
            .with_field("status", FieldValue::Text("PASS".into()))
            .with_field("value", FieldValue::Number(101.3));
        assert_eq!(record.text("status"), Some("PASS"));
        assert_eq!(record.number("value"), Some(101.3));
        assert_eq!(record.number("status"), None);
        assert!(record.get("absent").is_none());
    }

    #[test]
    fn test_dataset_from_records_collects_columns_in_order() {
        let records = vec![
            Record::new(ts(0)).with_field("b", FieldValue::Missing),
            Record::new(ts(1))
                .with_field("a", FieldValue::Number(1.0))
                .with_field("b", FieldValue::Number(2.0)),
        ];
        let dataset = Dataset::from_records(records);
        assert_eq!(dataset.columns(), &["b".to_string(), "a".to_string()]);
        assert!(dataset.has_column("a"));
        assert!(dataset.has_column("timestamp"));
        assert!(!dataset.has_column("c"));
    }

    #[test]
    fn test_dataset_sort_by_timestamp_is_stable() {
        let records = vec![
            Record::new(ts(5)).with_field("n", FieldValue::Number(1.0)),
            Record::new(ts(1)).with_field("n", FieldValue::Number(2.0)),
            Record::new(ts(5)).with_field("n", FieldValue::Number(3.0)),
        ];
        let mut dataset = Dataset::from_records(records);
        dataset.sort_by_timestamp();
        let order: Vec<f64> = dataset
            .records()
            .iter()
            .filter_map(|r| r.number("n"))
            .collect();
        assert_eq!(order, vec![2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_metric_series_distinguishes_absent_and_missing() {
        let records = vec![
            Record::new(ts(0)).with_field("p", FieldValue::Number(1.0)),
            Record::new(ts(1)).with_field("p", FieldValue::Missing),
            Record::new(ts(2)),
        ];
        let series = Dataset::from_records(records).metric_series("p");
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.values(), vec![1.0]);
        assert_eq!(series.valid_points(), vec![(ts(0), 1.0)]);
    }

    #[test]
    fn test_retain_keeps_columns() {
        let records = vec![Record::new(ts(0)).with_field("x", FieldValue::Number(1.0))];
        let dataset = Dataset::from_records(records).retain(|_| false);
        assert!(dataset.is_empty());
        assert!(dataset.has_column("x"));
    }
}
