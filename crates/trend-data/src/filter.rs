use tracing::debug;
use trend_core::error::{AnalyzerError, Result};
use trend_core::models::{Dataset, INSTRUMENT_COLUMN};

/// Keep only the records whose `instrument_id` equals `instrument` exactly.
///
/// Filtering a dataset without an `instrument_id` column is an error rather
/// than a no-op, and so is a filter that matches nothing.
pub fn filter_by_instrument(dataset: Dataset, instrument: &str) -> Result<Dataset> {
    if !dataset.has_column(INSTRUMENT_COLUMN) {
        return Err(AnalyzerError::MissingColumn(
            "No 'instrument_id' column in data to filter on.".to_string(),
        ));
    }

    let before = dataset.len();
    let filtered = dataset.retain(|r| r.text(INSTRUMENT_COLUMN) == Some(instrument));
    debug!(
        "Instrument filter '{}': {} of {} records kept",
        instrument,
        filtered.len(),
        before
    );

    if filtered.is_empty() {
        return Err(AnalyzerError::EmptyDataset(format!(
            "No data after filtering on instrument_id={}",
            instrument
        )));
    }
    Ok(filtered)
}

/// Apply [`filter_by_instrument`] when an instrument was requested.
pub fn apply_instrument_filter(dataset: Dataset, instrument: Option<&str>) -> Result<Dataset> {
    match instrument {
        Some(id) => filter_by_instrument(dataset, id),
        None => Ok(dataset),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use trend_core::models::{FieldValue, Record};

    fn dataset() -> Dataset {
        let ts = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
        let records = vec![
            Record::new(ts).with_field(INSTRUMENT_COLUMN, FieldValue::Text("IVD-001".into())),
            Record::new(ts).with_field(INSTRUMENT_COLUMN, FieldValue::Text("IVD-002".into())),
            Record::new(ts).with_field(INSTRUMENT_COLUMN, FieldValue::Missing),
            Record::new(ts).with_field(INSTRUMENT_COLUMN, FieldValue::Text("IVD-001".into())),
        ];
        Dataset::from_records(records)
    }

    #[test]
    fn test_filter_keeps_exact_matches() {
        let filtered = filter_by_instrument(dataset(), "IVD-001").unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered
            .records()
            .iter()
            .all(|r| r.text(INSTRUMENT_COLUMN) == Some("IVD-001")));
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        assert!(matches!(
            filter_by_instrument(dataset(), "ivd-001"),
            Err(AnalyzerError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_filter_no_match_is_empty_dataset() {
        let err = filter_by_instrument(dataset(), "IVD-999").unwrap_err();
        assert!(matches!(err, AnalyzerError::EmptyDataset(_)));
        assert!(err.to_string().contains("IVD-999"));
    }

    #[test]
    fn test_filter_without_column_is_missing_column() {
        let ts = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
        let data = Dataset::from_records(vec![
            Record::new(ts).with_field("value", FieldValue::Number(1.0))
        ]);
        assert!(matches!(
            filter_by_instrument(data, "IVD-001"),
            Err(AnalyzerError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_apply_without_instrument_is_noop() {
        let data = dataset();
        let out = apply_instrument_filter(data.clone(), None).unwrap();
        assert_eq!(out, data);
    }
}
