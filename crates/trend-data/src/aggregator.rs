//! Counting aggregations over a [`Dataset`].

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use trend_core::models::{Dataset, INSTRUMENT_COLUMN};

/// Count each distinct text value of `column`.
///
/// Ordered by descending count; ties keep first-seen order.  Missing values
/// are not counted.  Returns `None` when the dataset has no such column.
pub fn value_counts(dataset: &Dataset, column: &str) -> Option<Vec<(String, usize)>> {
    if !dataset.has_column(column) {
        return None;
    }

    let labels = dataset.records().iter().filter_map(|record| {
        let value = record.get(column)?;
        match (value.as_text(), value.as_f64()) {
            (Some(text), _) => Some(text.to_string()),
            (None, Some(n)) => Some(n.to_string()),
            (None, None) => None,
        }
    });
    Some(count_descending(labels))
}

/// Count records per calendar date whose `status` is not `pass_status`.
///
/// A record with a missing status counts as a failure.  Every date present
/// in the data gets an entry, zero when nothing failed that day; the result
/// is sorted by date.  Returns `None` when the dataset has no `status`
/// column.
pub fn daily_failures(dataset: &Dataset, pass_status: &str) -> Option<Vec<(NaiveDate, usize)>> {
    if !dataset.has_column("status") {
        return None;
    }

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in dataset.records() {
        let day = per_day.entry(record.timestamp.date_naive()).or_insert(0);
        if record.text("status") != Some(pass_status) {
            *day += 1;
        }
    }
    Some(per_day.into_iter().collect())
}

/// Count records per instrument whose `level` is one of `levels`.
///
/// Ordered like [`value_counts`].  Empty when no record matches.
pub fn alert_counts_by_instrument(dataset: &Dataset, levels: &[String]) -> Vec<(String, usize)> {
    let instruments = dataset
        .records()
        .iter()
        .filter(|r| r.text("level").is_some_and(|l| levels.iter().any(|a| a == l)))
        .filter_map(|r| r.text(INSTRUMENT_COLUMN).map(str::to_string));
    count_descending(instruments)
}

fn count_descending(labels: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for label in labels {
        let entry = counts.entry(label.clone()).or_insert(0);
        if *entry == 0 {
            order.push(label);
        }
        *entry += 1;
    }

    let mut result: Vec<(String, usize)> = order
        .into_iter()
        .map(|label| {
            let count = counts[&label];
            (label, count)
        })
        .collect();
    // Stable sort keeps first-seen order within equal counts.
    result.sort_by(|a, b| b.1.cmp(&a.1));
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
