//! Format loaders: CSV, JSON and plain-text logs into a [`Dataset`].
//!
//! Every loader drops individual records whose timestamp does not parse and
//! keeps going; it fails only when the `timestamp` column is absent altogether
//! or when nothing is left after dropping.

use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};
use trend_core::error::{AnalyzerError, Result};
use trend_core::models::{Dataset, FieldValue, Record, INSTRUMENT_COLUMN, TIMESTAMP_COLUMN};
use trend_core::time_utils::TimestampParser;

use crate::parser::parse_line;

/// Fields every parsed log line carries besides its timestamp.
const LOG_BASE_COLUMNS: [&str; 3] = ["level", INSTRUMENT_COLUMN, "message"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a CSV file with a header row.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let file = open(path)?;
    let dataset = read_csv(file)?;
    debug!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Load a JSON file holding an array of flat objects.
pub fn load_json(path: &Path) -> Result<Dataset> {
    let file = open(path)?;
    let dataset = read_json(file)?;
    debug!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Load a plain-text log file, one entry per line.
pub fn load_log(path: &Path) -> Result<Dataset> {
    let file = open(path)?;
    let dataset = read_log(BufReader::new(file)).map_err(|e| match e {
        AnalyzerError::Io(source) => AnalyzerError::FileRead {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    debug!("Loaded {} records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Read CSV data from any reader.
///
/// A column is numeric when every non-empty cell parses as `f64`; numeric
/// columns produce [`FieldValue::Number`], the others [`FieldValue::Text`].
/// Empty cells become [`FieldValue::Missing`].
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let ts_idx = headers
        .iter()
        .position(|h| h == TIMESTAMP_COLUMN)
        .ok_or_else(|| {
            AnalyzerError::MissingColumn("CSV must contain a 'timestamp' column".to_string())
        })?;

    let rows: Vec<csv::StringRecord> = csv_reader
        .records()
        .collect::<std::result::Result<_, _>>()?;

    let numeric: Vec<bool> = (0..headers.len())
        .map(|idx| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .all(|cell| cell.parse::<f64>().is_ok())
        })
        .collect();

    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for row in &rows {
        let Some(timestamp) = row.get(ts_idx).and_then(TimestampParser::parse_str) else {
            dropped += 1;
            continue;
        };

        let mut record = Record::new(timestamp);
        for (idx, name) in headers.iter().enumerate() {
            if idx == ts_idx {
                continue;
            }
            let cell = row.get(idx).unwrap_or("");
            let value = if cell.trim().is_empty() {
                FieldValue::Missing
            } else if numeric[idx] {
                cell.trim()
                    .parse::<f64>()
                    .map(FieldValue::number)
                    .unwrap_or(FieldValue::Missing)
            } else {
                FieldValue::Text(cell.to_string())
            };
            record.insert(name.clone(), value);
        }
        records.push(record);
    }

    let columns = headers
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| *idx != ts_idx)
        .map(|(_, h)| h)
        .collect();

    finish(records, columns, rows.len(), dropped)
}

/// Read a JSON array of flat objects from any reader.
///
/// Columns are collected object by object; keys within one object come in
/// alphabetical order, as `serde_json` stores them.
pub fn read_json<R: Read>(mut reader: R) -> Result<Dataset> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let root: Value = serde_json::from_str(&text)?;

    let items = root.as_array().ok_or_else(|| {
        AnalyzerError::InvalidFormat("JSON must contain an array of objects".to_string())
    })?;

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let obj = item.as_object().ok_or_else(|| {
            AnalyzerError::InvalidFormat(format!("element {i} is not a JSON object"))
        })?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    if !columns.iter().any(|c| c == TIMESTAMP_COLUMN) {
        return Err(AnalyzerError::MissingColumn(
            "JSON must contain a 'timestamp' field".to_string(),
        ));
    }
    columns.retain(|c| c != TIMESTAMP_COLUMN);

    let mut records = Vec::with_capacity(objects.len());
    let mut dropped = 0usize;

    for obj in &objects {
        let Some(timestamp) = obj.get(TIMESTAMP_COLUMN).and_then(TimestampParser::parse_json)
        else {
            dropped += 1;
            continue;
        };

        let mut record = Record::new(timestamp);
        for (key, value) in obj.iter() {
            if key == TIMESTAMP_COLUMN {
                continue;
            }
            record.insert(key.clone(), json_to_field(value));
        }
        records.push(record);
    }

    finish(records, columns, objects.len(), dropped)
}

/// Read a plain-text log from any buffered reader.
///
/// Lines that do not have the `timestamp,level,instrument_id,message` shape
/// are skipped silently, as are lines that are not valid UTF-8.  Any other
/// read error aborts with [`AnalyzerError::Io`].  Fields extracted from the
/// message never replace the four base fields.
pub fn read_log<R: BufRead>(reader: R) -> Result<Dataset> {
    let mut columns: Vec<String> = LOG_BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
    let mut records = Vec::new();
    let mut parsed = 0usize;
    let mut skipped = 0usize;
    let mut dropped = 0usize;

    for line_result in reader.lines() {
        let line = match line_result {
            Ok(l) => l,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                debug!("Skipping unreadable log line: {}", e);
                skipped += 1;
                continue;
            }
            Err(e) => return Err(AnalyzerError::Io(e)),
        };
        if line.trim().is_empty() {
            continue;
        }

        let Some(entry) = parse_line(&line) else {
            skipped += 1;
            continue;
        };
        parsed += 1;

        let Some(timestamp) = TimestampParser::parse_str(&entry.timestamp) else {
            dropped += 1;
            continue;
        };

        let mut record = Record::new(timestamp)
            .with_field("level", FieldValue::Text(entry.level))
            .with_field(INSTRUMENT_COLUMN, FieldValue::Text(entry.instrument_id))
            .with_field("message", FieldValue::Text(entry.message));

        for (key, value) in entry.fields {
            if key == TIMESTAMP_COLUMN || LOG_BASE_COLUMNS.contains(&key.as_str()) {
                continue;
            }
            if !columns.iter().any(|c| *c == key) {
                columns.push(key.clone());
            }
            record.insert(key, FieldValue::from_optional(value));
        }
        records.push(record);
    }

    debug!("Log lines: {} parsed, {} skipped", parsed, skipped);

    if parsed == 0 {
        return Err(AnalyzerError::EmptyDataset(
            "No valid log lines parsed.".to_string(),
        ));
    }

    finish(records, columns, parsed, dropped)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn open(path: &Path) -> Result<File> {
    let file_read = |source: io::Error| AnalyzerError::FileRead {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(file_read)?;
    if file.metadata().map_err(file_read)?.is_dir() {
        return Err(file_read(io::Error::other("is a directory")));
    }
    Ok(file)
}

fn json_to_field(value: &Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Missing,
        Value::Number(n) => n.as_f64().map(FieldValue::number).unwrap_or(FieldValue::Missing),
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Bool(b) => FieldValue::Text(b.to_string()),
        other => FieldValue::Text(other.to_string()),
    }
}

/// Apply the shared "nothing left" rule and log how many rows were dropped.
fn finish(records: Vec<Record>, columns: Vec<String>, seen: usize, dropped: usize) -> Result<Dataset> {
    if dropped > 0 {
        warn!(
            "Dropped {} of {} records with an unparseable timestamp",
            dropped, seen
        );
    }
    if records.is_empty() {
        return Err(AnalyzerError::EmptyDataset(
            "no records with a valid timestamp".to_string(),
        ));
    }
    Ok(Dataset::new(records, columns))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
