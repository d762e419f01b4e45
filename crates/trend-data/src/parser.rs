//! Line parser for `<timestamp>,<level>,<instrument_id>,<message>` logs.
//!
//! A line is split on its first three commas only; whatever follows is the
//! message, which may itself contain commas.  The message is then scanned for
//! `key=value` tokens.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

/// One log line split into its four parts plus the `key=value` fields found
/// in the message.  The timestamp is still raw text at this stage.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub timestamp: String,
    pub level: String,
    pub instrument_id: String,
    pub message: String,
    /// `None` marks a key whose value did not parse as a float.
    pub fields: BTreeMap<String, Option<f64>>,
}

/// Parse one line.  Leading and trailing whitespace is ignored.
///
/// Returns `None` for lines that do not have four comma-separated parts with
/// non-empty timestamp, level, instrument id and message.
pub fn parse_line(line: &str) -> Option<LogLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut parts = line.splitn(4, ',');
    let timestamp = parts.next()?;
    let level = parts.next()?;
    let instrument_id = parts.next()?;
    let message = parts.next()?;

    if [timestamp, level, instrument_id, message]
        .iter()
        .any(|p| p.is_empty())
    {
        return None;
    }

    Some(LogLine {
        timestamp: timestamp.to_string(),
        level: level.to_string(),
        instrument_id: instrument_id.to_string(),
        message: message.to_string(),
        fields: parse_message(message),
    })
}

/// Extract `key=value` pairs from a message.
///
/// Tokens are separated by runs of whitespace and/or commas.  A token is split
/// at its first `=`; the value is parsed as `f64` and recorded as `None` when
/// that fails (or yields NaN).  Later duplicates of a key replace earlier ones.
pub fn parse_message(message: &str) -> BTreeMap<String, Option<f64>> {
    let mut fields = BTreeMap::new();
    if !message.contains('=') {
        return fields;
    }

    for token in token_separator().split(message.trim()) {
        let Some((key, raw)) = token.split_once('=') else {
            continue;
        };
        let value = raw.parse::<f64>().ok().filter(|v| !v.is_nan());
        fields.insert(key.to_string(), value);
    }

    fields
}

fn token_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[\s,]+").expect("token separator regex is valid"))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
