//! Record file loading and cleaning.
//!
//! A data file is a JSON array of row objects. Cleaning drops rows with an
//! unparseable timestamp, sorts ascending, keeps the first of any duplicate
//! timestamps and restricts columns to those named by the header mapping.

use crate::error::{AppError, AppResult};
use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};
use sf_records::{HeaderMapping, Record};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Timestamp in one of the accepted layouts; RFC 3339 offsets are folded to UTC.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Numeric cell; null, non-numeric text and other JSON types read as NaN.
fn cell_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => f64::NAN,
    }
}

fn row_to_record(
    row: &Map<String, Value>,
    time_column: &str,
    keep: &BTreeSet<&str>,
) -> Option<Record> {
    let timestamp = row.get(time_column)?.as_str().and_then(parse_timestamp)?;
    let mut record = Record::new(timestamp);
    for (column, value) in row.iter().filter(|(c, _)| c.as_str() != time_column) {
        record.set_raw(column.clone(), cell_value(value));
    }
    record.retain_columns(&|column: &str| keep.contains(column));
    Some(record)
}

/// Parse and clean rows from JSON text.
pub fn parse_records(json: &str, headers: &HeaderMapping, source: &Path) -> AppResult<Vec<Record>> {
    let rows: Vec<Map<String, Value>> =
        serde_json::from_str(json).map_err(|e| AppError::DataFormat {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;
    let time_column = headers.time_column()?;
    let keep: BTreeSet<&str> = headers.columns().collect();

    let total = rows.len();
    let mut records: Vec<Record> = rows
        .iter()
        .filter_map(|row| row_to_record(row, time_column, &keep))
        .collect();
    let parsed = records.len();

    records.sort_by_key(|r| r.timestamp);
    records.dedup_by_key(|r| r.timestamp);

    debug!(
        file = %source.display(),
        rows = total,
        dropped_timestamps = total - parsed,
        duplicates = parsed - records.len(),
        "records cleaned"
    );
    Ok(records)
}

/// Read and clean a device's data file.
pub fn load_records(path: &Path, headers: &HeaderMapping) -> AppResult<Vec<Record>> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::DataFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_records(&text, headers, path)
}
