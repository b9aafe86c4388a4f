//! One sensor sample and the fields enrichment adds to it.

use chrono::NaiveDateTime;
use sf_core::{finite_or_none, Derived};
use std::collections::BTreeMap;

/// A timestamped row: raw column values plus derived fields.
///
/// Raw values are keyed by *physical* column name and may be NaN.
/// Derived fields are keyed by field name and are finite or `None`.
/// Labels carry text fields (event type, startup label).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    values: BTreeMap<String, f64>,
    derived: BTreeMap<String, Derived>,
    labels: BTreeMap<String, String>,
}

impl Record {
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self {
            timestamp,
            values: BTreeMap::new(),
            derived: BTreeMap::new(),
            labels: BTreeMap::new(),
        }
    }

    /// Builder-style raw value insertion.
    pub fn with(mut self, column: impl Into<String>, value: f64) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    pub fn set_raw(&mut self, column: impl Into<String>, value: f64) {
        self.values.insert(column.into(), value);
    }

    /// Raw column value; an absent column reads as NaN.
    pub fn raw(&self, column: &str) -> f64 {
        self.values.get(column).copied().unwrap_or(f64::NAN)
    }

    pub fn has_raw(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn raw_values(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Keep only the listed columns.
    pub fn retain_columns(&mut self, keep: &dyn Fn(&str) -> bool) {
        self.values.retain(|k, _| keep(k));
    }

    /// Store a derived field; non-finite values become null.
    pub fn set(&mut self, field: impl Into<String>, value: Derived) {
        self.derived
            .insert(field.into(), value.and_then(finite_or_none));
    }

    pub fn set_value(&mut self, field: impl Into<String>, value: f64) {
        self.set(field, Some(value));
    }

    /// Derived field value; unknown fields read as null.
    pub fn get(&self, field: &str) -> Derived {
        self.derived.get(field).copied().flatten()
    }

    /// Derived field, or raw column of the same name, or null.
    pub fn lookup(&self, name: &str) -> Derived {
        match self.derived.get(name) {
            Some(v) => *v,
            None => finite_or_none(self.raw(name)),
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.derived.contains_key(field)
    }

    pub fn derived_fields(&self) -> impl Iterator<Item = (&str, Derived)> {
        self.derived.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn set_label(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.labels.insert(field.into(), value.into());
    }

    pub fn label(&self, field: &str) -> Option<&str> {
        self.labels.get(field).map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn absent_raw_reads_nan() {
        let rec = Record::new(t0()).with("PT-1", 12.0);
        assert_eq!(rec.raw("PT-1"), 12.0);
        assert!(rec.raw("PT-2").is_nan());
    }

    #[test]
    fn derived_non_finite_is_null() {
        let mut rec = Record::new(t0());
        rec.set_value("ratio", f64::INFINITY);
        rec.set_value("superheat", 4.5);
        assert!(rec.has_field("ratio"));
        assert_eq!(rec.get("ratio"), None);
        assert_eq!(rec.get("superheat"), Some(4.5));
        assert_eq!(rec.get("missing"), None);
    }

    #[test]
    fn lookup_prefers_derived() {
        let mut rec = Record::new(t0()).with("x", 1.0);
        assert_eq!(rec.lookup("x"), Some(1.0));
        rec.set("x", None);
        assert_eq!(rec.lookup("x"), None);
    }
}
