//! Projection of enriched records onto tagged time-series points.

use serde::Serialize;
use sf_records::Record;
use std::collections::BTreeMap;

/// Measurement name every point is written under.
pub const MEASUREMENT: &str = "e";
/// Tag naming the output group.
pub const GROUP_TAG: &str = "group";
/// Tag carrying the overlay label.
pub const STARTUP_LABEL_TAG: &str = "Startup Label";

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Float(f64),
    Text(String),
}

/// `{measurement, tags, fields, time}`; null fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub measurement: &'static str,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
    pub time: String,
}

/// Builds points for one device.
#[derive(Debug, Clone)]
pub struct Projector<'a> {
    identifier: &'a BTreeMap<String, String>,
    /// label field -> tag name; these labels become tags instead of fields.
    label_tags: Vec<(&'static str, &'static str)>,
}

impl<'a> Projector<'a> {
    pub fn new(identifier: &'a BTreeMap<String, String>) -> Self {
        Self {
            identifier,
            label_tags: Vec::new(),
        }
    }

    /// Promote a label to a tag.
    pub fn label_as_tag(mut self, label: &'static str, tag: &'static str) -> Self {
        self.label_tags.push((label, tag));
        self
    }

    pub fn point(&self, record: &Record, group: Option<&str>) -> Point {
        let mut tags = self.identifier.clone();
        if let Some(group) = group {
            tags.insert(GROUP_TAG.to_string(), group.to_string());
        }

        let mut fields = BTreeMap::new();
        for (column, value) in record.raw_values() {
            if value.is_finite() {
                fields.insert(column.to_string(), FieldValue::Float(value));
            }
        }
        for (name, value) in record.derived_fields() {
            if let Some(v) = value {
                fields.insert(name.to_string(), FieldValue::Float(v));
            }
        }
        for (name, text) in record.labels() {
            match self.label_tags.iter().find(|(label, _)| *label == name) {
                Some((_, tag)) => {
                    tags.insert((*tag).to_string(), text.to_string());
                }
                None => {
                    fields.insert(name.to_string(), FieldValue::Text(text.to_string()));
                }
            }
        }

        Point {
            measurement: MEASUREMENT,
            tags,
            fields,
            time: record.timestamp.format(TIME_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record() -> Record {
        let t = NaiveDate::from_ymd_opt(2024, 6, 30)
            .unwrap()
            .and_hms_opt(23, 59, 1)
            .unwrap();
        let mut r = Record::new(t).with("PT-1", 101.5).with("PT-2", f64::NAN);
        r.set("h", Some(1200.25));
        r.set("tsat", None);
        r.set_label("Label", "2024-6-30 Hot Start");
        r.set_label("Event-Type", "Startup");
        r
    }

    #[test]
    fn nulls_are_omitted() {
        let ident = BTreeMap::from([("site".to_string(), "north".to_string())]);
        let p = Projector::new(&ident).point(&record(), Some("all"));
        assert_eq!(p.measurement, "e");
        assert_eq!(p.time, "2024-06-30T23:59:01Z");
        assert_eq!(p.tags.get("group").map(String::as_str), Some("all"));
        assert_eq!(p.fields.get("PT-1"), Some(&FieldValue::Float(101.5)));
        assert!(!p.fields.contains_key("PT-2"));
        assert!(!p.fields.contains_key("tsat"));
        assert_eq!(
            p.fields.get("Event-Type"),
            Some(&FieldValue::Text("Startup".into()))
        );
    }

    #[test]
    fn labels_can_become_tags() {
        let ident = BTreeMap::new();
        let p = Projector::new(&ident)
            .label_as_tag("Label", STARTUP_LABEL_TAG)
            .point(&record(), None);
        assert_eq!(
            p.tags.get(STARTUP_LABEL_TAG).map(String::as_str),
            Some("2024-6-30 Hot Start")
        );
        assert!(!p.fields.contains_key("Label"));
        assert!(!p.tags.contains_key(GROUP_TAG));
    }

    #[test]
    fn serializes_flat_values() {
        let ident = BTreeMap::new();
        let p = Projector::new(&ident).point(&record(), None);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["fields"]["h"], serde_json::json!(1200.25));
        assert_eq!(json["fields"]["Event-Type"], serde_json::json!("Startup"));
    }
}
