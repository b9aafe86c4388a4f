//! Per-device thresholds and startup classification ranges.

use crate::error::{RecordsError, RecordsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata use-case ids and names as stored by the plant configuration.
pub mod names {
    pub const CLASSIFICATION_USE_CASE: &str = "4";
    pub const LOAD_THRESHOLD: &str = "CT load Threshold";

    pub const VALVE_USE_CASES: [&str; 2] = ["6", "7"];
    pub const VALVE_DEMAND_DEADBAND: &str = "Valve Demand";
    pub const VALVE_FEEDBACK_DEADBAND: &str = "Valve Feedback";
}

/// A stored metadata value. The store keeps most values as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Number(f64),
    Text(String),
}

impl MetaValue {
    fn as_number(&self) -> Option<f64> {
        match self {
            MetaValue::Number(v) => Some(*v),
            MetaValue::Text(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|v| v.is_finite())
    }

    fn display(&self) -> String {
        match self {
            MetaValue::Number(v) => v.to_string(),
            MetaValue::Text(s) => s.clone(),
        }
    }
}

/// use case id -> name -> value. Read-only during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataSet(BTreeMap<String, BTreeMap<String, MetaValue>>);

impl MetadataSet {
    pub fn insert(&mut self, use_case: &str, name: &str, value: MetaValue) {
        self.0
            .entry(use_case.to_string())
            .or_default()
            .insert(name.to_string(), value);
    }

    pub fn has_use_case(&self, use_case: &str) -> bool {
        self.0.contains_key(use_case)
    }

    /// Numeric value; missing or non-numeric entries are configuration gaps.
    pub fn number(&self, use_case: &str, name: &str) -> RecordsResult<f64> {
        let value = self
            .0
            .get(use_case)
            .and_then(|m| m.get(name))
            .ok_or_else(|| RecordsError::MissingMetadata {
                use_case: use_case.to_string(),
                key: name.to_string(),
            })?;
        value
            .as_number()
            .ok_or_else(|| RecordsError::MalformedMetadata {
                use_case: use_case.to_string(),
                key: name.to_string(),
                value: value.display(),
            })
    }

    /// First of `use_cases` present in the set.
    pub fn first_use_case<'u>(&self, use_cases: &[&'u str]) -> Option<&'u str> {
        use_cases.iter().copied().find(|u| self.has_use_case(u))
    }
}

/// Drum-pressure band mapped to a startup type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRange {
    #[serde(alias = "drumPressureMin")]
    pub drum_pressure_min: f64,
    #[serde(alias = "drumPressureMax")]
    pub drum_pressure_max: f64,
    #[serde(alias = "startupType")]
    pub startup_type: String,
}

impl ClassificationRange {
    pub fn contains(&self, pressure: f64) -> bool {
        self.drum_pressure_min <= pressure && pressure <= self.drum_pressure_max
    }
}

/// Ordered classification ranges; the first containing range wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationTable {
    ranges: Vec<ClassificationRange>,
}

impl ClassificationTable {
    pub fn new(ranges: Vec<ClassificationRange>) -> RecordsResult<Self> {
        if ranges.is_empty() {
            return Err(RecordsError::MissingClassification);
        }
        Ok(Self { ranges })
    }

    pub fn classify(&self, pressure: f64) -> Option<&str> {
        self.ranges
            .iter()
            .find(|r| r.contains(pressure))
            .map(|r| r.startup_type.as_str())
    }
}
