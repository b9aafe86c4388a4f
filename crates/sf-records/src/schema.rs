//! Project schema definitions.

use crate::headers::HeaderMapping;
use crate::metadata::{ClassificationRange, MetadataSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atmospheric_pressure_psia: Option<f64>,
    #[serde(default)]
    pub classification: Vec<ClassificationRange>,
    #[serde(default)]
    pub devices: Vec<DeviceDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceDef {
    pub id: String,
    pub use_case: UseCase,
    /// Output tags identifying the device.
    #[serde(default)]
    pub identifier: BTreeMap<String, String>,
    pub headers: HeaderMapping,
    #[serde(default)]
    pub static_metadata: MetadataSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width_in: Option<f64>,
    /// Overrides the use case's default output groups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupDef>>,
    /// Cleaned record file for this device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum UseCase {
    /// Boiler attemperator enthalpy balance.
    Attemperator,
    /// Turbine desuperheater enthalpy balance.
    Desuperheater,
    /// Control-valve stroke cycles.
    ValvePerformance,
    /// Startup/shutdown events.
    Classification,
    /// Metal temperature around each startup.
    TemperatureOverlay,
}

impl UseCase {
    pub fn as_str(self) -> &'static str {
        match self {
            UseCase::Attemperator => "attemperator",
            UseCase::Desuperheater => "desuperheater",
            UseCase::ValvePerformance => "valve-performance",
            UseCase::Classification => "classification",
            UseCase::TemperatureOverlay => "temperature-overlay",
        }
    }
}

impl fmt::Display for UseCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named output subset selected by a numeric predicate on one field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupDef {
    pub name: String,
    pub field: String,
    pub predicate: PredicateDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum PredicateDef {
    /// value != 0
    NonZero,
    /// value > 0
    Positive,
    /// value present (not null)
    NotNull,
    /// |value| > threshold
    AbsAbove { threshold: f64 },
    /// min <= value <= max
    Between { min: f64, max: f64 },
}
