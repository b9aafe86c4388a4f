//! Logical-name to physical-column mapping.

use crate::error::{RecordsError, RecordsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known logical names.
pub mod keys {
    pub const TIME: &str = "time";
    pub const BAROMETRIC_PRESSURE: &str = "barometric-pressure";

    // classification / overlay
    pub const DRUM_PRESSURE: &str = "p1";
    pub const LOAD: &str = "l1";
    pub const FUEL_FLOW: &str = "f1";
    pub const METAL_TEMP: &str = "t1";

    // valve performance
    pub const VALVE_DEMAND: &str = "d1";
    pub const VALVE_FEEDBACK: &str = "f1";

    // attemperator / desuperheater
    pub const STEAM_PRESSURE: &str = "steam-pressure";
    pub const STEAM_INLET_PRESSURE: &str = "steam-inlet-pressure";
    pub const STEAM_OUTLET_PRESSURE: &str = "steam-outlet-pressure";
    pub const STEAM_INLET_TEMP: &str = "steam-inlet-temp";
    pub const STEAM_OUTLET_TEMP: &str = "steam-outlet-temp";
    pub const OUTLET_PRESSURE: &str = "outlet-pressure";
    pub const HRSG_OUTLET_TEMP: &str = "hrsg-outlet-temp";
    pub const SET_TEMP: &str = "set-temp";
    pub const DESUP_SET_TEMP: &str = "desp-set-temp";
    pub const DESUP_SET_ENTHALPY: &str = "desup-set-enthalpy";
    pub const WATER_INLET_PRESSURE: &str = "water-inlet-pressure";
    pub const WATER_INLET_TEMP: &str = "water-inlet-temp";
    pub const WATER_MASS_FLOW: &str = "water-mass-flow";
    pub const INLET_STEAM_MASS_FLOW: &str = "inlet-steam-mass-flow";
}

/// Fixed per device; never mutated during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderMapping(BTreeMap<String, String>);

impl HeaderMapping {
    pub fn new(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }

    /// Physical column for a logical name.
    pub fn column(&self, logical: &str) -> RecordsResult<&str> {
        self.optional(logical)
            .ok_or_else(|| RecordsError::MissingHeader {
                key: logical.to_string(),
            })
    }

    pub fn optional(&self, logical: &str) -> Option<&str> {
        self.0.get(logical).map(String::as_str)
    }

    pub fn time_column(&self) -> RecordsResult<&str> {
        self.column(keys::TIME)
    }

    /// Fail with the first logical name that is not mapped.
    pub fn require(&self, logical: &[&str]) -> RecordsResult<()> {
        logical.iter().try_for_each(|k| self.column(k).map(|_| ()))
    }

    /// Every physical column named by the mapping.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for HeaderMapping {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
