//! Named output subsets.

use crate::fields::*;
use sf_core::Derived;
use sf_records::{GroupDef, PredicateDef, Record, UseCase, ALL_GROUP};

/// Numeric test on a single field; absent values never match except for
/// presence tests.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    NonZero,
    Positive,
    NotNull,
    AbsAbove(f64),
    Between(f64, f64),
}

impl Predicate {
    pub fn matches(&self, value: Derived) -> bool {
        let Some(v) = value else {
            return false;
        };
        match *self {
            Predicate::NonZero => v != 0.0,
            Predicate::Positive => v > 0.0,
            Predicate::NotNull => true,
            Predicate::AbsAbove(t) => v.abs() > t,
            Predicate::Between(lo, hi) => lo <= v && v <= hi,
        }
    }
}

impl From<&PredicateDef> for Predicate {
    fn from(def: &PredicateDef) -> Self {
        match *def {
            PredicateDef::NonZero => Predicate::NonZero,
            PredicateDef::Positive => Predicate::Positive,
            PredicateDef::NotNull => Predicate::NotNull,
            PredicateDef::AbsAbove { threshold } => Predicate::AbsAbove(threshold),
            PredicateDef::Between { min, max } => Predicate::Between(min, max),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupFilter {
    pub name: String,
    pub field: String,
    pub predicate: Predicate,
}

impl GroupFilter {
    pub fn new(name: impl Into<String>, field: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            predicate,
        }
    }

    pub fn accepts(&self, record: &Record) -> bool {
        self.predicate.matches(record.lookup(&self.field))
    }
}

impl From<&GroupDef> for GroupFilter {
    fn from(def: &GroupDef) -> Self {
        GroupFilter::new(def.name.clone(), def.field.clone(), (&def.predicate).into())
    }
}

/// Groups in declaration order, `all` first.
#[derive(Debug, Clone, PartialEq)]
pub struct Groups<'r> {
    groups: Vec<(String, Vec<&'r Record>)>,
}

impl<'r> Groups<'r> {
    pub fn get(&self, name: &str) -> Option<&[&'r Record]> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, members)| members.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'r Record])> {
        self.groups.iter().map(|(n, m)| (n.as_str(), m.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RangeGrouper {
    filters: Vec<GroupFilter>,
}

impl RangeGrouper {
    pub fn new(filters: Vec<GroupFilter>) -> Self {
        Self { filters }
    }

    pub fn from_defs(defs: &[GroupDef]) -> Self {
        Self::new(defs.iter().map(GroupFilter::from).collect())
    }

    /// Default groups for a use case. Event-style outputs only get `all`.
    pub fn for_use_case(use_case: UseCase) -> Self {
        let filters = match use_case {
            UseCase::Attemperator | UseCase::Desuperheater => vec![
                GroupFilter::new("water-steam-ratio", WATER_STEAM_RATIO, Predicate::Positive),
                GroupFilter::new(
                    "outlet-steam-superheat",
                    OUTLET_STEAM_SUPERHEAT,
                    Predicate::Positive,
                ),
                GroupFilter::new("excess-water-per", EXCESS_WATER_PER, Predicate::Positive),
            ],
            UseCase::ValvePerformance => vec![
                GroupFilter::new(
                    "valve-position",
                    ABS_VALUE_POSITION_CHANGE,
                    Predicate::Positive,
                ),
                GroupFilter::new(
                    "demand-feedback",
                    ABS_DEMAND_FEEDBACK_DELTA,
                    Predicate::Positive,
                ),
                GroupFilter::new("stroke-speed", VALVE_STROKE_SPEED, Predicate::Positive),
                GroupFilter::new("magnitude-cycle", CYCLE_MAGNITUDE, Predicate::NotNull),
            ],
            UseCase::Classification | UseCase::TemperatureOverlay => Vec::new(),
        };
        Self::new(filters)
    }

    pub fn filters(&self) -> &[GroupFilter] {
        &self.filters
    }

    pub fn group<'r>(&self, records: &'r [Record]) -> Groups<'r> {
        let mut groups = Vec::with_capacity(self.filters.len() + 1);
        groups.push((ALL_GROUP.to_string(), records.iter().collect()));
        for filter in &self.filters {
            let members = records.iter().filter(|r| filter.accepts(r)).collect();
            groups.push((filter.name.clone(), members));
        }
        Groups { groups }
    }
}
