//! sf-enrich: row-sequential enrichment and event detection.
//!
//! Pipelines take a cleaned, time-ordered record sequence and add derived
//! fields in place:
//! - [`AttemperatorPipeline`] / [`DesuperheaterPipeline`]: enthalpy balances.
//! - [`ValvePipeline`]: stroke cycles via [`CycleDetector`].
//! - [`EventClassifier`]: startup/shutdown events from a load threshold.
//! - [`TemperatureOverlay`]: rows around each startup's first fire.
//!
//! [`RangeGrouper`] then splits the enriched rows into named output groups.

pub mod cycle;
pub mod engine;
pub mod enthalpy;
pub mod error;
pub mod events;
pub mod fields;
pub mod formulas;
pub mod grouping;
pub mod overlay;
pub mod turbine;
pub mod valve;

#[cfg(test)]
mod test_support;

pub use cycle::{
    CycleDetector, CyclePeak, CyclePoint, CycleSettings, CycleTrace, Run, RunAccumulator,
    ValveSample,
};
pub use engine::{
    EngineOutput, FeatureEngine, FieldSpec, FormulaStage, History, RunContext, SampleTimeStage,
    Stage, UnitsTable, MIN_ROWS,
};
pub use enthalpy::AttemperatorPipeline;
pub use error::{EnrichError, EnrichResult};
pub use events::{Event, EventClassifier, EventKind};
pub use grouping::{GroupFilter, Groups, Predicate, RangeGrouper};
pub use overlay::{OverlayWindow, TemperatureOverlay};
pub use turbine::DesuperheaterPipeline;
pub use valve::{ValvePipeline, ValveRun, ValveSettings};
