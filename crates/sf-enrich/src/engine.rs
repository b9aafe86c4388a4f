//! Sequential feature engine.
//!
//! A pipeline is a list of passes; each pass is an ordered list of stages.
//! Within a pass every row is visited in index order and every stage runs on
//! that row before the next row starts, so a stage can read:
//! - fields written earlier in the same pass on the current row,
//! - all fields of previous rows,
//! - fields written by *earlier passes* on following rows.
//!
//! A stage that needs a following row's value from the same pass (a lookahead)
//! must go in a later pass.

use crate::error::{EnrichError, EnrichResult};
use sf_core::units::labels;
use sf_records::Record;
use std::collections::BTreeMap;
use tracing::debug;

/// Minimum rows a run needs to establish its sample interval.
pub const MIN_ROWS: usize = 2;

/// Derived field name with its display unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub unit: Option<&'static str>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, unit: &'static str) -> Self {
        Self {
            name,
            unit: Some(unit),
        }
    }

    pub const fn unitless(name: &'static str) -> Self {
        Self { name, unit: None }
    }
}

/// Derived field name -> display unit, produced once per run.
pub type UnitsTable = BTreeMap<String, &'static str>;

/// Per-run values fixed before any stage runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunContext {
    /// Interval between the first two rows [s].
    pub sample_time_seconds: f64,
    /// Same interval in minutes; the denominator for every per-minute rate.
    pub sample_time_minutes: f64,
}

impl RunContext {
    pub fn from_records(records: &[Record]) -> EnrichResult<Self> {
        match records {
            [first, second, ..] => {
                let dt = second.timestamp - first.timestamp;
                let seconds = dt.num_milliseconds() as f64 / 1000.0;
                Ok(Self {
                    sample_time_seconds: seconds,
                    sample_time_minutes: seconds / 60.0,
                })
            }
            _ => Err(EnrichError::InsufficientRows {
                needed: MIN_ROWS,
                got: records.len(),
            }),
        }
    }

    /// Per-minute rate guard: `None` when the sample interval is zero.
    pub fn per_minute(&self, value: f64) -> Option<f64> {
        if self.sample_time_minutes == 0.0 {
            None
        } else {
            Some(value / self.sample_time_minutes)
        }
    }
}

/// Read-only view of the rows around the one being enriched.
pub struct History<'a> {
    pub context: &'a RunContext,
    before: &'a [Record],
    after: &'a [Record],
}

impl<'a> History<'a> {
    pub fn new(context: &'a RunContext, before: &'a [Record], after: &'a [Record]) -> Self {
        Self {
            context,
            before,
            after,
        }
    }

    /// Previous row, fully enriched by this and earlier passes.
    pub fn prev(&self) -> Option<&'a Record> {
        self.before.last()
    }

    /// Following row; only fields from earlier passes are present.
    pub fn next(&self) -> Option<&'a Record> {
        self.after.first()
    }
}

/// One enrichment step.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fields this stage writes.
    fn outputs(&self) -> &[FieldSpec];

    fn apply(&self, record: &mut Record, index: usize, history: &History<'_>) -> EnrichResult<()>;
}

type StageFn<'a> =
    dyn Fn(&mut Record, usize, &History<'_>) -> EnrichResult<()> + Send + Sync + 'a;

/// Stage backed by a closure; used for plain per-row formulas.
pub struct FormulaStage<'a> {
    name: &'static str,
    outputs: Vec<FieldSpec>,
    f: Box<StageFn<'a>>,
}

impl<'a> FormulaStage<'a> {
    pub fn new<F>(name: &'static str, outputs: &[FieldSpec], f: F) -> Self
    where
        F: Fn(&mut Record, usize, &History<'_>) -> EnrichResult<()> + Send + Sync + 'a,
    {
        Self {
            name,
            outputs: outputs.to_vec(),
            f: Box::new(f),
        }
    }
}

impl Stage for FormulaStage<'_> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn outputs(&self) -> &[FieldSpec] {
        &self.outputs
    }

    fn apply(&self, record: &mut Record, index: usize, history: &History<'_>) -> EnrichResult<()> {
        (self.f)(record, index, history)
    }
}

/// Stamps the run's sample interval on every row.
pub struct SampleTimeStage;

pub const TIME_DIFF_MINUTES: &str = "time_diff_minutes";
pub const DATA_SAMPLE_TIME_SECONDS: &str = "data_sample_time_seconds";
pub const DATA_SAMPLE_TIME: &str = "data_sample_time";

const SAMPLE_TIME_OUTPUTS: [FieldSpec; 3] = [
    FieldSpec::new(TIME_DIFF_MINUTES, labels::MINUTES),
    FieldSpec::new(DATA_SAMPLE_TIME_SECONDS, labels::SECONDS),
    FieldSpec::new(DATA_SAMPLE_TIME, labels::MINUTES),
];

impl Stage for SampleTimeStage {
    fn name(&self) -> &'static str {
        "sample_time"
    }

    fn outputs(&self) -> &[FieldSpec] {
        &SAMPLE_TIME_OUTPUTS
    }

    fn apply(&self, record: &mut Record, _index: usize, history: &History<'_>) -> EnrichResult<()> {
        let ctx = history.context;
        record.set_value(TIME_DIFF_MINUTES, ctx.sample_time_minutes);
        record.set_value(DATA_SAMPLE_TIME_SECONDS, ctx.sample_time_seconds);
        record.set_value(DATA_SAMPLE_TIME, ctx.sample_time_minutes);
        Ok(())
    }
}

/// Result of an engine run.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub context: RunContext,
    pub units: UnitsTable,
}

/// Ordered passes of stages, fixed at construction.
#[derive(Default)]
pub struct FeatureEngine<'a> {
    passes: Vec<Vec<Box<dyn Stage + 'a>>>,
}

impl<'a> FeatureEngine<'a> {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Append a pass. Stages run in the given order on each row.
    pub fn pass(mut self, stages: Vec<Box<dyn Stage + 'a>>) -> Self {
        self.passes.push(stages);
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.passes.iter().flatten().map(|s| s.name()).collect()
    }

    /// Units for every field the pipeline declares.
    pub fn units(&self) -> UnitsTable {
        self.passes
            .iter()
            .flatten()
            .flat_map(|s| s.outputs().iter())
            .filter_map(|f| f.unit.map(|u| (f.name.to_string(), u)))
            .collect()
    }

    /// Apply every pass to `records` in place.
    pub fn run(&self, records: &mut [Record]) -> EnrichResult<EngineOutput> {
        let context = RunContext::from_records(records)?;

        for (pass_index, stages) in self.passes.iter().enumerate() {
            debug!(
                pass = pass_index,
                stages = stages.len(),
                rows = records.len(),
                "running enrichment pass"
            );
            for index in 0..records.len() {
                let (before, rest) = records.split_at_mut(index);
                if let Some((current, after)) = rest.split_first_mut() {
                    let history = History::new(&context, before, after);
                    for stage in stages {
                        stage.apply(current, index, &history)?;
                    }
                }
            }
        }

        Ok(EngineOutput {
            context,
            units: self.units(),
        })
    }
}
