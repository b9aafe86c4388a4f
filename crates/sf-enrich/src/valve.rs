//! Valve performance pipeline.

use crate::cycle::{CycleDetector, CycleSettings, CycleTrace, ValveSample};
use crate::engine::{
    EngineOutput, FeatureEngine, FieldSpec, FormulaStage, History, RunContext, SampleTimeStage,
    Stage,
};
use crate::error::{EnrichError, EnrichResult};
use crate::fields::*;
use sf_core::units::labels;
use sf_records::{keys, names, MetadataSet, Record, RecordsError, RowAccessor};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValveSettings {
    pub cycle: CycleSettings,
    /// Full stroke length; enables the inch-per-minute fields.
    pub stroke_width_in: Option<f64>,
}

impl ValveSettings {
    /// Deadbands from the first valve use case present in `meta`.
    pub fn from_metadata(meta: &MetadataSet, stroke_width_in: Option<f64>) -> EnrichResult<Self> {
        let use_case = meta
            .first_use_case(&names::VALVE_USE_CASES)
            .ok_or_else(|| RecordsError::MissingMetadata {
                use_case: names::VALVE_USE_CASES.join("|"),
                key: names::VALVE_DEMAND_DEADBAND.to_string(),
            })?;
        Ok(Self {
            cycle: CycleSettings {
                demand_deadband: meta.number(use_case, names::VALVE_DEMAND_DEADBAND)?,
                feedback_deadband: meta.number(use_case, names::VALVE_FEEDBACK_DEADBAND)?,
            },
            stroke_width_in,
        })
    }
}

/// Output of a valve run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValveRun {
    pub output: EngineOutput,
    pub trace: CycleTrace,
}

impl ValveRun {
    pub fn cycles(&self) -> usize {
        self.trace.peak_indices().len()
    }
}

pub struct ValvePipeline<'a> {
    accessor: RowAccessor<'a>,
    settings: ValveSettings,
}

impl<'a> ValvePipeline<'a> {
    pub fn new(accessor: RowAccessor<'a>, settings: ValveSettings) -> EnrichResult<Self> {
        accessor
            .headers()
            .require(&[keys::VALVE_DEMAND, keys::VALVE_FEEDBACK])?;
        if let Some(width) = settings.stroke_width_in {
            if !(width.is_finite() && width > 0.0) {
                return Err(EnrichError::Stage {
                    stage: "valve",
                    message: format!("stroke width must be positive, got {width}"),
                });
            }
        }
        Ok(Self { accessor, settings })
    }

    pub fn settings(&self) -> ValveSettings {
        self.settings
    }

    fn samples(&self, records: &[Record]) -> EnrichResult<Vec<ValveSample>> {
        records
            .iter()
            .map(|r| {
                Ok(ValveSample::new(
                    self.accessor.value(r, keys::VALVE_DEMAND, false)?,
                    self.accessor.value(r, keys::VALVE_FEEDBACK, false)?,
                ))
            })
            .collect()
    }

    pub fn run(&self, records: &mut [Record]) -> EnrichResult<ValveRun> {
        let context = RunContext::from_records(records)?;
        let samples = self.samples(records)?;
        let trace = CycleDetector::new(self.settings.cycle)
            .detect(&samples, context.sample_time_minutes);

        let mut stages: Vec<Box<dyn Stage + '_>> = vec![
            Box::new(SampleTimeStage),
            Box::new(CycleFieldsStage { trace: &trace }),
            Box::new(stroke_speed()),
        ];
        if let Some(width) = self.settings.stroke_width_in {
            stages.push(Box::new(inch_rates(width)));
        }
        let output = FeatureEngine::new().pass(stages).run(records)?;

        info!(
            rows = records.len(),
            cycles = trace.peak_indices().len(),
            sample_minutes = context.sample_time_minutes,
            "valve cycles detected"
        );
        Ok(ValveRun { output, trace })
    }
}

/// Copies the detector's per-row trace onto the records.
struct CycleFieldsStage<'t> {
    trace: &'t CycleTrace,
}

const CYCLE_OUTPUTS: [FieldSpec; 13] = [
    FieldSpec::new(ZEROED_DEMAND, labels::PERCENT),
    FieldSpec::new(ZEROED_FEEDBACK, labels::PERCENT),
    FieldSpec::new(DEMAND_FEEDBACK_DELTA, labels::PERCENT),
    FieldSpec::new(ABS_DEMAND_FEEDBACK_DELTA, labels::PERCENT),
    FieldSpec::new(VALUE_POSITION_CHANGE, labels::PERCENT),
    FieldSpec::new(ABS_VALUE_POSITION_CHANGE, labels::PERCENT),
    FieldSpec::unitless(SIGN),
    FieldSpec::new(MAGNITUDE, labels::PERCENT),
    FieldSpec::unitless(COUNT),
    FieldSpec::new(CYCLE_MAGNITUDE, labels::PERCENT),
    FieldSpec::new(ABS_CYCLE_MAGNITUDE, labels::PERCENT),
    FieldSpec::new(CYCLE_AVG_RATE_CHANGE, labels::PERCENT_PER_MIN),
    FieldSpec::new(MAX_RATE_CHANGE, labels::PERCENT_PER_MIN),
];

impl Stage for CycleFieldsStage<'_> {
    fn name(&self) -> &'static str {
        "cycle_fields"
    }

    fn outputs(&self) -> &[FieldSpec] {
        &CYCLE_OUTPUTS
    }

    fn apply(&self, record: &mut Record, index: usize, _history: &History<'_>) -> EnrichResult<()> {
        let point = self.trace.get(index).ok_or_else(|| EnrichError::Stage {
            stage: "cycle_fields",
            message: format!("no trace point for row {index}"),
        })?;
        record.set_value(ZEROED_DEMAND, point.zeroed_demand);
        record.set_value(ZEROED_FEEDBACK, point.zeroed_feedback);
        record.set_value(DEMAND_FEEDBACK_DELTA, point.demand_feedback_delta);
        record.set_value(ABS_DEMAND_FEEDBACK_DELTA, point.demand_feedback_delta.abs());
        record.set_value(VALUE_POSITION_CHANGE, point.position_change);
        record.set_value(ABS_VALUE_POSITION_CHANGE, point.position_change.abs());
        record.set_value(SIGN, point.sign);
        record.set_value(MAGNITUDE, point.magnitude);
        record.set_value(COUNT, f64::from(point.count));

        let peak = point.peak;
        record.set(CYCLE_MAGNITUDE, peak.map(|p| p.magnitude));
        record.set(ABS_CYCLE_MAGNITUDE, peak.map(|p| p.magnitude.abs()));
        record.set(CYCLE_AVG_RATE_CHANGE, peak.and_then(|p| p.avg_rate));
        record.set(MAX_RATE_CHANGE, peak.and_then(|p| p.max_rate));
        Ok(())
    }
}

/// `|position change| / sample minutes`, 0.0 on a zero interval.
fn stroke_speed<'a>() -> FormulaStage<'a> {
    FormulaStage::new(
        "stroke_speed",
        &[FieldSpec::new(VALVE_STROKE_SPEED, labels::PERCENT_PER_MIN)],
        |rec, _, h| {
            let change = rec.get(ABS_VALUE_POSITION_CHANGE).unwrap_or(0.0);
            let speed = h.context.per_minute(change).unwrap_or(0.0);
            rec.set(VALVE_STROKE_SPEED, sf_core::finite_or_none(speed));
            Ok(())
        },
    )
}

/// Percent-of-stroke rates scaled to inches.
fn inch_rates<'a>(stroke_width_in: f64) -> FormulaStage<'a> {
    FormulaStage::new(
        "inch_rates",
        &[
            FieldSpec::new(INCH_CYCLE_AVG_RATE_CHANGE, labels::INCH_PER_MIN),
            FieldSpec::new(INCH_MAX_RATE_CHANGE, labels::INCH_PER_MIN),
        ],
        move |rec, _, _| {
            let scale = |v: f64| v / 100.0 * stroke_width_in;
            let avg = rec.get(CYCLE_AVG_RATE_CHANGE).map(scale);
            let max = rec.get(MAX_RATE_CHANGE).map(scale);
            rec.set(INCH_CYCLE_AVG_RATE_CHANGE, avg);
            rec.set(INCH_MAX_RATE_CHANGE, max);
            Ok(())
        },
    )
}
