//! Valve stroke cycle detection.
//!
//! A run is a maximal stretch of rows whose position delta keeps one sign.
//! The detector threads a [`RunAccumulator`] through a single forward pass,
//! then marks the row where each run's length peaks against its neighbours.

use sf_core::signum_or_zero;

/// Deadbands applied before differencing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CycleSettings {
    pub demand_deadband: f64,
    pub feedback_deadband: f64,
}

/// One valve reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValveSample {
    pub demand: f64,
    pub feedback: f64,
}

impl ValveSample {
    pub fn new(demand: f64, feedback: f64) -> Self {
        Self { demand, feedback }
    }
}

/// Values at a run's extremum row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclePeak {
    pub magnitude: f64,
    /// `|magnitude / count|` per minute; `None` when the sample interval is zero.
    pub avg_rate: Option<f64>,
    /// Largest per-row movement inside the run, per minute.
    pub max_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclePoint {
    pub zeroed_demand: f64,
    pub zeroed_feedback: f64,
    pub demand_feedback_delta: f64,
    pub position_change: f64,
    pub sign: f64,
    pub magnitude: f64,
    pub count: u32,
    pub peak: Option<CyclePeak>,
}

/// Contiguous rows sharing one sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Run {
    pub start: usize,
    /// Inclusive.
    pub end: usize,
    pub sign: f64,
    pub magnitude: f64,
}

impl Run {
    /// Number of rows in the run.
    pub fn rows(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Detector output, one point per input sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CycleTrace {
    points: Vec<CyclePoint>,
}

impl CycleTrace {
    pub fn points(&self) -> &[CyclePoint] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<&CyclePoint> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Indices of peak rows in order.
    pub fn peak_indices(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.peak.is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// Maximal same-sign runs.
    pub fn runs(&self) -> Vec<Run> {
        let mut runs: Vec<Run> = Vec::new();
        for (i, p) in self.points.iter().enumerate() {
            match runs.last_mut() {
                Some(run) if run.sign == p.sign => {
                    run.end = i;
                    run.magnitude = p.magnitude;
                }
                _ => runs.push(Run {
                    start: i,
                    end: i,
                    sign: p.sign,
                    magnitude: p.magnitude,
                }),
            }
        }
        runs
    }
}

/// Sign, magnitude and length of the run the current row belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunAccumulator {
    pub sign: f64,
    pub magnitude: f64,
    pub count: u32,
}

impl RunAccumulator {
    /// State at the first row: positive by convention, nothing accumulated.
    pub fn start() -> Self {
        Self {
            sign: 1.0,
            magnitude: 0.0,
            count: 1,
        }
    }

    /// Fold in the next row's delta.
    pub fn advance(&mut self, delta: f64) {
        let sign = signum_or_zero(delta);
        if sign == self.sign {
            self.magnitude += delta;
            self.count += 1;
        } else {
            self.sign = sign;
            self.magnitude = delta;
            self.count = 1;
        }
    }
}

fn zeroed(value: f64, deadband: f64) -> f64 {
    if value > deadband {
        value
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CycleDetector {
    settings: CycleSettings,
}

impl CycleDetector {
    pub fn new(settings: CycleSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> CycleSettings {
        self.settings
    }

    /// Run the detector over one valve's samples in time order.
    ///
    /// `sample_time_minutes` is the run's sample interval; a zero interval
    /// leaves rate fields null.
    pub fn detect(&self, samples: &[ValveSample], sample_time_minutes: f64) -> CycleTrace {
        let mut points = Vec::with_capacity(samples.len());
        let mut acc = RunAccumulator::start();
        let mut prev_feedback = None;

        for sample in samples {
            let zeroed_demand = zeroed(sample.demand, self.settings.demand_deadband);
            let zeroed_feedback = zeroed(sample.feedback, self.settings.feedback_deadband);
            let position_change = match prev_feedback {
                Some(prev) => {
                    let delta = zeroed_feedback - prev;
                    acc.advance(delta);
                    delta
                }
                None => 0.0,
            };
            prev_feedback = Some(zeroed_feedback);

            points.push(CyclePoint {
                zeroed_demand,
                zeroed_feedback,
                demand_feedback_delta: zeroed_demand - zeroed_feedback,
                position_change,
                sign: acc.sign,
                magnitude: acc.magnitude,
                count: acc.count,
                peak: None,
            });
        }

        for i in 1..points.len() {
            let prev = points[i - 1].count;
            let next = points.get(i + 1).map_or(0, |p| p.count);
            let count = points[i].count;
            if count >= prev && count >= next {
                points[i].peak = Some(peak_at(&points, i, sample_time_minutes));
            }
        }

        CycleTrace { points }
    }
}

fn peak_at(points: &[CyclePoint], i: usize, sample_time_minutes: f64) -> CyclePeak {
    let point = &points[i];
    let avg_rate = if sample_time_minutes == 0.0 {
        None
    } else {
        Some((point.magnitude / f64::from(point.count)).abs() / sample_time_minutes)
    };

    let max_rate = match avg_rate {
        None => None,
        Some(rate) if rate == 0.0 => Some(0.0),
        Some(_) => {
            let start = i.saturating_sub(points[i - 1].count as usize);
            points[start..=i]
                .iter()
                .flat_map(|p| {
                    [
                        p.demand_feedback_delta,
                        p.demand_feedback_delta.abs(),
                        p.position_change,
                        p.position_change.abs(),
                    ]
                })
                .filter(|v| !v.is_nan())
                .reduce(f64::max)
                .map(|m| m / sample_time_minutes)
        }
    };

    CyclePeak {
        magnitude: point.magnitude,
        avg_rate,
        max_rate,
    }
}
