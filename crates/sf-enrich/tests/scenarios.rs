//! End-to-end scenarios over the public pipeline API.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use sf_enrich::fields::*;
use sf_enrich::{
    CycleDetector, EventClassifier, EventKind, RangeGrouper, ValvePipeline, ValveSample,
    ValveSettings,
};
use sf_records::{
    ClassificationRange, ClassificationTable, HeaderMapping, Record, RowAccessor, UseCase,
};

fn at(seconds: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 11, 20)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap()
        + Duration::seconds(seconds)
}

#[test]
fn stroke_scenario_signs_counts_and_peaks() {
    let samples: Vec<ValveSample> = [10.0, 15.0, 20.0, 18.0, 12.0]
        .iter()
        .map(|f| ValveSample::new(0.0, *f))
        .collect();
    let trace = CycleDetector::default().detect(&samples, 1.0 / 60.0);

    let signs: Vec<f64> = trace.points().iter().map(|p| p.sign).collect();
    assert_eq!(signs, vec![1.0, 1.0, 1.0, -1.0, -1.0]);
    let counts: Vec<u32> = trace.points().iter().map(|p| p.count).collect();
    assert_eq!(counts, vec![1, 2, 3, 1, 2]);

    let peaks: Vec<(usize, f64)> = trace
        .points()
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.peak.map(|k| (i, k.magnitude)))
        .collect();
    assert_eq!(peaks, vec![(2, 10.0), (4, -8.0)]);
}

#[test]
fn load_crossings() {
    let headers = HeaderMapping::from([("time", "Time"), ("l1", "CT_LOAD"), ("p1", "DRUM_P")]);
    let table = ClassificationTable::new(vec![ClassificationRange {
        drum_pressure_min: 0.0,
        drum_pressure_max: 1000.0,
        startup_type: "Cold".into(),
    }])
    .unwrap();
    let rows: Vec<Record> = [40.0, 60.0, 70.0, 30.0]
        .iter()
        .enumerate()
        .map(|(i, l)| {
            Record::new(at(i as i64))
                .with("CT_LOAD", *l)
                .with("DRUM_P", 120.0)
        })
        .collect();

    let classifier = EventClassifier::new(RowAccessor::new(&headers), &table, 50.0).unwrap();
    let events = classifier.classify(&rows).unwrap();
    let summary: Vec<(usize, EventKind)> = events.iter().map(|e| (e.index, e.kind)).collect();
    assert_eq!(
        summary,
        vec![(1, EventKind::Startup), (3, EventKind::Shutdown)]
    );
    assert_eq!(events[1].since_previous, Some(2.0));
}

#[test]
fn valve_run_groups() {
    let headers = HeaderMapping::from([("time", "Time"), ("d1", "DEM"), ("f1", "POS")]);
    let pipeline =
        ValvePipeline::new(RowAccessor::new(&headers), ValveSettings::default()).unwrap();
    let mut rows: Vec<Record> = [10.0, 10.0, 20.0, 20.0, 5.0]
        .iter()
        .enumerate()
        .map(|(i, f)| {
            Record::new(at(60 * i as i64))
                .with("DEM", 20.0)
                .with("POS", *f)
        })
        .collect();
    pipeline.run(&mut rows).unwrap();

    let groups = RangeGrouper::for_use_case(UseCase::ValvePerformance).group(&rows);
    assert_eq!(groups.get("all").unwrap().len(), 5);
    let moving: Vec<_> = groups
        .get("stroke-speed")
        .unwrap()
        .iter()
        .map(|r| r.get(VALVE_STROKE_SPEED))
        .collect();
    assert_eq!(moving, vec![Some(10.0), Some(15.0)]);
    // demand 20 vs feedback 10 on the first two rows, 15 on the last
    assert_eq!(groups.get("demand-feedback").unwrap().len(), 3);
}

#[test]
fn identical_timestamps_do_not_divide_by_zero() {
    let headers = HeaderMapping::from([("time", "Time"), ("d1", "DEM"), ("f1", "POS")]);
    let pipeline =
        ValvePipeline::new(RowAccessor::new(&headers), ValveSettings::default()).unwrap();
    let mut rows = vec![
        Record::new(at(0)).with("DEM", 50.0).with("POS", 40.0),
        Record::new(at(0)).with("DEM", 50.0).with("POS", 45.0),
    ];
    pipeline.run(&mut rows).unwrap();
    assert_eq!(rows[1].get(VALVE_STROKE_SPEED), Some(0.0));
    assert_eq!(rows[1].get(CYCLE_MAGNITUDE), Some(5.0));
    assert_eq!(rows[1].get(CYCLE_AVG_RATE_CHANGE), None);
    assert_eq!(rows[1].get(MAX_RATE_CHANGE), None);
}

#[test]
fn single_row_is_rejected() {
    let headers = HeaderMapping::from([("time", "Time"), ("d1", "DEM"), ("f1", "POS")]);
    let pipeline =
        ValvePipeline::new(RowAccessor::new(&headers), ValveSettings::default()).unwrap();
    let mut rows = vec![Record::new(at(0)).with("DEM", 1.0).with("POS", 1.0)];
    let err = pipeline.run(&mut rows).unwrap_err();
    assert!(err.to_string().contains("at least 2 rows"));
}
