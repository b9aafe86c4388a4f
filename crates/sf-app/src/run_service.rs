//! Per-device enrichment runs.

use rayon::prelude::*;
use sf_core::units::{constants::ATMOSPHERIC_PRESSURE_PSIA, labels};
use sf_enrich::fields::{LABEL, SECONDS, TIME_BETWEEN_EVENTS};
use sf_enrich::{
    AttemperatorPipeline, DesuperheaterPipeline, EnrichResult, EventClassifier, RangeGrouper,
    TemperatureOverlay, UnitsTable, ValvePipeline, ValveSettings,
};
use sf_records::{ClassificationTable, DeviceDef, Project, Record, RowAccessor, UseCase};
use sf_steam::{If97Model, PropertyResolver, SteamModel};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::input;
use crate::output::{Point, Projector, STARTUP_LABEL_TAG};
use crate::project_service;

/// Request to run devices of a project.
pub struct RunRequest<'a> {
    pub project_path: &'a Path,
    /// Devices to run; empty runs every device.
    pub device_ids: Vec<String>,
}

/// Result of one device run.
#[derive(Debug, Clone)]
pub struct DeviceReport {
    pub device_id: String,
    pub use_case: UseCase,
    /// Input rows after cleaning.
    pub rows: usize,
    /// Property lookups that resolved to null.
    pub property_failures: u64,
    pub units: UnitsTable,
    pub points: Vec<Point>,
    pub elapsed_s: f64,
}

/// Outcome of a project run. Device failures do not stop other devices.
#[derive(Debug, Default)]
pub struct RunResponse {
    pub reports: Vec<DeviceReport>,
    pub failures: Vec<(String, AppError)>,
}

impl RunResponse {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Rows to project plus their units.
struct Outcome {
    records: Vec<Record>,
    units: UnitsTable,
    grouped: bool,
}

fn atmospheric(project: &Project) -> f64 {
    project
        .atmospheric_pressure_psia
        .unwrap_or(ATMOSPHERIC_PRESSURE_PSIA)
}

fn grouper(device: &DeviceDef) -> RangeGrouper {
    match &device.groups {
        Some(defs) => RangeGrouper::from_defs(defs),
        None => RangeGrouper::for_use_case(device.use_case),
    }
}

fn enrich<M: SteamModel>(
    project: &Project,
    device: &DeviceDef,
    mut records: Vec<Record>,
    resolver: &PropertyResolver<M>,
) -> EnrichResult<Outcome> {
    let acc = RowAccessor::new(&device.headers).with_atmospheric(atmospheric(project));
    let custom_groups = device.groups.is_some();

    match device.use_case {
        UseCase::Attemperator => {
            let out = AttemperatorPipeline::new(resolver, acc)?.run(&mut records)?;
            Ok(Outcome {
                records,
                units: out.units,
                grouped: true,
            })
        }
        UseCase::Desuperheater => {
            let out = DesuperheaterPipeline::new(resolver, acc)?.run(&mut records)?;
            Ok(Outcome {
                records,
                units: out.units,
                grouped: true,
            })
        }
        UseCase::ValvePerformance => {
            let settings =
                ValveSettings::from_metadata(&device.static_metadata, device.stroke_width_in)?;
            let run = ValvePipeline::new(acc, settings)?.run(&mut records)?;
            Ok(Outcome {
                records,
                units: run.output.units,
                grouped: true,
            })
        }
        UseCase::Classification => {
            let table = ClassificationTable::new(project.classification.clone())?;
            let classifier = EventClassifier::from_metadata(acc, &table, &device.static_metadata)?;
            Ok(Outcome {
                records: classifier.event_records(&records)?,
                units: UnitsTable::from([(TIME_BETWEEN_EVENTS.to_string(), labels::SECONDS)]),
                grouped: custom_groups,
            })
        }
        UseCase::TemperatureOverlay => {
            let table = ClassificationTable::new(project.classification.clone())?;
            let classifier = EventClassifier::from_metadata(acc, &table, &device.static_metadata)?;
            let events = classifier.classify(&records)?;
            let overlay = TemperatureOverlay::new(acc)?;
            Ok(Outcome {
                records: overlay.overlay(&records, &events)?,
                units: UnitsTable::from([(SECONDS.to_string(), labels::SECONDS)]),
                grouped: custom_groups,
            })
        }
    }
}

fn project_points(device: &DeviceDef, outcome: &Outcome) -> Vec<Point> {
    let mut projector = Projector::new(&device.identifier);
    if device.use_case == UseCase::TemperatureOverlay {
        projector = projector.label_as_tag(LABEL, STARTUP_LABEL_TAG);
    }

    if !outcome.grouped {
        return outcome
            .records
            .iter()
            .map(|r| projector.point(r, None))
            .collect();
    }
    grouper(device)
        .group(&outcome.records)
        .iter()
        .flat_map(|(name, members)| {
            members
                .iter()
                .map(|r| projector.point(r, Some(name)))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Run one device over already-cleaned records.
pub fn run_device<M: SteamModel>(
    project: &Project,
    device: &DeviceDef,
    records: Vec<Record>,
    model: &M,
) -> AppResult<DeviceReport> {
    let started = Instant::now();
    let rows = records.len();
    info!(device = %device.id, use_case = %device.use_case, rows, "device run started");

    let resolver = PropertyResolver::new(model);
    let outcome =
        enrich(project, device, records, &resolver).map_err(|source| AppError::DeviceRun {
            device: device.id.clone(),
            use_case: device.use_case,
            source,
        })?;
    let points = project_points(device, &outcome);

    let property_failures = resolver.failure_count();
    if property_failures > 0 {
        warn!(
            device = %device.id,
            failures = property_failures,
            backend = model.name(),
            "property lookups left fields null"
        );
    }

    let elapsed_s = started.elapsed().as_secs_f64();
    info!(
        device = %device.id,
        points = points.len(),
        elapsed_s,
        "device run finished"
    );
    Ok(DeviceReport {
        device_id: device.id.clone(),
        use_case: device.use_case,
        rows,
        property_failures,
        units: outcome.units,
        points,
        elapsed_s,
    })
}

/// Run independent devices in parallel. Results keep input order.
pub fn run_devices<M: SteamModel>(
    project: &Project,
    inputs: Vec<(&DeviceDef, Vec<Record>)>,
    model: &M,
) -> Vec<(String, AppResult<DeviceReport>)> {
    inputs
        .into_par_iter()
        .map(|(device, records)| {
            let result = run_device(project, device, records, model);
            if let Err(err) = &result {
                warn!(device = %device.id, use_case = %device.use_case, %err, "device run aborted");
            }
            (device.id.clone(), result)
        })
        .collect()
}

/// Load the project and every selected device's data, then run them.
pub fn run_project(request: &RunRequest) -> AppResult<RunResponse> {
    let project = project_service::load_project(request.project_path)?;
    let devices: Vec<&DeviceDef> = if request.device_ids.is_empty() {
        project.devices.iter().collect()
    } else {
        request
            .device_ids
            .iter()
            .map(|id| project_service::get_device(&project, id))
            .collect::<AppResult<_>>()?
    };

    let model = If97Model::default();
    let results: Vec<(String, AppResult<DeviceReport>)> = devices
        .par_iter()
        .map(|device| {
            let result = project_service::data_path(request.project_path, device)
                .and_then(|path| input::load_records(&path, &device.headers))
                .and_then(|records| run_device(&project, device, records, &model));
            if let Err(err) = &result {
                warn!(device = %device.id, use_case = %device.use_case, %err, "device run aborted");
            }
            (device.id.clone(), result)
        })
        .collect();

    let mut response = RunResponse::default();
    for (id, result) in results {
        match result {
            Ok(report) => response.reports.push(report),
            Err(err) => response.failures.push((id, err)),
        }
    }
    info!(
        project = %project.name,
        succeeded = response.reports.len(),
        failed = response.failures.len(),
        "project run finished"
    );
    Ok(response)
}
