//! Shared application service layer for sensorflow.
//!
//! Loads a project, reads and cleans each device's records, runs the device's
//! use case and projects the result onto tagged points. Devices run in
//! parallel; each owns its records.

pub mod error;
pub mod input;
pub mod output;
pub mod project_service;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use input::{load_records, parse_records, parse_timestamp};
pub use output::{FieldValue, Point, Projector, GROUP_TAG, MEASUREMENT, STARTUP_LABEL_TAG};
pub use project_service::{
    data_path, get_device, list_devices, load_project, save_project, DeviceSummary,
};
pub use run_service::{
    run_device, run_devices, run_project, DeviceReport, RunRequest, RunResponse,
};
