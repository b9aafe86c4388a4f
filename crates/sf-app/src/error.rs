//! Error types for the sf-app service layer.

use sf_enrich::EnrichError;
use sf_records::{RecordsError, UseCase};
use std::path::PathBuf;

/// Application error shared by the CLI and library callers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(#[from] RecordsError),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Device '{0}' has no data file configured")]
    MissingData(String),

    #[error("Failed to read data file: {path}")]
    DataFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed data file {path}: {message}")]
    DataFormat { path: PathBuf, message: String },

    /// A structural failure aborted one device's run.
    #[error("Device '{device}' ({use_case}) failed: {source}")]
    DeviceRun {
        device: String,
        use_case: UseCase,
        #[source]
        source: EnrichError,
    },

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sf-app operations.
pub type AppResult<T> = Result<T, AppError>;
