//! Error types for enrichment runs.

use sf_records::RecordsError;
use thiserror::Error;

pub type EnrichResult<T> = Result<T, EnrichError>;

/// Structural failures. Per-field numeric failures never surface here; they
/// become null fields.
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Need at least {needed} rows to establish a sample interval, got {got}")]
    InsufficientRows { needed: usize, got: usize },

    #[error(transparent)]
    Config(#[from] RecordsError),

    #[error("Stage {stage} failed: {message}")]
    Stage {
        stage: &'static str,
        message: String,
    },
}
