use thiserror::Error;

pub type SfResult<T> = Result<T, SfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SfError {
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}
