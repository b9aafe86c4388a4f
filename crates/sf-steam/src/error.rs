//! Steam property errors.

use sf_core::SfError;
use thiserror::Error;

/// Result type for property lookups.
pub type SteamResult<T> = Result<T, SteamError>;

/// Errors a property backend can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SteamError {
    /// Input outside the backend's validity range.
    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },

    /// Input was NaN or infinite.
    #[error("Non-finite input for {what}")]
    NonFinite { what: &'static str },

    /// Backend returned no usable result.
    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl From<SfError> for SteamError {
    fn from(err: SfError) -> Self {
        let SfError::NonFinite { what, .. } = err;
        SteamError::NonFinite { what }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SteamError::OutOfRange {
            what: "pressure",
            value: -3.0,
        };
        assert!(err.to_string().contains("pressure"));

        let err = SteamError::Backend {
            message: "IF97 returned NaN".into(),
        };
        assert!(err.to_string().contains("IF97"));
    }

    #[test]
    fn from_core_error() {
        let err: SteamError = SfError::NonFinite {
            what: "t",
            value: f64::NAN,
        }
        .into();
        assert!(matches!(err, SteamError::NonFinite { what: "t" }));
    }
}
