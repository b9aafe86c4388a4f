//! sf-core: stable foundation for sensorflow.
//!
//! Contains:
//! - units (foot-pound-second constructors + plant constants)
//! - numeric (Real + absent-value helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{SfError, SfResult};
pub use numeric::*;
pub use units::*;
