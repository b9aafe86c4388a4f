//! sf-steam: water/steam property lookups for sensorflow.
//!
//! Provides:
//! - `SteamModel` trait: the seam between enrichment code and a property backend
//! - `If97Model`: IAPWS-IF97 backend (via `seuif97`) in psia / degF / Btu/lb
//! - `PropertyResolver`: null-on-failure wrapper with the near-saturation rule
//!
//! # Architecture
//!
//! Stages never talk to the backend directly. They ask the resolver, which turns
//! every backend failure into `None` and keeps a failure count for the run log.
//! Tests swap the backend for a recording mock through the same trait.
//!
//! # Example
//!
//! ```no_run
//! use sf_steam::{If97Model, PropertyResolver};
//!
//! let resolver = PropertyResolver::new(If97Model::new());
//! let tsat = resolver.saturation_temperature(614.7);
//! let h = resolver.steam_enthalpy(614.7, 480.0, tsat);
//! println!("h = {:?} Btu/lb", h);
//! ```

pub mod error;
pub mod if97;
pub mod model;
pub mod resolver;

pub use error::{SteamError, SteamResult};
pub use if97::If97Model;
pub use model::SteamModel;
pub use resolver::PropertyResolver;
