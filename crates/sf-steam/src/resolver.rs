//! Null-propagating property resolver.

use crate::model::SteamModel;
use sf_core::units::constants::SUPERHEAT_NUDGE_DEGF;
use sf_core::Derived;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Resolves enthalpy and saturation properties for enrichment stages.
///
/// Every backend failure becomes `None`; the run continues and the failure is
/// counted so the run summary can report it once instead of per row.
pub struct PropertyResolver<M> {
    model: M,
    failures: AtomicU64,
}

impl<M: SteamModel> PropertyResolver<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            failures: AtomicU64::new(0),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Number of lookups that resolved to null so far.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn settle(&self, what: &'static str, result: crate::SteamResult<f64>) -> Derived {
        match result {
            Ok(v) if v.is_finite() => Some(v),
            Ok(_) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                None
            }
            Err(err) => {
                trace!(backend = self.model.name(), what, %err, "property lookup unresolved");
                self.failures.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Enthalpy [Btu/lb] at absolute pressure and temperature, no substitution.
    pub fn enthalpy(&self, p_psia: f64, t_degf: f64) -> Derived {
        self.settle("enthalpy", self.model.h_pt(p_psia, t_degf))
    }

    /// Saturation temperature [degF] at absolute pressure.
    pub fn saturation_temperature(&self, p_psia: f64) -> Derived {
        self.settle("saturation temperature", self.model.tsat_p(p_psia))
    }

    /// Saturation pressure [psia] at temperature.
    pub fn saturation_pressure(&self, t_degf: f64) -> Derived {
        self.settle("saturation pressure", self.model.psat_t(t_degf))
    }

    /// Steam enthalpy from a measured temperature.
    ///
    /// A reading at or below saturation is replaced by `tsat + 1 degF` so the
    /// lookup stays on the superheated side. Null saturation means null enthalpy.
    pub fn steam_enthalpy(&self, p_psia: f64, measured_degf: f64, tsat_degf: Derived) -> Derived {
        let tsat = tsat_degf?;
        self.enthalpy(p_psia, effective_steam_temperature(measured_degf, tsat))
    }
}

/// Temperature actually used for a steam enthalpy lookup.
pub fn effective_steam_temperature(measured_degf: f64, tsat_degf: f64) -> f64 {
    if measured_degf <= tsat_degf {
        tsat_degf + SUPERHEAT_NUDGE_DEGF
    } else {
        measured_degf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SteamError, SteamResult};
    use std::sync::Mutex;

    /// Records every h_pt call; saturation fixed at 400 degF / 250 psia.
    #[derive(Default)]
    struct RecordingModel {
        h_calls: Mutex<Vec<(f64, f64)>>,
    }

    impl SteamModel for RecordingModel {
        fn name(&self) -> &str {
            "recording"
        }

        fn h_pt(&self, p_psia: f64, t_degf: f64) -> SteamResult<f64> {
            self.h_calls.lock().unwrap().push((p_psia, t_degf));
            Ok(1200.0)
        }

        fn tsat_p(&self, p_psia: f64) -> SteamResult<f64> {
            if p_psia > 0.0 {
                Ok(400.0)
            } else {
                Err(SteamError::OutOfRange {
                    what: "pressure",
                    value: p_psia,
                })
            }
        }

        fn psat_t(&self, _t_degf: f64) -> SteamResult<f64> {
            Ok(250.0)
        }
    }

    #[test]
    fn reading_at_saturation_is_nudged() {
        let resolver = PropertyResolver::new(RecordingModel::default());
        let tsat = resolver.saturation_temperature(250.0);
        assert_eq!(tsat, Some(400.0));

        let h = resolver.steam_enthalpy(250.0, 400.0, tsat);
        assert_eq!(h, Some(1200.0));
        assert_eq!(*resolver.model().h_calls.lock().unwrap(), vec![(250.0, 401.0)]);
    }

    #[test]
    fn reading_below_saturation_is_nudged() {
        let resolver = PropertyResolver::new(RecordingModel::default());
        resolver.steam_enthalpy(250.0, 350.0, Some(400.0));
        assert_eq!(*resolver.model().h_calls.lock().unwrap(), vec![(250.0, 401.0)]);
    }

    #[test]
    fn superheated_reading_is_used_as_is() {
        let resolver = PropertyResolver::new(RecordingModel::default());
        resolver.steam_enthalpy(250.0, 455.5, Some(400.0));
        assert_eq!(*resolver.model().h_calls.lock().unwrap(), vec![(250.0, 455.5)]);
    }

    #[test]
    fn null_saturation_skips_lookup() {
        let resolver = PropertyResolver::new(RecordingModel::default());
        let tsat = resolver.saturation_temperature(-1.0);
        assert_eq!(tsat, None);
        assert_eq!(resolver.steam_enthalpy(-1.0, 500.0, tsat), None);
        assert!(resolver.model().h_calls.lock().unwrap().is_empty());
        assert_eq!(resolver.failure_count(), 1);
    }

    #[test]
    fn saturation_temperature_is_never_nudged() {
        let resolver = PropertyResolver::new(RecordingModel::default());
        assert_eq!(resolver.saturation_temperature(250.0), Some(400.0));
    }
}
