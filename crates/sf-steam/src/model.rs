//! Property backend trait.

use crate::error::SteamResult;

/// Water/steam property backend.
///
/// All inputs and outputs use the plant unit system: absolute pressure in psia,
/// temperature in degF, specific enthalpy in Btu/lb.
///
/// Implementations must be thread-safe so independent device runs can share one.
pub trait SteamModel: Send + Sync {
    /// Backend name (for logging).
    fn name(&self) -> &str;

    /// Specific enthalpy [Btu/lb] at pressure [psia] and temperature [degF].
    fn h_pt(&self, p_psia: f64, t_degf: f64) -> SteamResult<f64>;

    /// Saturation temperature [degF] at pressure [psia].
    fn tsat_p(&self, p_psia: f64) -> SteamResult<f64>;

    /// Saturation pressure [psia] at temperature [degF].
    fn psat_t(&self, t_degf: f64) -> SteamResult<f64>;
}

impl<M: SteamModel + ?Sized> SteamModel for &M {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn h_pt(&self, p_psia: f64, t_degf: f64) -> SteamResult<f64> {
        (**self).h_pt(p_psia, t_degf)
    }

    fn tsat_p(&self, p_psia: f64) -> SteamResult<f64> {
        (**self).tsat_p(p_psia)
    }

    fn psat_t(&self, t_degf: f64) -> SteamResult<f64> {
        (**self).psat_t(t_degf)
    }
}
