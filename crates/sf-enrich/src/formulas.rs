//! Per-row heat-balance formulas shared by the enthalpy pipelines.
//!
//! Inputs are raw readings (may be NaN) or resolved properties (may be
//! absent). Every function returns `None` for a value it cannot compute and
//! applies the zero policy of its field otherwise.

use sf_core::{finite_or_none, Derived};

/// `water / steam * 100`; 0.0 when steam flow is zero or NaN.
pub fn water_steam_ratio(water_flow: f64, steam_flow: f64) -> Derived {
    if steam_flow == 0.0 || steam_flow.is_nan() {
        return Some(0.0);
    }
    finite_or_none(water_flow / steam_flow * 100.0)
}

/// Outlet temperature above saturation, floored at zero.
pub fn superheat(outlet_temp: f64, tsat: Derived) -> Derived {
    let diff = finite_or_none(outlet_temp - tsat?)?;
    Some(diff.max(0.0))
}

/// Water flow implied by the energy balance across the spray station.
///
/// 0.0 when outlet enthalpy is not below inlet enthalpy or the steam flow is
/// NaN. A zero denominator (outlet equals water enthalpy) has no defined
/// balance and yields `None`.
pub fn heat_balance_water_flow(
    steam_flow: f64,
    inlet_enthalpy: Derived,
    outlet_enthalpy: Derived,
    water_enthalpy: Derived,
) -> Derived {
    let (h_in, h_out, h_w) = (inlet_enthalpy?, outlet_enthalpy?, water_enthalpy?);
    if h_out >= h_in || steam_flow.is_nan() {
        return Some(0.0);
    }
    finite_or_none((h_in - h_out) / (h_out - h_w) * steam_flow)
}

/// Measured water flow minus the heat-balance flow.
pub fn excess_water(water_flow: f64, hb_water_flow: Derived) -> Derived {
    finite_or_none(water_flow - hb_water_flow?)
}

/// Excess water as a percentage of the heat-balance flow.
pub fn excess_water_percent(water_flow: f64, hb_water_flow: Derived) -> Derived {
    if water_flow <= 0.0 {
        return Some(0.0);
    }
    let hb = hb_water_flow?;
    if hb == 0.0 {
        return finite_or_none(water_flow);
    }
    finite_or_none((water_flow - hb) / hb * 100.0)
}

/// Vapor pressure above barometric, psi gauge.
pub fn gauge_vapor_pressure(psat_psia: Derived, barometric_psia: f64) -> Derived {
    finite_or_none(psat_psia? - barometric_psia)
}
