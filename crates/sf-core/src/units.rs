// sf-core/src/units.rs
//
// Plant data is carried in the foot-pound-second industrial convention:
// psi (gauge on the wire, psia after correction), degF, Btu/lb, kpph.
// `uom` quantities appear only where a value crosses into another system.

use uom::si::f64::{
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
};

pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn psi(v: f64) -> Pressure {
    use uom::si::pressure::pound_force_per_square_inch;
    Pressure::new::<pound_force_per_square_inch>(v)
}

#[inline]
pub fn degf(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_fahrenheit;
    Temperature::new::<degree_fahrenheit>(v)
}

/// psi -> MPa
#[inline]
pub fn psi_to_mpa(v: f64) -> f64 {
    use uom::si::pressure::megapascal;
    psi(v).get::<megapascal>()
}

/// MPa -> psi
#[inline]
pub fn mpa_to_psi(v: f64) -> f64 {
    use uom::si::pressure::{megapascal, pound_force_per_square_inch};
    Pressure::new::<megapascal>(v).get::<pound_force_per_square_inch>()
}

/// degF -> degC
#[inline]
pub fn degf_to_degc(v: f64) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    degf(v).get::<degree_celsius>()
}

/// degC -> degF
#[inline]
pub fn degc_to_degf(v: f64) -> f64 {
    use uom::si::thermodynamic_temperature::{degree_celsius, degree_fahrenheit};
    Temperature::new::<degree_celsius>(v).get::<degree_fahrenheit>()
}

/// kJ/kg -> Btu/lb
#[inline]
pub fn kj_per_kg_to_btu_per_lb(v: f64) -> f64 {
    v / constants::KJ_PER_KG_PER_BTU_PER_LB
}

pub mod constants {
    /// Standard atmosphere [psia].
    pub const ATMOSPHERIC_PRESSURE_PSIA: f64 = 14.696;

    /// International-table Btu/lb expressed in kJ/kg (exact).
    pub const KJ_PER_KG_PER_BTU_PER_LB: f64 = 2.326;

    /// Offset added to saturation temperature when a reading falls below it [degF].
    pub const SUPERHEAT_NUDGE_DEGF: f64 = 1.0;
}

/// Display units for derived fields.
pub mod labels {
    pub const DEG_F: &str = "deg F";
    pub const BTU_PER_LB: &str = "Btu/lb";
    pub const PSI_G: &str = "psi G";
    pub const KPPH: &str = "kpph";
    pub const PERCENT: &str = "%";
    pub const MINUTES: &str = "min";
    pub const SECONDS: &str = "s";
    pub const PERCENT_PER_MIN: &str = "%/min";
    pub const INCH_PER_MIN: &str = "in/min";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_round_trip() {
        let mpa = psi_to_mpa(14.696);
        assert!((mpa - 0.101_325).abs() < 1e-4);
        assert!((mpa_to_psi(mpa) - 14.696).abs() < 1e-9);
    }

    #[test]
    fn temperature_fixed_points() {
        assert!((degf_to_degc(212.0) - 100.0).abs() < 1e-9);
        assert!((degf_to_degc(32.0)).abs() < 1e-9);
        assert!((degc_to_degf(100.0) - 212.0).abs() < 1e-9);
    }

    #[test]
    fn enthalpy_conversion() {
        assert!((kj_per_kg_to_btu_per_lb(2.326) - 1.0).abs() < 1e-12);
    }
}
