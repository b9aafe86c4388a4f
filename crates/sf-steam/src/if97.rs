//! IAPWS-IF97 backend.
//!
//! Single-phase enthalpy is delegated to `seuif97`; the saturation line uses the
//! explicit Region 4 equations, which are exact inverses of each other.

use crate::error::{SteamError, SteamResult};
use crate::model::SteamModel;
use sf_core::units::{
    degc_to_degf, degf_to_degc, kj_per_kg_to_btu_per_lb, mpa_to_psi, psi_to_mpa,
};
use seuif97::{pt, OH};

// ---------------- Region 4 (saturation line) ----------------
const N: [f64; 10] = [
    0.116_705_214_527_67e4,
    -0.724_213_165_988_42e6,
    -0.170_738_469_400_92e2,
    0.120_208_247_024_70e5,
    -0.323_255_503_223_33e7,
    0.149_151_086_135_30e2,
    -0.482_326_573_615_91e4,
    0.405_113_405_420_57e6,
    -0.238_555_575_678_49,
    0.650_175_348_447_98e3,
];

const T_TRIPLE_K: f64 = 273.15;
const T_CRIT_K: f64 = 647.096;
const P_TRIPLE_MPA: f64 = 611.213e-6;
const P_CRIT_MPA: f64 = 22.064;

// Outer envelope of IF97 regions 1-3 and 5.
const P_MAX_MPA: f64 = 100.0;
const P_MAX_REGION5_MPA: f64 = 50.0;
const T_MAX_REGION2_C: f64 = 800.0;
const T_MAX_C: f64 = 2000.0;

fn psat_mpa(t_k: f64) -> f64 {
    let theta = t_k + N[8] / (t_k - N[9]);
    let a = theta * theta + N[0] * theta + N[1];
    let b = N[2] * theta * theta + N[3] * theta + N[4];
    let c = N[5] * theta * theta + N[6] * theta + N[7];
    (2.0 * c / (-b + (b * b - 4.0 * a * c).sqrt())).powi(4)
}

fn tsat_k(p_mpa: f64) -> f64 {
    let beta = p_mpa.powf(0.25);
    let e = beta * beta + N[2] * beta + N[5];
    let f = N[0] * beta * beta + N[3] * beta + N[6];
    let g = N[1] * beta * beta + N[4] * beta + N[7];
    let d = 2.0 * g / (-f - (f * f - 4.0 * e * g).sqrt());
    (N[9] + d - ((N[9] + d).powi(2) - 4.0 * (N[8] + N[9] * d)).sqrt()) / 2.0
}

fn finite(v: f64, what: &'static str) -> SteamResult<f64> {
    Ok(sf_core::ensure_finite(v, what)?)
}

/// IAPWS-IF97 water/steam model in plant units.
#[derive(Debug, Clone, Copy, Default)]
pub struct If97Model;

impl If97Model {
    pub fn new() -> Self {
        Self
    }
}

impl SteamModel for If97Model {
    fn name(&self) -> &str {
        "IAPWS-IF97"
    }

    fn h_pt(&self, p_psia: f64, t_degf: f64) -> SteamResult<f64> {
        let p_mpa = psi_to_mpa(finite(p_psia, "pressure")?);
        let t_c = degf_to_degc(finite(t_degf, "temperature")?);

        if p_mpa <= 0.0 || p_mpa > P_MAX_MPA {
            return Err(SteamError::OutOfRange {
                what: "pressure",
                value: p_psia,
            });
        }
        if t_c < 0.0 || t_c > T_MAX_C || (t_c > T_MAX_REGION2_C && p_mpa > P_MAX_REGION5_MPA) {
            return Err(SteamError::OutOfRange {
                what: "temperature",
                value: t_degf,
            });
        }

        let h_kj = pt(p_mpa, t_c, OH);
        if !h_kj.is_finite() {
            return Err(SteamError::Backend {
                message: format!("IF97 h(p={p_psia} psia, t={t_degf} degF) did not resolve"),
            });
        }
        Ok(kj_per_kg_to_btu_per_lb(h_kj))
    }

    fn tsat_p(&self, p_psia: f64) -> SteamResult<f64> {
        let p_mpa = psi_to_mpa(finite(p_psia, "pressure")?);
        if !(P_TRIPLE_MPA..=P_CRIT_MPA).contains(&p_mpa) {
            return Err(SteamError::OutOfRange {
                what: "saturation pressure",
                value: p_psia,
            });
        }
        let t_c = tsat_k(p_mpa) - 273.15;
        finite(degc_to_degf(t_c), "saturation temperature")
    }

    fn psat_t(&self, t_degf: f64) -> SteamResult<f64> {
        let t_k = degf_to_degc(finite(t_degf, "temperature")?) + 273.15;
        if !(T_TRIPLE_K..=T_CRIT_K).contains(&t_k) {
            return Err(SteamError::OutOfRange {
                what: "saturation temperature",
                value: t_degf,
            });
        }
        finite(mpa_to_psi(psat_mpa(t_k)), "saturation pressure")
    }
}
