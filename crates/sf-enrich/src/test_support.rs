//! Shared fixtures for unit tests.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use sf_steam::{SteamError, SteamModel, SteamResult};

/// Linear stand-in for a steam table: tsat = p, h = t + p / 10, psat = t / 10.
pub struct SteamTable;

fn finite(what: &'static str, v: f64) -> SteamResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SteamError::NonFinite { what })
    }
}

impl SteamModel for SteamTable {
    fn name(&self) -> &str {
        "linear"
    }

    fn h_pt(&self, p_psia: f64, t_degf: f64) -> SteamResult<f64> {
        finite("enthalpy", t_degf + finite("pressure", p_psia)? / 10.0)
    }

    fn tsat_p(&self, p_psia: f64) -> SteamResult<f64> {
        finite("pressure", p_psia)
    }

    fn psat_t(&self, t_degf: f64) -> SteamResult<f64> {
        finite("temperature", t_degf / 10.0)
    }
}

pub fn minutes(n: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::minutes(n)
}
