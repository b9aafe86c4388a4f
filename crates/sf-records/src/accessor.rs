//! Logical-name access to raw record values.

use crate::error::RecordsResult;
use crate::headers::{keys, HeaderMapping};
use crate::record::Record;
use sf_core::nan_to_zero;
use sf_core::units::constants::ATMOSPHERIC_PRESSURE_PSIA;

/// Resolves logical names through the header mapping and applies the
/// gauge-to-absolute pressure correction.
#[derive(Debug, Clone, Copy)]
pub struct RowAccessor<'a> {
    headers: &'a HeaderMapping,
    atmospheric_psia: f64,
}

impl<'a> RowAccessor<'a> {
    pub fn new(headers: &'a HeaderMapping) -> Self {
        Self {
            headers,
            atmospheric_psia: ATMOSPHERIC_PRESSURE_PSIA,
        }
    }

    pub fn with_atmospheric(mut self, psia: f64) -> Self {
        self.atmospheric_psia = psia;
        self
    }

    pub fn headers(&self) -> &'a HeaderMapping {
        self.headers
    }

    pub fn atmospheric_psia(&self) -> f64 {
        self.atmospheric_psia
    }

    /// Local barometric pressure: the row's own reading when mapped and present,
    /// else the atmospheric constant.
    pub fn barometric(&self, record: &Record) -> f64 {
        match self.headers.optional(keys::BAROMETRIC_PRESSURE) {
            Some(col) => {
                let v = record.raw(col);
                if v.is_nan() {
                    self.atmospheric_psia
                } else {
                    v
                }
            }
            None => self.atmospheric_psia,
        }
    }

    /// Raw value for `logical`; absolute pressure when `to_absolute` is set.
    pub fn value(&self, record: &Record, logical: &str, to_absolute: bool) -> RecordsResult<f64> {
        let v = record.raw(self.headers.column(logical)?);
        Ok(if to_absolute {
            v + self.barometric(record)
        } else {
            v
        })
    }

    /// Raw value with NaN read as 0.0.
    pub fn value_or_zero(&self, record: &Record, logical: &str) -> RecordsResult<f64> {
        Ok(nan_to_zero(self.value(record, logical, false)?))
    }

    /// NaN-as-zero gauge reading corrected to absolute.
    pub fn absolute_or_zero(&self, record: &Record, logical: &str) -> RecordsResult<f64> {
        Ok(self.value_or_zero(record, logical)? + self.barometric(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row() -> Record {
        let t = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Record::new(t).with("PT", 100.0).with("TT", f64::NAN)
    }

    #[test]
    fn absolute_uses_atmosphere_without_barometer() {
        let h = HeaderMapping::from([("steam-pressure", "PT"), ("steam-inlet-temp", "TT")]);
        let acc = RowAccessor::new(&h);
        assert_eq!(acc.value(&row(), "steam-pressure", false).unwrap(), 100.0);
        let abs = acc.value(&row(), "steam-pressure", true).unwrap();
        assert!((abs - 114.696).abs() < 1e-12);
    }

    #[test]
    fn absolute_uses_row_barometer_when_present() {
        let h = HeaderMapping::from([("steam-pressure", "PT"), ("barometric-pressure", "BARO")]);
        let acc = RowAccessor::new(&h);
        let rec = row().with("BARO", 14.2);
        assert!((acc.value(&rec, "steam-pressure", true).unwrap() - 114.2).abs() < 1e-12);
        // NaN barometer falls back to the constant
        let rec = row().with("BARO", f64::NAN);
        assert!((acc.value(&rec, "steam-pressure", true).unwrap() - 114.696).abs() < 1e-12);
    }

    #[test]
    fn nan_normalized_to_zero() {
        let h = HeaderMapping::from([("steam-inlet-temp", "TT")]);
        let acc = RowAccessor::new(&h).with_atmospheric(14.7);
        assert!(acc.value(&row(), "steam-inlet-temp", false).unwrap().is_nan());
        assert_eq!(acc.value_or_zero(&row(), "steam-inlet-temp").unwrap(), 0.0);
        assert_eq!(acc.absolute_or_zero(&row(), "steam-inlet-temp").unwrap(), 14.7);
    }

    #[test]
    fn unmapped_name_is_an_error() {
        let h = HeaderMapping::default();
        let acc = RowAccessor::new(&h);
        assert!(acc.value(&row(), "steam-pressure", false).is_err());
    }
}
