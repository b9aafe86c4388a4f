use crate::SfError;

/// Floating point type for every reading and derived value.
pub type Real = f64;

/// Absent-or-finite value carried by every derived field.
///
/// `None` is the single "cannot compute" marker. Raw sensor readings stay `f64`
/// (NaN = missing reading) until they cross into a derived field.
pub type Derived = Option<Real>;

/// Reject NaN and infinities at a backend boundary.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, SfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SfError::NonFinite { what, value: v })
    }
}

/// Collapse NaN/inf to the absent marker.
#[inline]
pub fn finite_or_none(v: Real) -> Derived {
    v.is_finite().then_some(v)
}

/// Replace a missing reading with 0.0.
#[inline]
pub fn nan_to_zero(v: Real) -> Real {
    if v.is_nan() {
        0.0
    } else {
        v
    }
}

/// Sign of a delta: -1, 0 or 1. NaN maps to 0.
#[inline]
pub fn signum_or_zero(v: Real) -> Real {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn nan_to_zero_is_identity_on_numbers(v in -1.0e9_f64..1.0e9_f64) {
            prop_assert_eq!(nan_to_zero(v), v);
        }
    }
}
