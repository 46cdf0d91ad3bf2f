//! Conversion between display units (what the API speaks) and minor units (what is stored).
//! 1 display unit = 100 minor units.

pub const MINOR_UNITS_PER_UNIT: i64 = 100;

/// Rounds to the nearest minor unit. Returns None for NaN, infinities and values outside i64.
pub fn to_minor_units(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let scaled = (value * MINOR_UNITS_PER_UNIT as f64).round();
    if scaled < i64::MIN as f64 || scaled >= i64::MAX as f64 {
        return None;
    }
    Some(scaled as i64)
}

pub fn from_minor_units(value: i64) -> f64 {
    value as f64 / MINOR_UNITS_PER_UNIT as f64
}
