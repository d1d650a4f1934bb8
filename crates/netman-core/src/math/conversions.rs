//! Unit conversion functions
//!
//! Conversions from linear magnitudes and power ratios to decibels.

use num_complex::Complex64;

use crate::constants::DB_EPS;

/// Convert complex number to dB (20*log10(|z|))
pub fn complex_2_db(z: Complex64) -> f64 {
    magnitude_2_db(z.norm())
}

/// Convert magnitude to dB (20*log10(mag))
pub fn magnitude_2_db(mag: f64) -> f64 {
    20.0 * mag.log10()
}

/// Convert a power ratio to dB, guarded against `log10(0)`
///
/// Computes `10*log10(|x| + DB_EPS)`. Finite for every finite `x`.
pub fn power_2_db10_guarded(x: f64) -> f64 {
    10.0 * (x.abs() + DB_EPS).log10()
}
