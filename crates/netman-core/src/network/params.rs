//! Network parameter accessors
//!
//! Read-only access to the data a `Network` owns.

use ndarray::{Array1, Array3};
use num_complex::Complex64;

use super::core::Network;
use crate::frequency::Frequency;

impl Network {
    /// Get reference impedance
    pub fn z0(&self) -> &Array1<Complex64> {
        &self.z0
    }

    /// Get S-parameters
    pub fn s(&self) -> &Array3<Complex64> {
        &self.s
    }

    /// Get frequency object
    pub fn frequency(&self) -> &Frequency {
        &self.frequency
    }

    /// Get frequency vector in Hz
    pub fn f(&self) -> &[f64] {
        self.frequency.f()
    }
}
