//! Frequency slicing
//!
//! Restrict a network to a sub-band of its sweep.

use ndarray::{Array3, Axis};
use num_complex::Complex64;

use super::core::Network;
use crate::error::{NetmanError, Result};
use crate::frequency::{Frequency, FrequencyUnit};

impl Network {
    /// Crop network to a frequency range (in Hz)
    ///
    /// Returns a new network containing only points within [f_start, f_stop].
    /// An empty selection is an error, since a sweep needs at least one point.
    pub fn cropped(&self, f_start: f64, f_stop: f64) -> Result<Network> {
        let f = self.frequency.f();

        let indices: Vec<usize> = f
            .iter()
            .enumerate()
            .filter(|(_, &freq)| freq >= f_start && freq <= f_stop)
            .map(|(i, _)| i)
            .collect();

        if indices.is_empty() {
            return Err(NetmanError::InvalidArgument(format!(
                "no frequency points within [{}, {}] Hz",
                f_start, f_stop
            )));
        }

        let f_new: Vec<f64> = indices.iter().map(|&i| f[i]).collect();
        let s_new: Array3<Complex64> = self.s.select(Axis(0), &indices);
        let frequency = Frequency::from_hz_in(f_new, self.frequency.unit())?;

        let mut cropped = Network::new(frequency, s_new, self.z0.clone())?;
        cropped.name = self.name.clone();
        Ok(cropped)
    }

    /// Crop network to a frequency range in specified units
    pub fn cropped_unit(&self, f_start: f64, f_stop: f64, unit: FrequencyUnit) -> Result<Network> {
        let mult = unit.multiplier();
        self.cropped(f_start * mult, f_stop * mult)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_Z0;
    use crate::frequency::SweepType;
    use approx::assert_relative_eq;
    use ndarray::Array1;

    fn ramp() -> Network {
        let freq = Frequency::new(1.0, 10.0, 10, FrequencyUnit::GHz, SweepType::Linear).unwrap();
        let mut s = Array3::<Complex64>::zeros((10, 1, 1));
        for f in 0..10 {
            s[[f, 0, 0]] = Complex64::new(f as f64 * 0.1, 0.0);
        }
        let z0 = Array1::from_elem(1, Complex64::new(DEFAULT_Z0, 0.0));
        Network::new(freq, s, z0).unwrap()
    }

    #[test]
    fn test_crop() {
        let ntwk = ramp();

        // 3-7 GHz inclusive
        let cropped = ntwk.cropped_unit(3.0, 7.0, FrequencyUnit::GHz).unwrap();

        assert_eq!(cropped.nfreq(), 5);
        assert_relative_eq!(cropped.f()[0], 3e9, epsilon = 1.0);
        assert_relative_eq!(cropped.s()[[0, 0, 0]].re, 0.2, epsilon = 1e-12);
        assert_relative_eq!(cropped.s()[[4, 0, 0]].re, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn test_crop_empty() {
        let ntwk = ramp();
        let err = ntwk.cropped_unit(20.0, 30.0, FrequencyUnit::GHz).unwrap_err();
        assert!(matches!(err, NetmanError::InvalidArgument(_)));
    }
}
