//! Frequency module - represents a frequency sweep
//!
//! A sweep is an ordered, strictly increasing sequence of positive
//! frequencies shared by every S-parameter array of one measurement.

use crate::error::{NetmanError, Result};

/// Frequency unit enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrequencyUnit {
    #[default]
    Hz,
    KHz,
    MHz,
    GHz,
    THz,
}

impl FrequencyUnit {
    /// Get the multiplier to convert to Hz
    pub fn multiplier(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
            FrequencyUnit::THz => 1e12,
        }
    }
}

/// Sweep type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepType {
    #[default]
    Linear,
    Log,
}

/// A frequency sweep
#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    /// Frequency vector in Hz
    f: Vec<f64>,
    /// Display unit
    unit: FrequencyUnit,
    /// Sweep type (linear or log)
    sweep_type: SweepType,
}

impl Frequency {
    /// Create a synthetic sweep with start/stop/npoints
    ///
    /// # Arguments
    /// * `start` - Start frequency in the specified unit
    /// * `stop` - Stop frequency in the specified unit
    /// * `npoints` - Number of frequency points
    /// * `unit` - Frequency unit
    /// * `sweep_type` - Linear or logarithmic sweep
    ///
    /// Fails with `InvalidArgument` when `npoints` is zero or the generated
    /// points are not positive and strictly increasing (e.g. `start == stop`
    /// with more than one point).
    ///
    /// # Example
    /// ```
    /// use netman_core::frequency::{Frequency, FrequencyUnit, SweepType};
    /// let freq = Frequency::new(1.0, 10.0, 10, FrequencyUnit::GHz, SweepType::Linear).unwrap();
    /// assert_eq!(freq.npoints(), 10);
    /// ```
    pub fn new(
        start: f64,
        stop: f64,
        npoints: usize,
        unit: FrequencyUnit,
        sweep_type: SweepType,
    ) -> Result<Self> {
        let mult = unit.multiplier();
        let start_hz = start * mult;
        let stop_hz = stop * mult;

        let f = match (npoints, sweep_type) {
            (0, _) => Vec::new(),
            (1, _) => vec![start_hz],
            (_, SweepType::Linear) => {
                let step = (stop_hz - start_hz) / (npoints - 1) as f64;
                (0..npoints).map(|i| start_hz + i as f64 * step).collect()
            }
            (_, SweepType::Log) => {
                let log_start = start_hz.ln();
                let log_stop = stop_hz.ln();
                let log_step = (log_stop - log_start) / (npoints - 1) as f64;
                (0..npoints)
                    .map(|i| (log_start + i as f64 * log_step).exp())
                    .collect()
            }
        };

        validate_sweep(&f)?;
        Ok(Self {
            f,
            unit,
            sweep_type,
        })
    }

    /// Create from a measured frequency vector given in `unit`
    ///
    /// The values must be finite, positive and strictly increasing, and
    /// there must be at least one of them.
    pub fn from_f(f: Vec<f64>, unit: FrequencyUnit) -> Result<Self> {
        let mult = unit.multiplier();
        let f_hz: Vec<f64> = f.iter().map(|&x| x * mult).collect();
        Self::from_hz_in(f_hz, unit)
    }

    /// Create from a frequency vector in Hz
    pub fn from_hz(f: Vec<f64>) -> Result<Self> {
        Self::from_hz_in(f, FrequencyUnit::Hz)
    }

    /// Create from Hz values, keeping `unit` for display
    pub(crate) fn from_hz_in(f_hz: Vec<f64>, unit: FrequencyUnit) -> Result<Self> {
        validate_sweep(&f_hz)?;
        Ok(Self {
            f: f_hz,
            unit,
            sweep_type: SweepType::Linear, // actual sweep type unknown
        })
    }

    /// Get frequency vector in Hz
    #[inline]
    pub fn f(&self) -> &[f64] {
        &self.f
    }

    /// Get frequency vector in the current unit
    pub fn f_scaled(&self) -> Vec<f64> {
        let mult = self.unit.multiplier();
        self.f.iter().map(|&x| x / mult).collect()
    }

    /// Get the number of frequency points
    #[inline]
    pub fn npoints(&self) -> usize {
        self.f.len()
    }

    /// Get the start frequency in Hz
    #[inline]
    pub fn start(&self) -> f64 {
        *self.f.first().unwrap_or(&0.0)
    }

    /// Get the stop frequency in Hz
    #[inline]
    pub fn stop(&self) -> f64 {
        *self.f.last().unwrap_or(&0.0)
    }

    /// Get the current unit
    #[inline]
    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    /// Get the sweep type
    #[inline]
    pub fn sweep_type(&self) -> SweepType {
        self.sweep_type
    }
}

/// Check the sweep invariants on a vector of frequencies in Hz.
///
/// Returns the index of the first offending point inside the error message.
pub(crate) fn validate_sweep(f: &[f64]) -> Result<()> {
    if f.is_empty() {
        return Err(NetmanError::InvalidArgument(
            "frequency sweep must contain at least one point".to_string(),
        ));
    }
    if let Some(idx) = f.iter().position(|x| !x.is_finite() || *x <= 0.0) {
        return Err(NetmanError::InvalidArgument(format!(
            "frequency at index {} is not a positive finite value ({})",
            idx, f[idx]
        )));
    }
    if let Some(idx) = f.windows(2).position(|w| w[1] <= w[0]) {
        return Err(NetmanError::InvalidArgument(format!(
            "frequency sweep is not strictly increasing at index {} ({} -> {})",
            idx + 1,
            f[idx],
            f[idx + 1]
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_create_linear_sweep() {
        let freq = Frequency::new(1.0, 10.0, 10, FrequencyUnit::GHz, SweepType::Linear).unwrap();

        // Stored in Hz internally
        assert_eq!(freq.npoints(), 10);
        assert_relative_eq!(freq.start(), 1e9, epsilon = 1.0);
        assert_relative_eq!(freq.stop(), 10e9, epsilon = 1.0);

        let f_scaled = freq.f_scaled();
        assert_relative_eq!(f_scaled[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(f_scaled[9], 10.0, epsilon = 1e-10);
    }

    #[test]
    fn test_create_log_sweep() {
        let freq = Frequency::new(1.0, 10.0, 10, FrequencyUnit::GHz, SweepType::Log).unwrap();

        assert_relative_eq!(freq.start(), 1e9, epsilon = 1.0);
        assert_relative_eq!(freq.stop(), 10e9, epsilon = 1.0);
        assert_eq!(freq.sweep_type(), SweepType::Log);

        // Constant ratio between adjacent points
        let f = freq.f();
        let ratios: Vec<f64> = f.windows(2).map(|w| w[1] / w[0]).collect();
        for i in 1..ratios.len() {
            assert_relative_eq!(ratios[i], ratios[0], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_new_rejects_degenerate_sweeps() {
        let err = Frequency::new(1.0, 2.0, 0, FrequencyUnit::GHz, SweepType::Linear).unwrap_err();
        assert!(matches!(err, NetmanError::InvalidArgument(_)));

        // start == stop only works for a single point
        assert!(Frequency::new(1.0, 1.0, 3, FrequencyUnit::GHz, SweepType::Linear).is_err());
        assert!(Frequency::new(1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Linear).is_ok());

        assert!(Frequency::new(0.0, 1.0, 5, FrequencyUnit::GHz, SweepType::Linear).is_err());
        assert!(Frequency::new(-1.0, 1.0, 1, FrequencyUnit::GHz, SweepType::Log).is_err());
        assert!(Frequency::new(2.0, 1.0, 4, FrequencyUnit::GHz, SweepType::Linear).is_err());
    }

    #[test]
    fn test_from_f() {
        let freq = Frequency::from_f(vec![1.0, 5.0, 200.0], FrequencyUnit::KHz).unwrap();

        assert_eq!(freq.npoints(), 3);
        assert_eq!(freq.unit(), FrequencyUnit::KHz);
        assert_relative_eq!(freq.f()[0], 1e3, epsilon = 1e-10);
        assert_relative_eq!(freq.f()[1], 5e3, epsilon = 1e-10);
        assert_relative_eq!(freq.f()[2], 200e3, epsilon = 1e-10);
    }

    #[test]
    fn test_from_hz_rejects_empty() {
        let err = Frequency::from_hz(vec![]).unwrap_err();
        assert!(matches!(err, NetmanError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_hz_rejects_non_increasing() {
        assert!(Frequency::from_hz(vec![1e9, 1e9]).is_err());
        assert!(Frequency::from_hz(vec![2e9, 1e9]).is_err());
    }

    #[test]
    fn test_from_hz_rejects_non_positive() {
        assert!(Frequency::from_hz(vec![0.0, 1e9]).is_err());
        assert!(Frequency::from_hz(vec![-1.0]).is_err());
        assert!(Frequency::from_hz(vec![f64::NAN]).is_err());
    }

    #[test]
    fn test_frequency_unit_multiplier() {
        assert_eq!(FrequencyUnit::Hz.multiplier(), 1.0);
        assert_eq!(FrequencyUnit::KHz.multiplier(), 1e3);
        assert_eq!(FrequencyUnit::MHz.multiplier(), 1e6);
        assert_eq!(FrequencyUnit::GHz.multiplier(), 1e9);
        assert_eq!(FrequencyUnit::THz.multiplier(), 1e12);
    }
}
