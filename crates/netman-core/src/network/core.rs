//! Core Network struct and constructors
//!
//! Contains the fundamental Network data structure and the `NetworkData`
//! trait through which externally parsed networks enter the library.

use ndarray::{Array1, Array3};
use num_complex::Complex64;

use crate::constants::DEFAULT_Z0;
use crate::error::{NetmanError, Result};
use crate::frequency::{validate_sweep, Frequency};

/// Read-only view of a measured N-port network.
///
/// This is the seam to whatever parsed the measurement file: anything that
/// can report a port count, a frequency vector and an S-parameter array
/// indexed `[frequency, row, column]` (zero-based) can be analysed.
pub trait NetworkData {
    /// Number of ports `P`
    fn nports(&self) -> usize;

    /// Frequency vector in Hz
    fn f(&self) -> &[f64];

    /// S-parameter data `[nfreq, P, P]`
    fn s(&self) -> &Array3<Complex64>;

    /// Number of frequency points
    fn nfreq(&self) -> usize {
        self.f().len()
    }

    /// Check that the data has the shape of a network over a valid sweep
    fn validate(&self) -> Result<()> {
        check_shape(self.f().len(), self.s().shape(), self.nports())?;
        check_sweep(self.f())
    }
}

/// An N-port electrical network
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    /// Frequency data
    pub(crate) frequency: Frequency,
    /// S-parameter data [nfreq, nports, nports]
    pub(crate) s: Array3<Complex64>,
    /// Reference impedance (per port)
    pub(crate) z0: Array1<Complex64>,
    /// Network name
    pub(crate) name: Option<String>,
}

impl Network {
    /// Create a new Network from S-parameters
    ///
    /// Fails with `InvalidInputKind` unless `s` is `[nfreq, P, P]` with
    /// `P >= 1`, `nfreq` equal to the sweep length, one `z0` per port and
    /// a positive, strictly increasing sweep.
    pub fn new(frequency: Frequency, s: Array3<Complex64>, z0: Array1<Complex64>) -> Result<Self> {
        let nports = s.shape()[1];
        check_shape(frequency.npoints(), s.shape(), nports)?;
        check_sweep(frequency.f())?;
        if z0.len() != nports {
            return Err(NetmanError::InvalidInputKind(format!(
                "expected {} reference impedances, got {}",
                nports,
                z0.len()
            )));
        }

        Ok(Self {
            frequency,
            s,
            z0,
            name: None,
        })
    }

    /// Create a Network with every port referenced to `DEFAULT_Z0`
    pub fn with_default_z0(frequency: Frequency, s: Array3<Complex64>) -> Result<Self> {
        let nports = s.shape()[1];
        let z0 = Array1::from_elem(nports, Complex64::new(DEFAULT_Z0, 0.0));
        Self::new(frequency, s, z0)
    }

    /// Attach a display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Network name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the number of ports
    #[inline]
    pub fn nports(&self) -> usize {
        self.s.shape()[1]
    }

    /// Get the number of frequency points
    #[inline]
    pub fn nfreq(&self) -> usize {
        self.s.shape()[0]
    }
}

impl NetworkData for Network {
    fn nports(&self) -> usize {
        Network::nports(self)
    }

    fn f(&self) -> &[f64] {
        self.frequency.f()
    }

    fn s(&self) -> &Array3<Complex64> {
        &self.s
    }
}

/// Shape check shared by `Network::new` and `NetworkData::validate`.
pub(crate) fn check_shape(nfreq: usize, shape: &[usize], nports: usize) -> Result<()> {
    if shape.len() != 3 {
        return Err(NetmanError::InvalidInputKind(format!(
            "scattering data must be 3-dimensional, got {} dimensions",
            shape.len()
        )));
    }
    if nports == 0 {
        return Err(NetmanError::InvalidInputKind(
            "network must have at least one port".to_string(),
        ));
    }
    if shape[1] != nports || shape[2] != nports {
        return Err(NetmanError::InvalidInputKind(format!(
            "scattering matrix is {}x{}, expected {}x{}",
            shape[1], shape[2], nports, nports
        )));
    }
    if nfreq == 0 {
        return Err(NetmanError::InvalidInputKind(
            "network has no frequency points".to_string(),
        ));
    }
    if shape[0] != nfreq {
        return Err(NetmanError::InvalidInputKind(format!(
            "scattering data has {} frequency points, frequency axis has {}",
            shape[0], nfreq
        )));
    }
    Ok(())
}

/// Sweep check with failures reported as a malformed network.
pub(crate) fn check_sweep(f: &[f64]) -> Result<()> {
    match validate_sweep(f) {
        Err(NetmanError::InvalidArgument(msg)) => Err(NetmanError::InvalidInputKind(msg)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{FrequencyUnit, SweepType};

    #[test]
    fn test_network_creation() {
        let freq = Frequency::new(1.0, 10.0, 10, FrequencyUnit::GHz, SweepType::Linear).unwrap();

        let s = Array3::<Complex64>::zeros((10, 2, 2));
        let ntwk = Network::with_default_z0(freq, s).unwrap().with_name("thru");

        assert_eq!(ntwk.nports(), 2);
        assert_eq!(ntwk.nfreq(), 10);
        assert_eq!(ntwk.z0[0].re, DEFAULT_Z0);
        assert_eq!(ntwk.z0.len(), 2);
        assert_eq!(ntwk.name(), Some("thru"));
    }

    #[test]
    fn test_network_rejects_length_mismatch() {
        let freq = Frequency::new(1.0, 10.0, 10, FrequencyUnit::GHz, SweepType::Linear).unwrap();
        let s = Array3::<Complex64>::zeros((9, 2, 2));
        let z0 = Array1::from_elem(2, Complex64::new(DEFAULT_Z0, 0.0));

        let err = Network::new(freq, s, z0).unwrap_err();
        assert!(matches!(err, NetmanError::InvalidInputKind(_)));
    }

    #[test]
    fn test_network_rejects_non_square() {
        let freq = Frequency::new(1.0, 2.0, 2, FrequencyUnit::GHz, SweepType::Linear).unwrap();
        let s = Array3::<Complex64>::zeros((2, 2, 3));
        let z0 = Array1::from_elem(2, Complex64::new(DEFAULT_Z0, 0.0));

        assert!(Network::new(freq, s, z0).is_err());
    }

    #[test]
    fn test_network_rejects_zero_ports() {
        let freq = Frequency::new(1.0, 2.0, 2, FrequencyUnit::GHz, SweepType::Linear).unwrap();
        let s = Array3::<Complex64>::zeros((2, 0, 0));
        let z0 = Array1::<Complex64>::zeros(0);

        assert!(Network::new(freq, s, z0).is_err());
    }

    #[test]
    fn test_network_rejects_wrong_z0_length() {
        let freq = Frequency::new(1.0, 2.0, 2, FrequencyUnit::GHz, SweepType::Linear).unwrap();
        let s = Array3::<Complex64>::zeros((2, 2, 2));
        let z0 = Array1::from_elem(3, Complex64::new(DEFAULT_Z0, 0.0));

        assert!(Network::new(freq, s, z0).is_err());
    }
}
