//! Impedance extraction from S-parameter measurements
//!
//! Derives the impedance of a device under test from a reflection or
//! transmission coefficient, for the three usual fixture topologies.
//! Every relation is applied point by point.

use std::collections::BTreeMap;

use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;

use super::core::Network;
use crate::constants::NEAR_ZERO;
use crate::error::{NetmanError, Result};
use crate::frequency::validate_sweep;

/// Impedance arrays keyed by a caller-supplied label
pub type ImpedanceResult = BTreeMap<String, Array1<Complex64>>;

/// Fixture topology the S-parameter was measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpedanceTopology {
    /// DUT terminates one port; uses S11
    ///
    /// Z = z0 · (1 + S11) / (1 − S11)
    OnePort,
    /// DUT in series between two ports; uses S21
    ///
    /// Z = 2·z0 · (1 − S21) / S21
    SeriesThru,
    /// DUT shunted to ground between two ports; uses S21
    ///
    /// Z = z0 · S21 / (2 · (1 − S21))
    ShuntThru,
}

impl ImpedanceTopology {
    /// Impedance for a single S-parameter value
    ///
    /// Where the relation has a pole (|denominator| below `NEAR_ZERO`) the
    /// result is an open circuit, `+inf + 0j`.
    pub fn impedance(self, s: Complex64, z0: Complex64) -> Complex64 {
        let one = Complex64::new(1.0, 0.0);
        let (numer, denom) = match self {
            ImpedanceTopology::OnePort => (z0 * (one + s), one - s),
            ImpedanceTopology::SeriesThru => (z0 * 2.0 * (one - s), s),
            ImpedanceTopology::ShuntThru => (z0 * s, (one - s) * 2.0),
        };
        if denom.norm() < NEAR_ZERO {
            Complex64::new(f64::INFINITY, 0.0)
        } else {
            numer / denom
        }
    }

    /// Apply the relation over a frequency sweep
    ///
    /// Returns a single-entry map `label -> Z(f)` aligned with `frequency`.
    pub fn extract(
        self,
        frequency: &[f64],
        s: ArrayView1<'_, Complex64>,
        z0: Complex64,
        label: &str,
    ) -> Result<ImpedanceResult> {
        if label.is_empty() {
            return Err(NetmanError::InvalidArgument(
                "impedance label is empty".to_string(),
            ));
        }
        if !z0.re.is_finite() || !z0.im.is_finite() || z0.norm() < NEAR_ZERO {
            return Err(NetmanError::InvalidArgument(format!(
                "reference impedance must be finite and non-zero, got {}",
                z0
            )));
        }
        validate_sweep(frequency)?;
        if s.len() != frequency.len() {
            return Err(NetmanError::LengthMismatch {
                expected: frequency.len(),
                actual: s.len(),
            });
        }

        let z = s.mapv(|v| self.impedance(v, z0));
        let mut result = ImpedanceResult::new();
        result.insert(label.to_string(), z);
        Ok(result)
    }
}

/// Impedance from a one-port reflection measurement
pub fn impedance_one_port(
    frequency: &[f64],
    s11: ArrayView1<'_, Complex64>,
    z0: Complex64,
    label: &str,
) -> Result<ImpedanceResult> {
    ImpedanceTopology::OnePort.extract(frequency, s11, z0, label)
}

/// Impedance from a series-thru transmission measurement
pub fn impedance_series_thru(
    frequency: &[f64],
    s21: ArrayView1<'_, Complex64>,
    z0: Complex64,
    label: &str,
) -> Result<ImpedanceResult> {
    ImpedanceTopology::SeriesThru.extract(frequency, s21, z0, label)
}

/// Impedance from a shunt-thru transmission measurement
pub fn impedance_shunt_thru(
    frequency: &[f64],
    s21: ArrayView1<'_, Complex64>,
    z0: Complex64,
    label: &str,
) -> Result<ImpedanceResult> {
    ImpedanceTopology::ShuntThru.extract(frequency, s21, z0, label)
}

impl Network {
    /// Impedance seen at 1-based `port`, from its reflection coefficient
    pub fn impedance_one_port(&self, port: usize, label: &str) -> Result<ImpedanceResult> {
        if port == 0 || port > self.nports() {
            return Err(NetmanError::InvalidArgument(format!(
                "port {} out of range 1..={}",
                port,
                self.nports()
            )));
        }
        let p = port - 1;
        impedance_one_port(
            self.f(),
            self.s.slice(ndarray::s![.., p, p]),
            self.z0[p],
            label,
        )
    }

    /// Impedance of a series DUT in a 2-port thru fixture
    pub fn impedance_series_thru(&self, label: &str) -> Result<ImpedanceResult> {
        self.thru_impedance(ImpedanceTopology::SeriesThru, label)
    }

    /// Impedance of a shunt DUT in a 2-port thru fixture
    pub fn impedance_shunt_thru(&self, label: &str) -> Result<ImpedanceResult> {
        self.thru_impedance(ImpedanceTopology::ShuntThru, label)
    }

    fn thru_impedance(&self, topology: ImpedanceTopology, label: &str) -> Result<ImpedanceResult> {
        if self.nports() != 2 {
            return Err(NetmanError::PortCountMismatch {
                expected: 2,
                actual: self.nports(),
            });
        }
        topology.extract(
            self.f(),
            self.s.slice(ndarray::s![.., 1, 0]),
            self.z0[0],
            label,
        )
    }
}
