//! Impedance extraction tests
//!
//! Synthesizes fixture S-parameters for known loads and recovers the load.

use approx::assert_relative_eq;
use ndarray::{Array1, Array3};
use netman_core::constants::DEFAULT_Z0;
use netman_core::frequency::{Frequency, FrequencyUnit, SweepType};
use netman_core::network::{impedance_one_port, Network};
use netman_core::NetmanError;
use num_complex::Complex64;
use std::f64::consts::PI;

const Z0: f64 = DEFAULT_Z0;

/// Series R-L load over a sweep
fn rl_load(f: &[f64], r: f64, l: f64) -> Vec<Complex64> {
    f.iter()
        .map(|&f| Complex64::new(r, 2.0 * PI * f * l))
        .collect()
}

fn sweep() -> Frequency {
    Frequency::new(10.0, 1000.0, 21, FrequencyUnit::MHz, SweepType::Log).unwrap()
}

fn two_port_with_s21(freq: Frequency, s21: &[Complex64]) -> Network {
    let nfreq = freq.npoints();
    let mut s = Array3::<Complex64>::zeros((nfreq, 2, 2));
    for (k, &v) in s21.iter().enumerate() {
        s[[k, 1, 0]] = v;
        s[[k, 0, 1]] = v;
    }
    Network::new(freq, s, Array1::from_elem(2, Complex64::new(Z0, 0.0))).unwrap()
}

#[test]
fn test_one_port_recovers_load() {
    let freq = sweep();
    let z_load = rl_load(freq.f(), 20.0, 5e-9);
    let z0 = Complex64::new(Z0, 0.0);
    let s11: Array1<Complex64> = z_load.iter().map(|&z| (z - z0) / (z + z0)).collect();

    let res = impedance_one_port(freq.f(), s11.view(), z0, "imp_one").unwrap();
    let z = &res["imp_one"];
    assert_eq!(z.len(), freq.npoints());
    for (got, want) in z.iter().zip(z_load.iter()) {
        assert_relative_eq!(got.re, want.re, epsilon = 1e-9);
        assert_relative_eq!(got.im, want.im, epsilon = 1e-9);
    }
}

#[test]
fn test_network_one_port_uses_port_z0() {
    let freq = Frequency::new(1.0, 2.0, 2, FrequencyUnit::GHz, SweepType::Linear).unwrap();
    let s = Array3::from_elem((2, 1, 1), Complex64::new(0.0, 0.0));
    let z0 = Array1::from_elem(1, Complex64::new(75.0, 0.0));
    let ntwk = Network::new(freq, s, z0).unwrap();

    let res = ntwk.impedance_one_port(1, "dut").unwrap();
    assert_relative_eq!(res["dut"][0].re, 75.0, epsilon = 1e-12);

    let err = ntwk.impedance_one_port(2, "dut").unwrap_err();
    assert!(matches!(err, NetmanError::InvalidArgument(_)));
}

#[test]
fn test_series_thru_recovers_load() {
    let freq = sweep();
    let z_load = rl_load(freq.f(), 5.0, 10e-9);
    let s21: Vec<Complex64> = z_load
        .iter()
        .map(|&z| Complex64::new(2.0 * Z0, 0.0) / (z + 2.0 * Z0))
        .collect();
    let ntwk = two_port_with_s21(freq, &s21);

    let res = ntwk.impedance_series_thru("imp_series").unwrap();
    for (got, want) in res["imp_series"].iter().zip(z_load.iter()) {
        assert_relative_eq!(got.re, want.re, epsilon = 1e-8);
        assert_relative_eq!(got.im, want.im, epsilon = 1e-8);
    }
}

#[test]
fn test_shunt_thru_recovers_load() {
    let freq = sweep();
    let z_load = rl_load(freq.f(), 0.5, 1e-10);
    let s21: Vec<Complex64> = z_load
        .iter()
        .map(|&z| z * 2.0 / (z * 2.0 + Z0))
        .collect();
    let ntwk = two_port_with_s21(freq, &s21);

    let res = ntwk.impedance_shunt_thru("imp_shunt").unwrap();
    assert_eq!(res.len(), 1);
    for (got, want) in res["imp_shunt"].iter().zip(z_load.iter()) {
        assert_relative_eq!(got.re, want.re, epsilon = 1e-9);
        assert_relative_eq!(got.im, want.im, epsilon = 1e-9);
    }
}

#[test]
fn test_thru_requires_two_ports() {
    let freq = Frequency::new(1.0, 2.0, 2, FrequencyUnit::GHz, SweepType::Linear).unwrap();
    let ntwk = Network::new(
        freq,
        Array3::zeros((2, 1, 1)),
        Array1::from_elem(1, Complex64::new(Z0, 0.0)),
    )
    .unwrap();
    let err = ntwk.impedance_series_thru("z").unwrap_err();
    assert!(matches!(
        err,
        NetmanError::PortCountMismatch {
            expected: 2,
            actual: 1
        }
    ));
}
