//! Mixed-mode S-parameter conversions
//!
//! Provides conversions between single-ended and differential/common-mode
//! S-parameters for 4-port networks.
//!
//! Mixed-mode S-parameters describe the behavior of differential signaling
//! systems in terms of differential and common mode.

use ndarray::{Array1, Array3, ArrayView1};
use num_complex::Complex64;

use super::core::Network;
use super::extract::{sparam_key, SParamMap};
use crate::constants::NEAR_ZERO;
use crate::error::{NetmanError, Result};
use crate::frequency::Frequency;
use crate::math::{complex_2_db, magnitude_2_db};

/// Excitation / response mode of a differential pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Differential,
    Common,
}

impl Mode {
    /// Key token (`d` or `c`)
    pub fn token(self) -> char {
        match self {
            Mode::Differential => 'd',
            Mode::Common => 'c',
        }
    }

    pub fn from_token(c: char) -> Option<Self> {
        match c {
            'd' => Some(Mode::Differential),
            'c' => Some(Mode::Common),
            _ => None,
        }
    }

    /// Row of the mode matrix for 1-based logical port `port`
    fn basis_index(self, port: usize) -> usize {
        let offset = match self {
            Mode::Differential => 0,
            Mode::Common => 1,
        };
        2 * (port - 1) + offset
    }
}

/// Mixed-mode keys in the column order of a ZNA export
pub const MIXED_MODE_KEYS: [&str; 16] = [
    "Sdd11", "Sdd12", "Sdc11", "Sdc12", "Sdd21", "Sdd22", "Sdc21", "Sdc22", "Scd11", "Scd12",
    "Scc11", "Scc12", "Scd21", "Scd22", "Scc21", "Scc22",
];

/// Key for a mixed-mode parameter, e.g. `Sdc21`
pub fn mixed_mode_key(response: Mode, stimulus: Mode, i: usize, j: usize) -> String {
    format!("S{}{}{}{}", response.token(), stimulus.token(), i, j)
}

/// Parse `S{mode}{mode}{i}{j}` into its parts (ports are 1-based, 1 or 2)
pub fn parse_mixed_mode_key(key: &str) -> Option<(Mode, Mode, usize, usize)> {
    let mut chars = key.chars();
    if chars.next()? != 'S' {
        return None;
    }
    let response = Mode::from_token(chars.next()?)?;
    let stimulus = Mode::from_token(chars.next()?)?;
    let i = chars.next()?.to_digit(10)? as usize;
    let j = chars.next()?.to_digit(10)? as usize;
    if chars.next().is_some() || !(1..=2).contains(&i) || !(1..=2).contains(&j) {
        return None;
    }
    Some((response, stimulus, i, j))
}

/// Mode matrix `T`, rows ordered d1, c1, d2, c2
///
/// ```text
/// T = 1/√2 * | 1 -1  0  0 |  (d1)
///            | 1  1  0  0 |  (c1)
///            | 0  0  1 -1 |  (d2)
///            | 0  0  1  1 |  (c2)
/// ```
///
/// Orthonormal, so `T⁻¹ = Tᵀ`.
fn mode_matrix() -> [[f64; 4]; 4] {
    let k = std::f64::consts::FRAC_1_SQRT_2;
    [
        [k, -k, 0.0, 0.0],
        [k, k, 0.0, 0.0],
        [0.0, 0.0, k, -k],
        [0.0, 0.0, k, k],
    ]
}

/// `T · S · Tᵀ` for one frequency point
fn to_mode_basis(t: &[[f64; 4]; 4], s: &[[Complex64; 4]; 4]) -> [[Complex64; 4]; 4] {
    let mut out = [[Complex64::new(0.0, 0.0); 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            let mut sum = Complex64::new(0.0, 0.0);
            for k in 0..4 {
                for l in 0..4 {
                    sum += s[k][l] * (t[i][k] * t[j][l]);
                }
            }
            out[i][j] = sum;
        }
    }
    out
}

/// `Tᵀ · M · T` for one frequency point
fn from_mode_basis(t: &[[f64; 4]; 4], m: &[[Complex64; 4]; 4]) -> [[Complex64; 4]; 4] {
    let mut out = [[Complex64::new(0.0, 0.0); 4]; 4];
    for k in 0..4 {
        for l in 0..4 {
            let mut sum = Complex64::new(0.0, 0.0);
            for i in 0..4 {
                for j in 0..4 {
                    sum += m[i][j] * (t[i][k] * t[j][l]);
                }
            }
            out[k][l] = sum;
        }
    }
    out
}

/// Mixed-mode S-parameter matrix for a 4-port network
///
/// Organized as:
/// ```text
/// | Sdd11 Sdd12 | Sdc11 Sdc12 |
/// | Sdd21 Sdd22 | Sdc21 Sdc22 |
/// |-------------|-------------|
/// | Scd11 Scd12 | Scc11 Scc12 |
/// | Scd21 Scd22 | Scc21 Scc22 |
/// ```
///
/// The first mode letter is the response, the second the stimulus.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedModeParams {
    frequency: Frequency,
    /// Differential-to-differential S-parameters [nfreq, 2, 2]
    sdd: Array3<Complex64>,
    /// Differential response to common stimulus [nfreq, 2, 2]
    sdc: Array3<Complex64>,
    /// Common response to differential stimulus [nfreq, 2, 2]
    scd: Array3<Complex64>,
    /// Common-to-common S-parameters [nfreq, 2, 2]
    scc: Array3<Complex64>,
}

impl MixedModeParams {
    /// All-zero parameters over `frequency`
    pub(crate) fn zeros(frequency: Frequency) -> Self {
        let nfreq = frequency.npoints();
        Self {
            frequency,
            sdd: Array3::zeros((nfreq, 2, 2)),
            sdc: Array3::zeros((nfreq, 2, 2)),
            scd: Array3::zeros((nfreq, 2, 2)),
            scc: Array3::zeros((nfreq, 2, 2)),
        }
    }

    /// Convert single-ended 4-port S-parameters `[nfreq, 4, 4]`
    fn from_single_ended(frequency: Frequency, s: &Array3<Complex64>) -> Self {
        let t = mode_matrix();
        let mut mm = Self::zeros(frequency);

        for f in 0..mm.nfreq() {
            let mut s_f = [[Complex64::new(0.0, 0.0); 4]; 4];
            for (k, row) in s_f.iter_mut().enumerate() {
                for (l, v) in row.iter_mut().enumerate() {
                    *v = s[[f, k, l]];
                }
            }
            let m = to_mode_basis(&t, &s_f);

            for &response in &[Mode::Differential, Mode::Common] {
                for &stimulus in &[Mode::Differential, Mode::Common] {
                    for i in 1..=2 {
                        for j in 1..=2 {
                            let value = m[response.basis_index(i)][stimulus.basis_index(j)];
                            mm.block_mut(response, stimulus)[[f, i - 1, j - 1]] = value;
                        }
                    }
                }
            }
        }
        mm
    }

    /// Frequency axis
    pub fn frequency(&self) -> &Frequency {
        &self.frequency
    }

    /// Number of frequency points
    pub fn nfreq(&self) -> usize {
        self.frequency.npoints()
    }

    pub fn sdd(&self) -> &Array3<Complex64> {
        &self.sdd
    }

    pub fn sdc(&self) -> &Array3<Complex64> {
        &self.sdc
    }

    pub fn scd(&self) -> &Array3<Complex64> {
        &self.scd
    }

    pub fn scc(&self) -> &Array3<Complex64> {
        &self.scc
    }

    /// The 2x2-per-frequency block for a (response, stimulus) mode pair
    pub fn block(&self, response: Mode, stimulus: Mode) -> &Array3<Complex64> {
        match (response, stimulus) {
            (Mode::Differential, Mode::Differential) => &self.sdd,
            (Mode::Differential, Mode::Common) => &self.sdc,
            (Mode::Common, Mode::Differential) => &self.scd,
            (Mode::Common, Mode::Common) => &self.scc,
        }
    }

    pub(crate) fn block_mut(&mut self, response: Mode, stimulus: Mode) -> &mut Array3<Complex64> {
        match (response, stimulus) {
            (Mode::Differential, Mode::Differential) => &mut self.sdd,
            (Mode::Differential, Mode::Common) => &mut self.sdc,
            (Mode::Common, Mode::Differential) => &mut self.scd,
            (Mode::Common, Mode::Common) => &mut self.scc,
        }
    }

    /// One parameter over frequency; ports are 1-based
    pub fn param(
        &self,
        response: Mode,
        stimulus: Mode,
        i: usize,
        j: usize,
    ) -> Option<ArrayView1<'_, Complex64>> {
        if !(1..=2).contains(&i) || !(1..=2).contains(&j) {
            return None;
        }
        Some(
            self.block(response, stimulus)
                .slice(ndarray::s![.., i - 1, j - 1]),
        )
    }

    /// Look up a parameter by key, e.g. `"Sdd21"`
    pub fn get(&self, key: &str) -> Option<Array1<Complex64>> {
        let (response, stimulus, i, j) = parse_mixed_mode_key(key)?;
        self.param(response, stimulus, i, j).map(|v| v.to_owned())
    }

    /// All sixteen parameters as a keyed map
    pub fn to_sparam_map(&self) -> SParamMap {
        MIXED_MODE_KEYS
            .iter()
            .filter_map(|&key| self.get(key).map(|v| (key.to_string(), v)))
            .collect()
    }

    /// Convert back to single-ended S-parameters `[nfreq, 4, 4]`
    pub fn to_single_ended(&self) -> Array3<Complex64> {
        let t = mode_matrix();
        let nfreq = self.nfreq();
        let mut s = Array3::<Complex64>::zeros((nfreq, 4, 4));

        for f in 0..nfreq {
            let mut m = [[Complex64::new(0.0, 0.0); 4]; 4];
            for &response in &[Mode::Differential, Mode::Common] {
                for &stimulus in &[Mode::Differential, Mode::Common] {
                    let block = self.block(response, stimulus);
                    for i in 1..=2 {
                        for j in 1..=2 {
                            m[response.basis_index(i)][stimulus.basis_index(j)] =
                                block[[f, i - 1, j - 1]];
                        }
                    }
                }
            }
            let s_f = from_mode_basis(&t, &m);
            for (k, row) in s_f.iter().enumerate() {
                for (l, v) in row.iter().enumerate() {
                    s[[f, k, l]] = *v;
                }
            }
        }
        s
    }

    /// Differential insertion loss (Sdd21) in dB
    pub fn sdd21_db(&self) -> Array1<f64> {
        self.sdd.slice(ndarray::s![.., 1, 0]).mapv(complex_2_db)
    }

    /// Differential return loss (Sdd11) in dB
    pub fn sdd11_db(&self) -> Array1<f64> {
        self.sdd.slice(ndarray::s![.., 0, 0]).mapv(complex_2_db)
    }

    /// Common-mode rejection ratio in dB
    ///
    /// CMRR = |Sdd21| / |Scd21|
    pub fn cmrr_db(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.nfreq(), |f| {
            let sdd21 = self.sdd[[f, 1, 0]].norm();
            let scd21 = self.scd[[f, 1, 0]].norm();
            if scd21 > NEAR_ZERO {
                magnitude_2_db(sdd21 / scd21)
            } else {
                f64::INFINITY
            }
        })
    }
}

impl Network {
    /// Convert 4-port single-ended S-parameters to mixed-mode
    ///
    /// Port mapping (standard 4-port differential):
    /// - Port 1, 2: Differential pair 1 (positive, negative)
    /// - Port 3, 4: Differential pair 2 (positive, negative)
    ///
    /// S_mm = T * S * T^T, applied at every frequency point.
    pub fn to_mixed_mode(&self) -> Result<MixedModeParams> {
        if self.nports() != 4 {
            return Err(NetmanError::PortCountMismatch {
                expected: 4,
                actual: self.nports(),
            });
        }
        Ok(MixedModeParams::from_single_ended(
            self.frequency.clone(),
            &self.s,
        ))
    }
}

/// Convert a keyed single-ended 4-port map (`S11`..`S44`) to mixed-mode keys
///
/// Output keys are `S{mode_row}{mode_col}{i}{j}` (`Sdd11`, `Sdc21`, ...).
pub fn mixed_mode_from_sparams(sparams: &SParamMap) -> Result<SParamMap> {
    let nfreq = sparams
        .get("S11")
        .map(|v| v.len())
        .ok_or_else(|| NetmanError::InvalidInputKind("missing S-parameter 'S11'".to_string()))?;

    let mut s = Array3::<Complex64>::zeros((nfreq, 4, 4));
    for row in 0..4 {
        for col in 0..4 {
            let key = sparam_key(4, row + 1, col + 1);
            let values = sparams.get(&key).ok_or_else(|| {
                NetmanError::InvalidInputKind(format!("missing S-parameter '{}'", key))
            })?;
            if values.len() != nfreq {
                return Err(NetmanError::LengthMismatch {
                    expected: nfreq,
                    actual: values.len(),
                });
            }
            s.slice_mut(ndarray::s![.., row, col]).assign(values);
        }
    }
    if sparams.len() != 16 {
        return Err(NetmanError::InvalidInputKind(format!(
            "mixed-mode conversion needs exactly the 16 keys of a 4-port network, got {}",
            sparams.len()
        )));
    }

    let t = mode_matrix();
    let mut out = SParamMap::new();
    for &key in MIXED_MODE_KEYS.iter() {
        out.insert(key.to_string(), Array1::zeros(nfreq));
    }
    for f in 0..nfreq {
        let mut s_f = [[Complex64::new(0.0, 0.0); 4]; 4];
        for (k, row) in s_f.iter_mut().enumerate() {
            for (l, v) in row.iter_mut().enumerate() {
                *v = s[[f, k, l]];
            }
        }
        let m = to_mode_basis(&t, &s_f);
        for (key, values) in out.iter_mut() {
            if let Some((response, stimulus, i, j)) = parse_mixed_mode_key(key) {
                values[f] = m[response.basis_index(i)][stimulus.basis_index(j)];
            }
        }
    }
    Ok(out)
}
