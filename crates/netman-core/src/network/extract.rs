//! S-parameter extraction
//!
//! Pulls per-port-pair complex arrays out of a network into a keyed map
//! (`"S11"`, `"S21"`, ... with 1-based port numbers), and rebuilds a
//! network from such a map.
//!
//! Networks with 10 or more ports use `"S{row}_{col}"` for every key,
//! since plain concatenation makes `S1,11` and `S11,1` collide.

use std::collections::BTreeMap;

use ndarray::{Array1, Array2, Array3, ArrayView2};
use num_complex::Complex64;

use super::core::{Network, NetworkData};
use crate::config::ExtractOptions;
use crate::error::{NetmanError, Result};
use crate::frequency::Frequency;

/// S-parameter arrays keyed by port pair, all over one frequency axis
pub type SParamMap = BTreeMap<String, Array1<Complex64>>;

/// Everything extracted from a network in one pass
#[derive(Debug, Clone)]
pub struct SParamExtraction {
    /// Number of ports
    pub nports: usize,
    /// Number of frequency points
    pub nfreq: usize,
    /// Frequency vector in Hz
    pub f: Vec<f64>,
    /// `S{row}{col}` -> values over frequency
    pub sparams: SParamMap,
}

/// Largest port count whose keys are written without a separator
pub const MAX_COMPACT_KEY_PORTS: usize = 9;

/// Key for the single-ended parameter at 1-based `row`, `col` of an
/// `nports`-port network
pub fn sparam_key(nports: usize, row: usize, col: usize) -> String {
    if nports <= MAX_COMPACT_KEY_PORTS {
        format!("S{}{}", row, col)
    } else {
        format!("S{}_{}", row, col)
    }
}

/// Extract every S-parameter of `ntwk` into a keyed map
pub fn extract_sparams<N: NetworkData + ?Sized>(
    ntwk: &N,
    opts: &ExtractOptions,
) -> Result<SParamExtraction> {
    ntwk.validate()?;

    let nports = ntwk.nports();
    let nfreq = ntwk.nfreq();
    let s = ntwk.s();

    if opts.echo {
        tracing::info!("The network has {} ports.", nports);
    }

    let mut sparams = SParamMap::new();
    for row in 0..nports {
        for col in 0..nports {
            let values = s.slice(ndarray::s![.., row, col]).to_owned();
            sparams.insert(sparam_key(nports, row + 1, col + 1), values);
        }
    }
    tracing::debug!(nports, nfreq, keys = sparams.len(), "extracted S-parameters");

    Ok(SParamExtraction {
        nports,
        nfreq,
        f: ntwk.f().to_vec(),
        sparams,
    })
}

/// Flatten the scattering data to `[nfreq, P*P]`, row-major per frequency
pub fn flatten_sparams<N: NetworkData + ?Sized>(ntwk: &N) -> Result<Array2<Complex64>> {
    ntwk.validate()?;
    let nports = ntwk.nports();
    let s = ntwk.s();
    Ok(Array2::from_shape_fn(
        (ntwk.nfreq(), nports * nports),
        |(f, k)| s[[f, k / nports, k % nports]],
    ))
}

/// Map flattened per-frequency rows onto caller-supplied keys by position
///
/// Column `k` of `flat` becomes `keys[k]`. The key count must equal the
/// row width.
pub fn sparams_from_flat<S: AsRef<str>>(
    keys: &[S],
    flat: ArrayView2<'_, Complex64>,
) -> Result<SParamMap> {
    let width = flat.ncols();
    if keys.len() != width {
        return Err(NetmanError::DimensionMismatch {
            expected: width,
            actual: keys.len(),
        });
    }

    let mut sparams = SParamMap::new();
    for (k, key) in keys.iter().enumerate() {
        let key = key.as_ref();
        if sparams.contains_key(key) {
            return Err(NetmanError::InvalidArgument(format!(
                "duplicate output key '{}'",
                key
            )));
        }
        sparams.insert(key.to_string(), flat.column(k).to_owned());
    }
    Ok(sparams)
}

/// Extract with explicit output keys, in row-major `[row][col]` order
pub fn extract_sparams_keyed<N: NetworkData + ?Sized, S: AsRef<str>>(
    ntwk: &N,
    keys: &[S],
) -> Result<SParamMap> {
    let flat = flatten_sparams(ntwk)?;
    sparams_from_flat(keys, flat.view())
}

impl Network {
    /// Extract every S-parameter into a keyed map
    pub fn extract_sparams(&self, opts: &ExtractOptions) -> Result<SParamExtraction> {
        extract_sparams(self, opts)
    }

    /// Extract with explicit output keys, in row-major `[row][col]` order
    pub fn extract_sparams_keyed<S: AsRef<str>>(&self, keys: &[S]) -> Result<SParamMap> {
        extract_sparams_keyed(self, keys)
    }

    /// Rebuild a network from a complete `S{row}{col}` map
    ///
    /// The port count is inferred from the number of keys, which must be
    /// a perfect square, and fixes the key form looked up.
    pub fn from_sparam_map(
        frequency: Frequency,
        sparams: &SParamMap,
        z0: Array1<Complex64>,
    ) -> Result<Network> {
        let nports = (sparams.len() as f64).sqrt().round() as usize;
        if nports * nports != sparams.len() {
            return Err(NetmanError::DimensionMismatch {
                expected: nports * nports,
                actual: sparams.len(),
            });
        }

        let nfreq = frequency.npoints();
        let mut s = Array3::<Complex64>::zeros((nfreq, nports, nports));
        for row in 0..nports {
            for col in 0..nports {
                let key = sparam_key(nports, row + 1, col + 1);
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

        Network::new(frequency, s, z0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_Z0;
    use crate::frequency::{FrequencyUnit, SweepType};

    fn three_port() -> Network {
        let freq = Frequency::new(1.0, 3.0, 3, FrequencyUnit::GHz, SweepType::Linear).unwrap();
        let s = Array3::from_shape_fn((3, 3, 3), |(f, i, j)| {
            Complex64::new(f as f64, (10 * i + j) as f64)
        });
        let z0 = Array1::from_elem(3, Complex64::new(DEFAULT_Z0, 0.0));
        Network::new(freq, s, z0).unwrap()
    }

    #[test]
    fn test_extract_keys_and_values() {
        let ntwk = three_port();
        let ex = ntwk.extract_sparams(&ExtractOptions::default()).unwrap();

        assert_eq!(ex.nports, 3);
        assert_eq!(ex.nfreq, 3);
        assert_eq!(ex.f, ntwk.f().to_vec());
        assert_eq!(ex.sparams.len(), 9);

        for r in 1..=3 {
            for c in 1..=3 {
                let arr = &ex.sparams[&sparam_key(3, r, c)];
                assert_eq!(arr.len(), 3);
                for k in 0..3 {
                    assert_eq!(arr[k], ntwk.s()[[k, r - 1, c - 1]]);
                }
            }
        }
    }

    #[test]
    fn test_flat_key_mismatch() {
        let ntwk = three_port();
        let err = ntwk.extract_sparams_keyed(&["S11", "S12"]).unwrap_err();
        assert!(matches!(
            err,
            NetmanError::DimensionMismatch {
                expected: 9,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_flat_positional_mapping() {
        let ntwk = three_port();
        let keys = ["a", "b", "c", "d", "e", "f", "g", "h", "i"];
        let map = ntwk.extract_sparams_keyed(&keys).unwrap();

        // "f" is position 5 -> row 1, col 2
        assert_eq!(map["f"][2], ntwk.s()[[2, 1, 2]]);
        assert_eq!(map["a"][0], ntwk.s()[[0, 0, 0]]);
    }

    #[test]
    fn test_flat_duplicate_key() {
        let flat = Array2::<Complex64>::zeros((2, 2));
        let err = sparams_from_flat(&["S11", "S11"], flat.view()).unwrap_err();
        assert!(matches!(err, NetmanError::InvalidArgument(_)));
    }

    #[test]
    fn test_rebuild_from_map() {
        let ntwk = three_port();
        let ex = ntwk.extract_sparams(&ExtractOptions::default()).unwrap();
        let rebuilt =
            Network::from_sparam_map(ntwk.frequency().clone(), &ex.sparams, ntwk.z0().clone())
                .unwrap();
        assert_eq!(rebuilt, ntwk);
    }

    #[test]
    fn test_rebuild_rejects_incomplete_map() {
        let ntwk = three_port();
        let mut ex = ntwk.extract_sparams(&ExtractOptions::default()).unwrap();
        ex.sparams.remove("S23");
        let err =
            Network::from_sparam_map(ntwk.frequency().clone(), &ex.sparams, ntwk.z0().clone())
                .unwrap_err();
        assert!(matches!(err, NetmanError::DimensionMismatch { .. }));

        ex.sparams.insert("X99".to_string(), Array1::zeros(3));
        let err =
            Network::from_sparam_map(ntwk.frequency().clone(), &ex.sparams, ntwk.z0().clone())
                .unwrap_err();
        assert!(matches!(err, NetmanError::InvalidInputKind(_)));
    }
}
