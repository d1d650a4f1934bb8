//! Normalized mean-square error between S-parameter datasets
//!
//! Reflection (diagonal) and transmission (off-diagonal) terms are
//! compared separately, summed over all port pairs and frequencies.

use super::core::{Network, NetworkData};
use crate::config::{NmseOptions, NmseScale};
use crate::error::{NetmanError, Result};
use crate::math::power_2_db10_guarded;

/// What a network is compared against
#[derive(Clone, Copy)]
pub enum NmseReference<'a> {
    /// A measured or simulated reference with the same ports and points
    Measured(&'a dyn NetworkData),
    /// An infinitesimally short, perfectly matched line: S_ii = 0, S_ij = 1
    ///
    /// The reflection figure is the raw reflected power sum, because the
    /// ideal reflected power is zero and cannot normalize it.
    IdealLine,
}

/// NMSE of reflection and transmission terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NmseResult {
    pub reflect: f64,
    pub transm: f64,
    /// Scale `reflect` and `transm` are expressed in
    pub scale: NmseScale,
}

/// Compare `comp` against `reference`
///
/// With a measured reference:
/// ```text
/// reflect = Σ_i Σ_f |Sc_ii - Sr_ii|² / Σ_i Σ_f |Sr_ii|²
/// transm  = Σ_i≠j Σ_f |Sc_ij - Sr_ij|² / Σ_i≠j Σ_f |Sr_ij|²
/// ```
/// Against the ideal line the reflection sum stays un-normalized and the
/// transmission sum is divided by `nfreq` per off-diagonal pair. A zero
/// error sum is 0 whatever the denominator; a nonzero error over a zero
/// denominator is +inf.
pub fn calc_nmse<C: NetworkData + ?Sized>(
    comp: &C,
    reference: NmseReference<'_>,
    opts: &NmseOptions,
) -> Result<NmseResult> {
    comp.validate()?;

    let nports = comp.nports();
    let nfreq = comp.nfreq();
    let sc = comp.s();

    let mut ref_numer = 0.0;
    let mut ref_denom = 0.0;
    let mut trans_numer = 0.0;
    let mut trans_denom = 0.0;

    let (reflect, transm) = match reference {
        NmseReference::Measured(r) => {
            r.validate()?;
            if r.nports() != nports {
                return Err(NetmanError::PortCountMismatch {
                    expected: nports,
                    actual: r.nports(),
                });
            }
            if r.nfreq() != nfreq {
                return Err(NetmanError::LengthMismatch {
                    expected: nfreq,
                    actual: r.nfreq(),
                });
            }
            let sr = r.s();

            for row in 0..nports {
                for col in 0..nports {
                    for f in 0..nfreq {
                        let err = (sc[[f, row, col]] - sr[[f, row, col]]).norm_sqr();
                        let power = sr[[f, row, col]].norm_sqr();
                        if row == col {
                            ref_numer += err;
                            ref_denom += power;
                        } else {
                            trans_numer += err;
                            trans_denom += power;
                        }
                    }
                }
            }
            (normalized(ref_numer, ref_denom), normalized(trans_numer, trans_denom))
        }
        NmseReference::IdealLine => {
            for row in 0..nports {
                for col in 0..nports {
                    if row == col {
                        for f in 0..nfreq {
                            ref_numer += sc[[f, row, col]].norm_sqr();
                        }
                    } else {
                        for f in 0..nfreq {
                            trans_numer += (sc[[f, row, col]] - 1.0).norm_sqr();
                        }
                        trans_denom += nfreq as f64;
                    }
                }
            }
            (ref_numer, normalized(trans_numer, trans_denom))
        }
    };

    let result = match opts.scale {
        NmseScale::Linear => NmseResult {
            reflect,
            transm,
            scale: NmseScale::Linear,
        },
        NmseScale::Db => NmseResult {
            reflect: power_2_db10_guarded(reflect),
            transm: power_2_db10_guarded(transm),
            scale: NmseScale::Db,
        },
    };

    if opts.echo {
        match result.scale {
            NmseScale::Linear => tracing::info!(
                "S-Parameter comparison: reflect - NMSE: {:5.3}, transm. - NMSE: {:5.3}",
                result.reflect,
                result.transm
            ),
            NmseScale::Db => tracing::info!(
                "S-Parameter comparison: reflect - NMSE: {:3.1}dB, transm. - NMSE: {:3.1}dB",
                result.reflect,
                result.transm
            ),
        }
    }

    Ok(result)
}

/// `numer / denom`, with an exact match mapped to 0 even when `denom` is 0
fn normalized(numer: f64, denom: f64) -> f64 {
    if numer == 0.0 {
        0.0
    } else {
        numer / denom
    }
}

impl Network {
    /// NMSE of this network against `reference`
    pub fn nmse(&self, reference: NmseReference<'_>, opts: &NmseOptions) -> Result<NmseResult> {
        calc_nmse(self, reference, opts)
    }
}
