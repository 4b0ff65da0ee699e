// SPDX-License-Identifier: AGPL-3.0-only

//! Rarita-Schwinger spin projectors and parity projection.
//!
//! A spin-3/2 interpolating field with one vector index μ couples to both
//! spin-3/2 and spin-1/2 states. The projectors below separate them at
//! definite spatial momentum p:
//!
//!   P^{3/2}_{μν} = δ_{μν} − γ_μ γ_ν / 3 − (p̸ γ_μ p_ν + p_μ γ_ν p̸) / (3 p²)
//!   P^{1/2}_{11,μν} = γ_μ γ_ν / 3 − p_μ p_ν / p² + (p̸ γ_μ p_ν + p_μ γ_ν p̸) / (3 p²)
//!   P^{1/2}_{22,μν} = p_μ p_ν / p²
//!   P^{1/2}_{12,μν} = (p_μ p_ν − p̸ γ_μ p_ν) / (√3 p²)
//!   P^{1/2}_{21,μν} = (p̸ p_μ γ_ν − p_μ p_ν) / (√3 p²)
//!
//! in the Euclidean metric where {γ_μ, γ_ν} = 2 δ_{μν} and p̸² = p².
//! The set is complete (P^{3/2} + P^{1/2}_{11} + P^{1/2}_{22} = δ_{μν})
//! and obeys the transfer algebra P_{ij} P_{kl} = δ_{jk} P_{il}.
//!
//! Vector indices run over all four directions; the momentum is purely
//! spatial, so p_t = 0 throughout.
//!
//! # References
//!
//! - Benmerrouche, Davidson & Mukhopadhyay, PRC 39, 2339 (1989)
//! - Zanotti et al., PRD 68, 054506 (2003) — lattice usage at finite p

use crate::error::{Error, Result};
use crate::lattice::gamma::GammaTable;
use crate::lattice::spinor::SpinMatrix;

/// p̸ = Σ_j p_j γ_j over the three spatial directions.
#[must_use]
pub fn slash(p: [f64; 3], table: &GammaTable) -> SpinMatrix {
    let mut out = SpinMatrix::ZERO;
    for (j, &pj) in p.iter().enumerate() {
        if pj != 0.0 {
            out = out + SpinMatrix::from_gamma(table.generator(j)).scale(pj);
        }
    }
    out
}

/// One member of the spin-3/2 / spin-1/2 projector set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinProjector {
    /// P^{3/2}: the pure spin-3/2 part.
    ThreeHalf,
    /// P^{1/2}_{11}.
    Half11,
    /// P^{1/2}_{12} transfer projector.
    Half12,
    /// P^{1/2}_{21} transfer projector.
    Half21,
    /// P^{1/2}_{22}.
    Half22,
}

impl SpinProjector {
    /// The (μ, ν) component at spatial momentum `p`.
    ///
    /// Every member divides by p², so zero momentum is rejected; at p = 0
    /// the spin-1/2 pieces collapse and no projection is meaningful.
    pub fn matrix(
        self,
        table: &GammaTable,
        p: [f64; 3],
        mu: usize,
        nu: usize,
    ) -> Result<SpinMatrix> {
        let psq = p[0] * p[0] + p[1] * p[1] + p[2] * p[2];
        if psq == 0.0 {
            return Err(Error::InvalidInput(
                "spin projectors are undefined at zero momentum".into(),
            ));
        }
        let p4 = [p[0], p[1], p[2], 0.0];
        let pmu = p4[mu];
        let pnu = p4[nu];
        let gmu = SpinMatrix::from_gamma(table.generator(mu));
        let gnu = SpinMatrix::from_gamma(table.generator(nu));
        let ps = slash(p, table);
        let delta = if mu == nu {
            SpinMatrix::IDENTITY
        } else {
            SpinMatrix::ZERO
        };
        // p̸ γ_μ p_ν + p_μ γ_ν p̸, the mixed term shared by P32 and P11
        let mixed = (ps * gmu).scale(pnu) + (gnu * ps).scale(pmu);
        let m = match self {
            Self::ThreeHalf => {
                delta - (gmu * gnu).scale(1.0 / 3.0) - mixed.scale(1.0 / (3.0 * psq))
            }
            Self::Half11 => {
                (gmu * gnu).scale(1.0 / 3.0) - delta_pp(pmu, pnu, psq)
                    + mixed.scale(1.0 / (3.0 * psq))
            }
            Self::Half22 => delta_pp(pmu, pnu, psq),
            Self::Half12 => {
                (delta_pp(pmu, pnu, psq) - (ps * gmu).scale(pnu / psq)).scale(1.0 / 3f64.sqrt())
            }
            Self::Half21 => {
                ((ps * gnu).scale(pmu / psq) - delta_pp(pmu, pnu, psq)).scale(1.0 / 3f64.sqrt())
            }
        };
        Ok(m)
    }
}

/// p_μ p_ν / p² times the spinor identity.
fn delta_pp(pmu: f64, pnu: f64, psq: f64) -> SpinMatrix {
    SpinMatrix::IDENTITY.scale(pmu * pnu / psq)
}

/// Parity projector (1 ± γ_t) / 2.
#[must_use]
pub fn parity_projector(table: &GammaTable, positive: bool) -> SpinMatrix {
    let gt = SpinMatrix::from_gamma(table.generator(3));
    let signed = if positive { gt } else { gt.scale(-1.0) };
    (SpinMatrix::IDENTITY + signed).scale(0.5)
}
