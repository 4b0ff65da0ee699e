// SPDX-License-Identifier: AGPL-3.0-only

//! Baryon two-point contraction.
//!
//! Octet/decuplet interpolators of the form ε_{abc} (q₁ᵀ C Γ_src q₂) q₃
//! produce two Wick pairings at the sink. Both are built from one shared
//! diquark block
//!
//!   D[c][c'] = Σ ε_{abc} ε_{a'b'c'} (Γ_src S₁ Γ_snk)^{aa'} ·_spin S₂^{bb'}
//!
//! and then close differently through the third quark under the chosen
//! spin projection matrix T:
//!
//!   term0 = Σ_{cc'} Tr_s[D^{cc'}] · Tr_s[T · S₃^{c'c}]
//!   term1 = Σ_{cc'} Tr_s[T · S₃^{c'c} · D^{cc'}]
//!
//! The flavor structure decides the weights: distinct quarks keep only
//! the closed-loop pairing, identical quarks open the exchange terms.

use crate::error::{Error, Result};
use crate::lattice::complex_f64::Complex64;
use crate::lattice::gamma::Gamma;
use crate::lattice::spinor::{cross_color_trace, gamma_mul_both, SpinMatrix, Spinor, N_COLOR};

/// Flavor content of the interpolator, fixing the Wick-term weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BaryonFlavor {
    /// Three distinct flavors (Λ-like): term0 only.
    Uds,
    /// Two identical plus one distinct (nucleon-like): term0 + term1.
    Uud,
    /// Three identical (Δ/Ω-like): 2·term0 + 4·term1.
    Uuu,
}

impl BaryonFlavor {
    /// Parse a flavor tag.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for anything but `uds`, `uud` or `uuu`.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "uds" => Ok(Self::Uds),
            "uud" => Ok(Self::Uud),
            "uuu" => Ok(Self::Uuu),
            other => Err(Error::Config(format!("unknown baryon flavor tag '{other}'"))),
        }
    }

    /// `(w0, w1)` weights of the two Wick terms.
    #[must_use]
    pub const fn weights(self) -> (f64, f64) {
        match self {
            Self::Uds => (1.0, 0.0),
            Self::Uud => (1.0, 1.0),
            Self::Uuu => (2.0, 4.0),
        }
    }
}

/// The two raw Wick terms before flavor weighting. Exposed so the weight
/// identities stay testable independently of the flavor table.
#[must_use]
pub fn terms(
    g_src: Gamma,
    g_snk: Gamma,
    s1: &Spinor,
    s2: &Spinor,
    s3: &Spinor,
    proj: &SpinMatrix,
) -> (Complex64, Complex64) {
    let wrapped = gamma_mul_both(g_src, s1, g_snk);
    let diquark = cross_color_trace(&wrapped, s2);
    let b3 = s3.color_blocks();
    let mut t0 = Complex64::ZERO;
    let mut t1 = Complex64::ZERO;
    for c in 0..N_COLOR {
        for cp in 0..N_COLOR {
            let third = *proj * b3[cp][c];
            t0 += diquark[c][cp].trace() * third.trace();
            t1 += (third * diquark[c][cp]).trace();
        }
    }
    (t0, t1)
}

/// Flavor-weighted baryon correlator at one site.
#[must_use]
pub fn contract(
    g_src: Gamma,
    g_snk: Gamma,
    s1: &Spinor,
    s2: &Spinor,
    s3: &Spinor,
    proj: &SpinMatrix,
    flavor: BaryonFlavor,
) -> Complex64 {
    let (t0, t1) = terms(g_src, g_snk, s1, s2, s3, proj);
    let (w0, w1) = flavor.weights();
    t0.scale(w0) + t1.scale(w1)
}
