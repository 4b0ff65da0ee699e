// SPDX-License-Identifier: AGPL-3.0-only

//! Diquark two-point contraction.
//!
//! Diagnostic channel: a color-diagonal pairing of two quark lines,
//!
//!   T[a][a'][b][b'] = Tr_s[(Γ_src S₁ Γ_snk)^{aa'} · S₂^{bb'}]
//!   C = Σ_{aa'} T[a][a'][a][a']
//!
//! The full N_color⁴ pair tensor is exposed because the tetraquark
//! kernel consumes the same object with the epsilon weights applied
//! instead of the diagonal.

use crate::lattice::complex_f64::Complex64;
use crate::lattice::gamma::Gamma;
use crate::lattice::spinor::{gamma_mul_both, Spinor, N_COLOR};

/// Spin-traced pair tensor `T[a][a'][b][b']` of two (already
/// gamma-structured) propagators.
#[must_use]
pub fn pair_tensor(
    p1: &Spinor,
    p2: &Spinor,
) -> [[[[Complex64; N_COLOR]; N_COLOR]; N_COLOR]; N_COLOR] {
    let b1 = p1.color_blocks();
    let b2 = p2.color_blocks();
    let mut t = [[[[Complex64::ZERO; N_COLOR]; N_COLOR]; N_COLOR]; N_COLOR];
    for a in 0..N_COLOR {
        for ap in 0..N_COLOR {
            for b in 0..N_COLOR {
                for bp in 0..N_COLOR {
                    t[a][ap][b][bp] = (b1[a][ap] * b2[b][bp]).trace();
                }
            }
        }
    }
    t
}

/// Color-diagonal diquark correlator at one site.
#[must_use]
pub fn contract(g_src: Gamma, g_snk: Gamma, s1: &Spinor, s2: &Spinor) -> Complex64 {
    let wrapped = gamma_mul_both(g_src, s1, g_snk);
    let t = pair_tensor(&wrapped, s2);
    let mut c = Complex64::ZERO;
    for a in 0..N_COLOR {
        for ap in 0..N_COLOR {
            c += t[a][ap][a][ap];
        }
    }
    c
}
