// SPDX-License-Identifier: AGPL-3.0-only

//! Pentaquark two-point contraction.
//!
//! Interpolator of the baryon × meson type:
//! ε_{abc} (q₁ᵀ C Γ_src q₂)_a{}_b q₃_c · (q̄₅ Γm q₄), color singlet in each
//! factor at the source, with the same structure at the sink. Two color
//! wirings survive the Wick expansion without quark exchange inside the
//! baryon:
//!
//! - direct: the baryon block closes among quarks 1-3 exactly as in
//!   [`baryon::terms`](crate::contract::baryon::terms) and the meson
//!   block closes its own spin⊗color loop,
//!
//!     C_dir = term0(D, S₃, T) · Tr_{s⊗c}[Γm_snk S̃₅ Γm_src S₄]
//!
//! - cross: the fifth (antiquark) line's color runs through the baryon
//!   instead of closing the meson loop, which threads the meson block
//!   into the third-quark line,
//!
//!     C_cross = term0(D, M · S₃, T),   M = Γm_snk S̃₅ Γm_src S₄
//!
//! with every sign carried by the two ε tensors inside the diquark block
//! D. The correlator is C_dir − C_cross, the relative sign coming from
//! the fermion-loop count of the two wirings.

use crate::lattice::complex_f64::Complex64;
use crate::lattice::gamma::{Gamma, N_SPIN};
use crate::lattice::spinor::{
    cross_color_trace, gamma_mul_both, spinor_mul, SpinMatrix, Spinor, N_COLOR,
};

/// Pentaquark correlator at one site. `s5_adj` is the pre-adjointed
/// antiquark line; `proj` is the baryon spin projection matrix.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn contract(
    g_src: Gamma,
    g_snk: Gamma,
    gm_src: Gamma,
    gm_snk: Gamma,
    s1: &Spinor,
    s2: &Spinor,
    s3: &Spinor,
    s4: &Spinor,
    s5_adj: &Spinor,
    proj: &SpinMatrix,
) -> Complex64 {
    let wrapped = gamma_mul_both(g_src, s1, g_snk);
    let diquark = cross_color_trace(&wrapped, s2);
    let meson = spinor_mul(&gamma_mul_both(gm_snk, s5_adj, gm_src), s4);

    // Closed meson loop for the direct wiring.
    let mut meson_loop = Complex64::ZERO;
    for i in 0..N_SPIN {
        for e in 0..N_COLOR {
            meson_loop += meson.d[i][i][e][e];
        }
    }
    let direct = closed_baryon(&diquark, s3, proj) * meson_loop;
    let threaded = spinor_mul(&meson, s3);
    let cross = closed_baryon(&diquark, &threaded, proj);
    direct - cross
}

/// term0-style closure of a diquark block through a third-quark line.
fn closed_baryon(
    diquark: &[[SpinMatrix; N_COLOR]; N_COLOR],
    third: &Spinor,
    proj: &SpinMatrix,
) -> Complex64 {
    let b3 = third.color_blocks();
    let mut acc = Complex64::ZERO;
    for c in 0..N_COLOR {
        for cp in 0..N_COLOR {
            acc += diquark[c][cp].trace() * (*proj * b3[cp][c]).trace();
        }
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::gamma::{GammaBasis, GammaTable};

    #[test]
    fn identity_inputs() {
        // D = 2 δ 1 gives the baryon closure 96; the meson loop is 12 and
        // the threaded line stays the identity, so C = 96·12 − 96 = 1056.
        let t = GammaTable::build(GammaBasis::Chiral);
        let id = Spinor::identity();
        let g = t.gamma(0);
        let c = contract(g, g, g, g, &id, &id, &id, &id, &id, &SpinMatrix::IDENTITY);
        assert!((c.re - 1056.0).abs() < 1e-11);
        assert!(c.im.abs() < 1e-11);
    }

    #[test]
    fn direct_term_factorizes() {
        // With a meson sector scaled by λ, the direct piece scales by λ
        // and so does the cross piece (both are linear in S₄).
        let t = GammaTable::build(GammaBasis::Chiral);
        let id = Spinor::identity();
        let g5 = t.gamma5();
        let scaled = id.scale(2.5);
        let c1 = contract(g5, g5, g5, g5, &id, &id, &id, &id, &id, &SpinMatrix::IDENTITY);
        let c2 = contract(g5, g5, g5, g5, &id, &id, &id, &scaled, &id, &SpinMatrix::IDENTITY);
        assert!((c2 - c1.scale(2.5)).abs() < 1e-10);
    }

    #[test]
    fn cross_term_vanishes_for_traceless_meson_spin_structure() {
        // A γ-dressed identity meson block with vanishing spin trace kills
        // the direct loop but not the threaded term, so C = −C_cross ≠ 0.
        let t = GammaTable::build(GammaBasis::Chiral);
        let id = Spinor::identity();
        let g = t.gamma(0);
        let gx = t.gamma(1);
        // Meson gammas (γx, 1): M = γx on identity inputs, Tr M = 0.
        let c = contract(g, g, gx, t.gamma(0), &id, &id, &id, &id, &id, &SpinMatrix::IDENTITY);
        // The threaded third line becomes γx, and the identity-projector
        // closure traces it to zero as well, so both wirings vanish.
        assert!(c.abs() < 1e-12);
    }
}
