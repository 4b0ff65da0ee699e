// SPDX-License-Identifier: AGPL-3.0-only

//! Cross-module contraction properties on generic (random) propagators.
//!
//! The per-module unit tests pin down each piece against hand-computed
//! values; these tests check the identities that only hold when gamma
//! algebra, adjoints, and kernels compose correctly.

use coldspring_barracuda::contract::{baryon, meson, tetraquark};
use coldspring_barracuda::lattice::complex_f64::Complex64;
use coldspring_barracuda::lattice::gamma::{GammaBasis, GammaTable};
use coldspring_barracuda::lattice::projector::{parity_projector, SpinProjector};
use coldspring_barracuda::lattice::spinor::{full_adjoint, SpinMatrix, Spinor};

fn random_spinor(seed: &mut u64) -> Spinor {
    let mut s = Spinor::zero();
    for i in 0..4 {
        for j in 0..4 {
            for a in 0..3 {
                for b in 0..3 {
                    *seed = seed
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    let re = (*seed >> 11) as f64 / (1u64 << 53) as f64 - 0.5;
                    *seed = seed
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    let im = (*seed >> 11) as f64 / (1u64 << 53) as f64 - 0.5;
                    s.d[i][j][a][b] = Complex64::new(re, im);
                }
            }
        }
    }
    s
}

#[test]
fn meson_gamma5_diagonal_channel_is_positive() {
    // C(γ5, γ5; S, S̃) = Tr[S†S] for any S: strictly positive real.
    let table = GammaTable::build(GammaBasis::Chiral);
    let g5 = table.gamma5();
    let mut seed = 1u64;
    for _ in 0..5 {
        let s = random_spinor(&mut seed);
        let s_adj = full_adjoint(&s, g5);
        let c = meson::contract(g5, g5, &s, &s_adj);
        assert!(c.re > 0.0);
        assert!(c.im.abs() < 1e-11);
    }
}

#[test]
fn meson_scales_bilinearly() {
    let table = GammaTable::build(GammaBasis::NonRelativistic);
    let g = table.gamma(3);
    let gp = table.gamma(12);
    let mut seed = 2u64;
    let s1 = random_spinor(&mut seed);
    let s2 = random_spinor(&mut seed);
    let c = meson::contract(g, gp, &s1, &s2);
    let c2 = meson::contract(g, gp, &s1.scale(2.0), &s2.scale(0.5));
    assert!((c - c2).abs() < 1e-12);
}

#[test]
fn baryon_flavor_weights_from_raw_terms() {
    let table = GammaTable::build(GammaBasis::Chiral);
    let g = table.gamma(10);
    let gp = table.gamma(5);
    let proj = parity_projector(&table, true);
    let mut seed = 3u64;
    let s1 = random_spinor(&mut seed);
    let s2 = random_spinor(&mut seed);
    let s3 = random_spinor(&mut seed);
    let (t0, t1) = baryon::terms(g, gp, &s1, &s2, &s3, &proj);
    for (flavor, want) in [
        (baryon::BaryonFlavor::Uds, t0),
        (baryon::BaryonFlavor::Uud, t0 + t1),
        (baryon::BaryonFlavor::Uuu, t0.scale(2.0) + t1.scale(4.0)),
    ] {
        let c = baryon::contract(g, gp, &s1, &s2, &s3, &proj, flavor);
        assert!((c - want).abs() < 1e-11);
    }
}

#[test]
fn baryon_projected_through_spin_half_projector() {
    // The projector matrix is a valid spin projection input; the
    // contraction must be linear in it.
    let table = GammaTable::build(GammaBasis::Chiral);
    let g = table.gamma(10);
    let proj = SpinProjector::Half22
        .matrix(&table, [1.0, 0.0, 0.0], 1, 1)
        .unwrap();
    let mut seed = 4u64;
    let s1 = random_spinor(&mut seed);
    let s2 = random_spinor(&mut seed);
    let s3 = random_spinor(&mut seed);
    let c1 = baryon::contract(g, g, &s1, &s2, &s3, &proj, baryon::BaryonFlavor::Uud);
    let c2 = baryon::contract(
        g,
        g,
        &s1,
        &s2,
        &s3,
        &proj.scale(3.0),
        baryon::BaryonFlavor::Uud,
    );
    assert!((c2 - c1.scale(3.0)).abs() < 1e-10);
}

#[test]
fn tetraquark_reduces_to_meson_product_minus_exchange_on_factorized_input() {
    // With color-identity spinors the four delta terms must reproduce the
    // counting identity 192 in every basis.
    for basis in [GammaBasis::Chiral, GammaBasis::NonRelativistic] {
        let table = GammaTable::build(basis);
        let one = table.gamma(0);
        let id = Spinor::identity();
        let c = tetraquark::contract(one, one, one, one, &id, &id, &id, &id);
        assert!((c.re - 192.0).abs() < 1e-11);
        assert!(c.im.abs() < 1e-11);
    }
}

#[test]
fn adjoint_respects_gamma5_hermiticity_in_every_basis() {
    for tag in ["chiral", "nonrelativistic", "static"] {
        let table = GammaTable::from_tag(tag).unwrap();
        let g5 = table.gamma5();
        let mut seed = 5u64;
        let s = random_spinor(&mut seed);
        let back = full_adjoint(&full_adjoint(&s, g5), g5);
        for i in 0..4 {
            for j in 0..4 {
                for a in 0..3 {
                    for b in 0..3 {
                        assert!((back.d[i][j][a][b] - s.d[i][j][a][b]).abs() < 1e-13);
                    }
                }
            }
        }
    }
}

#[test]
fn parity_projectors_split_static_basis_diagonally() {
    // In the NR/static bases γt = diag(1, 1, −1, −1), so (1 ± γt)/2 are
    // the literal upper/lower spin-block selectors.
    let table = GammaTable::build(GammaBasis::Static);
    let plus = parity_projector(&table, true);
    let minus = parity_projector(&table, false);
    for i in 0..4 {
        let want_plus = if i < 2 { 1.0 } else { 0.0 };
        assert!((plus.m[i][i].re - want_plus).abs() < 1e-15);
        assert!((minus.m[i][i].re - (1.0 - want_plus)).abs() < 1e-15);
    }
    assert!((plus + minus - SpinMatrix::IDENTITY).max_abs() < 1e-15);
}
