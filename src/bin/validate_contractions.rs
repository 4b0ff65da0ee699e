// SPDX-License-Identifier: AGPL-3.0-only

//! End-to-end validation of the contraction engine.
//!
//! Checks, in dependency order:
//!   1. Gamma algebra: generator squares, anticommutation, γ5 structure.
//!   2. Spin projector algebra: completeness, idempotency, transversality.
//!   3. Kernel identities on free-field point propagators: meson 12,
//!      baryon (96, 24) and its flavor weights, diquark 12,
//!      tetraquark 192, pentaquark 1056.
//!   4. FFT momentum projection against the direct phase sum.
//!   5. Correlator file round trip and checksum rejection.
//!
//! Expected values are counting identities of the Kronecker-delta
//! propagator; see the kernel module docs for the derivations.

use coldspring_barracuda::contract::{baryon, diquark, meson, pentaquark, tetraquark};
use coldspring_barracuda::corrfile::{
    read_correlator, write_correlator, ChecksumPolicy, CorrelatorSet,
};
use coldspring_barracuda::lattice::complex_f64::Complex64;
use coldspring_barracuda::lattice::gamma::{GammaBasis, GammaTable};
use coldspring_barracuda::lattice::geometry::Geometry;
use coldspring_barracuda::lattice::projector::{parity_projector, SpinProjector};
use coldspring_barracuda::lattice::spinor::{SpinMatrix, Spinor};
use coldspring_barracuda::momentum::{compute_momentum_list, MomentumCut};
use coldspring_barracuda::project::MomentumProjector;
use coldspring_barracuda::tolerances::{
    FFT_VS_DIRECT_REL, GAMMA_ALGEBRA_ABS, KERNEL_IDENTITY_ABS, PROJECTOR_ALGEBRA_ABS,
};
use coldspring_barracuda::validation::ValidationHarness;

fn main() {
    let mut h = ValidationHarness::new("contractions");

    gamma_checks(&mut h);
    projector_checks(&mut h);
    kernel_checks(&mut h);
    projection_checks(&mut h);
    file_checks(&mut h);

    h.finish();
}

fn gamma_checks(h: &mut ValidationHarness) {
    for basis in [
        GammaBasis::Chiral,
        GammaBasis::NonRelativistic,
        GammaBasis::Static,
    ] {
        let table = GammaTable::build(basis);
        let mut worst = 0.0_f64;
        for mu in 0..4 {
            let g = SpinMatrix::from_gamma(table.generator(mu));
            worst = worst.max((g * g - SpinMatrix::IDENTITY).max_abs());
        }
        h.check_abs(
            &format!("{basis:?}: generator squares"),
            worst,
            0.0,
            GAMMA_ALGEBRA_ABS,
        );
        let g5 = SpinMatrix::from_gamma(table.gamma5());
        let mut anti = 0.0_f64;
        for mu in 0..4 {
            let g = SpinMatrix::from_gamma(table.generator(mu));
            anti = anti.max((g5 * g + g * g5).max_abs());
        }
        h.check_abs(
            &format!("{basis:?}: gamma5 anticommutes"),
            anti,
            0.0,
            GAMMA_ALGEBRA_ABS,
        );
    }
}

fn projector_checks(h: &mut ValidationHarness) {
    let table = GammaTable::build(GammaBasis::Chiral);
    let p = [1.0, -2.0, 3.0];
    let p4 = [1.0, -2.0, 3.0, 0.0];

    let mut completeness = 0.0_f64;
    for mu in 0..4 {
        for nu in 0..4 {
            let sum = SpinProjector::ThreeHalf.matrix(&table, p, mu, nu).unwrap()
                + SpinProjector::Half11.matrix(&table, p, mu, nu).unwrap()
                + SpinProjector::Half22.matrix(&table, p, mu, nu).unwrap();
            let want = if mu == nu {
                SpinMatrix::IDENTITY
            } else {
                SpinMatrix::ZERO
            };
            completeness = completeness.max((sum - want).max_abs());
        }
    }
    h.check_abs("projector completeness", completeness, 0.0, PROJECTOR_ALGEBRA_ABS);

    let mut idem = 0.0_f64;
    for mu in 0..4 {
        for nu in 0..4 {
            let mut sq = SpinMatrix::ZERO;
            for lam in 0..4 {
                let a = SpinProjector::ThreeHalf.matrix(&table, p, mu, lam).unwrap();
                let b = SpinProjector::ThreeHalf.matrix(&table, p, lam, nu).unwrap();
                sq = sq + a * b;
            }
            let want = SpinProjector::ThreeHalf.matrix(&table, p, mu, nu).unwrap();
            idem = idem.max((sq - want).max_abs());
        }
    }
    h.check_abs("three-half idempotency", idem, 0.0, PROJECTOR_ALGEBRA_ABS);

    let mut trans = 0.0_f64;
    for nu in 0..4 {
        let mut acc = SpinMatrix::ZERO;
        for mu in 0..4 {
            acc = acc
                + SpinProjector::ThreeHalf
                    .matrix(&table, p, mu, nu)
                    .unwrap()
                    .scale(p4[mu]);
        }
        trans = trans.max(acc.max_abs());
    }
    h.check_abs("three-half transversality", trans, 0.0, PROJECTOR_ALGEBRA_ABS);

    let plus = parity_projector(&table, true);
    h.check_abs(
        "parity projector idempotency",
        (plus * plus - plus).max_abs(),
        0.0,
        PROJECTOR_ALGEBRA_ABS,
    );
}

fn kernel_checks(h: &mut ValidationHarness) {
    let table = GammaTable::build(GammaBasis::Chiral);
    let id = Spinor::identity();
    let one = table.gamma(0);

    let m = meson::contract(one, one, &id, &id);
    h.check_abs("meson identity", m.re, 12.0, KERNEL_IDENTITY_ABS);

    let (t0, t1) = baryon::terms(one, one, &id, &id, &id, &SpinMatrix::IDENTITY);
    h.check_abs("baryon term0 identity", t0.re, 96.0, KERNEL_IDENTITY_ABS);
    h.check_abs("baryon term1 identity", t1.re, 24.0, KERNEL_IDENTITY_ABS);
    let uuu = baryon::contract(
        one,
        one,
        &id,
        &id,
        &id,
        &SpinMatrix::IDENTITY,
        baryon::BaryonFlavor::Uuu,
    );
    h.check_abs(
        "baryon uuu weight (2 t0 + 4 t1)",
        uuu.re,
        2.0 * 96.0 + 4.0 * 24.0,
        KERNEL_IDENTITY_ABS,
    );

    let d = diquark::contract(one, one, &id, &id);
    h.check_abs("diquark identity", d.re, 12.0, KERNEL_IDENTITY_ABS);

    let tq = tetraquark::contract(one, one, one, one, &id, &id, &id, &id);
    h.check_abs("tetraquark identity", tq.re, 192.0, KERNEL_IDENTITY_ABS);

    let pq = pentaquark::contract(
        one,
        one,
        one,
        one,
        &id,
        &id,
        &id,
        &id,
        &id,
        &SpinMatrix::IDENTITY,
    );
    h.check_abs("pentaquark identity", pq.re, 1056.0, KERNEL_IDENTITY_ABS);
}

fn projection_checks(h: &mut ValidationHarness) {
    let geom = Geometry::new([8, 8, 8, 4]);
    let cut = MomentumCut {
        max_psq: 4,
        max_component: None,
    };
    let momenta = compute_momentum_list(&cut, &geom).unwrap();
    let proj = MomentumProjector::new(&geom, &momenta).unwrap();
    let mut seed = 7u64;
    let field: Vec<Complex64> = (0..geom.spatial_volume())
        .map(|_| {
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let re = (seed >> 11) as f64 / (1u64 << 53) as f64 - 0.5;
            Complex64::new(re, 0.1)
        })
        .collect();
    let fast = proj.project(&field);
    let mut worst = 0.0_f64;
    for (m, v) in momenta.iter().zip(&fast) {
        let mut want = Complex64::ZERO;
        for (idx, &f) in field.iter().enumerate() {
            let x = geom.spatial_coords(idx);
            let mut arg = 0.0;
            for mu in 0..3 {
                arg -= 2.0 * std::f64::consts::PI * m.p[mu] as f64 * x[mu] as f64
                    / geom.dims[mu] as f64;
            }
            want += f * Complex64::from_polar(arg);
        }
        let denom = want.abs().max(1.0);
        worst = worst.max((*v - want).abs() / denom);
    }
    h.check_abs("fft vs direct projection", worst, 0.0, FFT_VS_DIRECT_REL);
}

fn file_checks(h: &mut ValidationHarness) {
    let dir = std::env::temp_dir();
    let path = dir.join(format!("validate_contractions_{}.corr", std::process::id()));
    let mut set = CorrelatorSet::new(2, 2, 8, vec![[0, 0, 0], [1, 0, 0]]);
    let mut seed = 11u64;
    for v in &mut set.data {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let re = (seed >> 11) as f64 / (1u64 << 53) as f64 - 0.5;
        *v = Complex64::new(re, -re);
    }
    let ok = write_correlator(&path, &set).is_ok();
    h.check_bool("correlator write", ok);
    match read_correlator(&path, ChecksumPolicy::Reject) {
        Ok(back) => h.check_bool("correlator round trip bit-exact", back == set),
        Err(_) => h.check_bool("correlator round trip bit-exact", false),
    }
    // Flip one payload byte; a strict read must fail.
    if let Ok(mut bytes) = std::fs::read(&path) {
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0x40;
        let corrupt = path.with_extension("corrupt");
        if std::fs::write(&corrupt, &bytes).is_ok() {
            h.check_bool(
                "checksum rejects corruption",
                read_correlator(&corrupt, ChecksumPolicy::Reject).is_err(),
            );
            let _ = std::fs::remove_file(&corrupt);
        }
    }
    let _ = std::fs::remove_file(&path);
}
