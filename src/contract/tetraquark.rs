// SPDX-License-Identifier: AGPL-3.0-only

//! Tetraquark (diquark-antidiquark) two-point contraction.
//!
//! Source operator ε_{eab} ε_{ecd} (q₁ᵀ C Γ q₂)_{ab} (q̄₃ Γ' C q̄₄ᵀ)_{cd},
//! same structure at the sink with primed colors. Summing each shared
//! epsilon index with the identity
//!
//!   Σ_e ε_{eab} ε_{ecd} = δ_{ac} δ_{bd} − δ_{ad} δ_{bc}
//!
//! at source and at sink collapses the color sum to four signed
//! delta terms over the two spin-traced pair tensors
//!
//!   S₁₂[a][a'][b][b'] = Tr_s[(Γ_src S₁ Γ_snk)^{aa'} · S₂^{bb'}]
//!   S₃₄[c][c'][d][d'] = Tr_s[(Γ̄_snk S̃₃ Γ̄_src)^{cc'} · S̃₄^{dd'}]
//!
//! with S̃₃, S̃₄ the pre-adjointed antiquark lines. No Wick exchange
//! between the quark and antiquark sectors is taken here; the four terms
//! are purely the color recouplings of the shared epsilon indices.

use crate::contract::diquark::pair_tensor;
use crate::lattice::complex_f64::Complex64;
use crate::lattice::gamma::Gamma;
use crate::lattice::spinor::{gamma_mul_both, Spinor, N_COLOR};

/// Diquark-antidiquark correlator at one site.
///
/// `(gq_src, gq_snk)` dress the quark pair, `(ga_src, ga_snk)` the
/// antiquark pair; `s3_adj`, `s4_adj` are pre-adjointed.
#[allow(clippy::too_many_arguments)]
#[must_use]
pub fn contract(
    gq_src: Gamma,
    gq_snk: Gamma,
    ga_src: Gamma,
    ga_snk: Gamma,
    s1: &Spinor,
    s2: &Spinor,
    s3_adj: &Spinor,
    s4_adj: &Spinor,
) -> Complex64 {
    let s12 = pair_tensor(&gamma_mul_both(gq_src, s1, gq_snk), s2);
    let s34 = pair_tensor(&gamma_mul_both(ga_snk, s3_adj, ga_src), s4_adj);
    let mut c = Complex64::ZERO;
    for a in 0..N_COLOR {
        for ap in 0..N_COLOR {
            for b in 0..N_COLOR {
                for bp in 0..N_COLOR {
                    let q = s12[a][ap][b][bp];
                    // (δ_{ac}δ_{bd} − δ_{ad}δ_{bc})(δ_{a'c'}δ_{b'd'} − δ_{a'd'}δ_{b'c'})
                    c += q * s34[a][ap][b][bp];
                    c -= q * s34[a][bp][b][ap];
                    c -= q * s34[b][ap][a][bp];
                    c += q * s34[b][bp][a][ap];
                }
            }
        }
    }
    c
}
