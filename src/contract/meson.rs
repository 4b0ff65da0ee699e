// SPDX-License-Identifier: AGPL-3.0-only

//! Meson two-point contraction.
//!
//! For a sink operator q̄₂ Γ_snk q₁ and source operator q̄₁ Γ_src q₂ the
//! single Wick contraction is
//!
//!   C(x) = Tr[ Γ_snk · S̃₂(x) · Γ_src · S₁(x) ]
//!
//! with S̃₂ the γ5-adjointed backward line and the trace over spin⊗color.
//! The gammas enter through the permutation rule, so the cost per site is
//! the 144-term fused trace plus index shuffling.

use crate::lattice::complex_f64::Complex64;
use crate::lattice::gamma::Gamma;
use crate::lattice::spinor::{gamma_mul_both, spin_color_trace, Spinor};

/// Tr[Γ_snk · s2_adj · Γ_src · s1]. `s2_adj` is the pre-adjointed
/// backward line.
#[must_use]
pub fn contract(g_src: Gamma, g_snk: Gamma, s1: &Spinor, s2_adj: &Spinor) -> Complex64 {
    let wrapped = gamma_mul_both(g_snk, s2_adj, g_src);
    spin_color_trace(&wrapped, s1)
}
