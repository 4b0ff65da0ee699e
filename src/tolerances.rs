// SPDX-License-Identifier: AGPL-3.0-only

//! Numerical acceptance thresholds for contraction validation.
//!
//! Every threshold is a named constant with the reason it is safe; the
//! validation binary and the integration tests never embed a bare
//! number.

/// Gamma-algebra identities (squares, anticommutators, γ5 products).
///
/// The permutation representation is exact integer arithmetic on phase
/// codes; any nonzero residual is a bug. The bound only covers the
/// dense-expansion comparisons.
pub const GAMMA_ALGEBRA_ABS: f64 = 1e-14;

/// Spin projector algebra: idempotency, orthogonality, completeness,
/// transversality.
///
/// Each projector entry is a handful of multiplies and one division by
/// p²; at |p| of a few lattice units the relative rounding is O(1e-15),
/// and the composed products stay within an order of that.
pub const PROJECTOR_ALGEBRA_ABS: f64 = 1e-13;

/// Identity-propagator contraction baselines (meson 12, baryon 96/24,
/// tetraquark 192, pentaquark 1056).
///
/// Counting identities evaluated in f64: exact up to summation rounding
/// over at most a few thousand terms.
pub const KERNEL_IDENTITY_ABS: f64 = 1e-10;

/// FFT projection against the direct phase sum.
///
/// The radix-2 transform reorders the same sum; disagreement beyond
/// accumulated rounding over a spatial volume means a twiddle or layout
/// bug. Relative bound on the larger bin magnitude.
pub const FFT_VS_DIRECT_REL: f64 = 1e-10;

/// γ5-hermiticity round trip: `full_adjoint(full_adjoint(S)) = S`.
pub const ADJOINT_ROUNDTRIP_ABS: f64 = 1e-14;
