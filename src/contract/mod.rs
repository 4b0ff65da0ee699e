// SPDX-License-Identifier: AGPL-3.0-only

//! Per-site hadron contraction kernels.
//!
//! Each kernel is a pure function from per-site propagator tensors and
//! gamma-structure choices to one complex number. Nothing here touches
//! the lattice volume, momentum projection, or I/O: the orchestrator
//! feeds kernels one site at a time and owns the sums.
//!
//! Backward-propagating quark lines (the `_adj` parameters) are expected
//! pre-adjointed via [`full_adjoint`](crate::lattice::spinor::full_adjoint);
//! kernels never adjoint internally, so the γ5-hermiticity cost is paid
//! once per site, not once per channel.
//!
//! | Kernel | Operator content |
//! |--------|------------------|
//! | `meson` | q̄ Γ q two-point trace |
//! | `baryon` | ε ε three-quark, two-term spin pairing, flavor weights |
//! | `diquark` | color-diagonal two-quark pair tensor |
//! | `tetraquark` | diquark × antidiquark, εε delta expansion at both ends |
//! | `pentaquark` | baryon block × meson block, direct minus color-threaded cross |

pub mod baryon;
pub mod diquark;
pub mod meson;
pub mod pentaquark;
pub mod tetraquark;
