// SPDX-License-Identifier: AGPL-3.0-only

//! Lattice primitives for hadron correlator contractions.
//!
//! Everything a contraction kernel needs before any channel-specific
//! algebra happens: the site/coordinate bookkeeping, complex arithmetic,
//! the sparse gamma-matrix representation, and the per-site spin⊗color
//! tensors that quark propagators are made of.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `complex_f64` | Complex f64 arithmetic (re, im) |
//! | `geometry` | Lattice extents, site indexing, periodic neighbors |
//! | `gamma` | Generalized-permutation gamma matrices and basis tables |
//! | `spinor` | Dirac⊗Dirac⊗Color⊗Color per-site tensor operations |
//! | `projector` | Rarita-Schwinger spin-3/2 / spin-1/2 and parity projectors |
//!
//! # References
//!
//! - Gattringer & Lang, "Quantum Chromodynamics on the Lattice" (2010), Ch. 6
//! - DeGrand & Rossi, Comput. Phys. Commun. 60, 211 (1990) — chiral basis
//! - Benmerrouche, Davidson & Mukhopadhyay, PRC 39, 2339 (1989) — spin projectors

/// Complex f64 arithmetic (re, im).
pub mod complex_f64;
/// Generalized-permutation gamma matrices and the 16-element basis table.
pub mod gamma;
/// Explicit lattice geometry value: extents, indexing, periodic wrap.
pub mod geometry;
/// Rarita-Schwinger spin projectors and parity projection.
pub mod projector;
/// Per-site spin⊗color tensors and their contraction primitives.
pub mod spinor;
