// SPDX-License-Identifier: AGPL-3.0-only

//! coldSpring Hadron Spectroscopy — correlator contraction engine.
//!
//! Contracts lattice quark propagators into hadronic correlation functions:
//! Dirac gamma-matrix algebra drives per-site spin⊗color contractions for
//! each quantum-number channel, the results are projected onto discrete
//! lattice momenta, and the final correlator arrays are persisted in a
//! checksummed binary format with endian self-detection.
//!
//! ## Active modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `lattice` | Geometry, complex arithmetic, gamma algebra, spinor primitives, spin projectors |
//! | `contract` | Per-channel contraction kernels (meson, baryon, diquark, tetraquark, pentaquark) |
//! | `momentum` | Momentum-list generation with cuts and FFT-grid indices |
//! | `fft` | Radix-2 complex-f64 transforms for the momentum projector |
//! | `project` | Momentum projection: FFT gather, direct sum, shell sum |
//! | `propagator` | Timeslice-streaming propagator source interface |
//! | `measure` | Measurement orchestrator: double-buffered reads, parallel dispatch |
//! | `corrfile` | Checksummed binary correlator serialization |
//!
//! ## Validation binaries
//!
//! - `validate_contractions` — gamma closure, projector algebra, kernel
//!   identities, FFT-vs-direct parity, file round-trip
//! - `corr_inspect` — summarize a correlator file, verify checksums

pub mod contract;
pub mod corrfile;
pub mod error;
pub mod fft;
pub mod lattice;
pub mod measure;
pub mod momentum;
pub mod project;
pub mod propagator;
pub mod tolerances;
pub mod validation;
