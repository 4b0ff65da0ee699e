// SPDX-License-Identifier: AGPL-3.0-only

//! Momentum shell enumeration.
//!
//! A run requests momenta by cut rather than by explicit list: every
//! integer three-vector with |p|² ≤ `max_psq` (and optionally each
//! component bounded) is kept, deduplicated, and ordered by |p|² then
//! lexicographically so output files are stable across runs. Each entry
//! carries the FFT-grid bin of its mod-L wavevector, so the projector's
//! gather is a plain indexed read.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lattice::geometry::Geometry;

/// Momentum selection, deserialized from the run configuration.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct MomentumCut {
    /// Keep p with p·p ≤ this value.
    pub max_psq: i32,
    /// Optional per-component bound |p_i| ≤ this value.
    #[serde(default)]
    pub max_component: Option<i32>,
}

/// One selected momentum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MomentumEntry {
    /// Integer momentum in lattice units.
    pub p: [i32; 3],
    /// p·p.
    pub psq: i32,
    /// Linear FFT-grid index of the (mod-L) wavevector.
    pub grid_index: usize,
}

/// Enumerate the cut, sorted by (psq, lexicographic p).
///
/// Rejects a negative `max_psq` and a cut so wide that distinct momenta
/// alias onto the same grid bin (component magnitude must stay below
/// half the corresponding extent).
pub fn compute_momentum_list(cut: &MomentumCut, geom: &Geometry) -> Result<Vec<MomentumEntry>> {
    if cut.max_psq < 0 {
        return Err(Error::InvalidInput(format!(
            "momentum cut max_psq = {} is negative",
            cut.max_psq
        )));
    }
    let from_psq = (cut.max_psq as f64).sqrt().floor() as i32;
    let reach = match cut.max_component {
        Some(c) if c >= 0 => c.min(from_psq),
        Some(c) => {
            return Err(Error::InvalidInput(format!(
                "momentum cut max_component = {c} is negative"
            )))
        }
        None => from_psq,
    };
    for mu in 0..3 {
        if 2 * reach as i64 >= geom.dims[mu] as i64 && reach > 0 {
            return Err(Error::InvalidInput(format!(
                "momentum reach {reach} aliases on extent {}",
                geom.dims[mu]
            )));
        }
    }
    let mut list = Vec::new();
    for px in -reach..=reach {
        for py in -reach..=reach {
            for pz in -reach..=reach {
                let psq = px * px + py * py + pz * pz;
                if psq > cut.max_psq {
                    continue;
                }
                let grid = [
                    geom.wrap_momentum(px, 0),
                    geom.wrap_momentum(py, 1),
                    geom.wrap_momentum(pz, 2),
                ];
                list.push(MomentumEntry {
                    p: [px, py, pz],
                    psq,
                    grid_index: geom.spatial_index(grid),
                });
            }
        }
    }
    list.sort_by(|a, b| (a.psq, a.p).cmp(&(b.psq, b.p)));
    list.dedup_by_key(|e| e.p);
    Ok(list)
}
