// SPDX-License-Identifier: AGPL-3.0-only

//! Radix-2 complex FFT for momentum projection.
//!
//! Plan/execute split: a plan holds the bit-reversal table and the
//! forward twiddle factors for one axis length, so the per-timeslice
//! transform does no trig. Decimation-in-time, in-place, forward
//! convention e^{−2πi k n / N} — the sign the momentum projector wants,
//! so a projected bin is exactly Σ_x e^{−2πi p·x/L} f(x).
//!
//! Only power-of-two lengths are supported; the projector falls back to
//! the direct phase sum on other extents.

use std::f64::consts::PI;

use crate::error::{Error, Result};
use crate::lattice::complex_f64::Complex64;
use crate::lattice::geometry::Geometry;

/// One-axis FFT plan: length, bit-reversal permutation, twiddles.
#[derive(Clone, Debug)]
pub struct FftPlan {
    n: usize,
    rev: Vec<u32>,
    /// Forward twiddles w_k = e^{−2πi k / n}, k < n/2.
    tw: Vec<Complex64>,
}

impl FftPlan {
    /// Build a plan for a power-of-two length.
    pub fn new(n: usize) -> Result<Self> {
        if !n.is_power_of_two() {
            return Err(Error::InvalidInput(format!(
                "FFT length {n} is not a power of two"
            )));
        }
        let bits = n.trailing_zeros();
        let rev = (0..n as u32)
            .map(|i| if bits == 0 { 0 } else { i.reverse_bits() >> (32 - bits) })
            .collect();
        let tw = (0..n / 2)
            .map(|k| Complex64::from_polar(-2.0 * PI * k as f64 / n as f64))
            .collect();
        Ok(Self { n, rev, tw })
    }

    /// Transform length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// In-place forward transform. `data.len()` must equal the plan length.
    pub fn forward(&self, data: &mut [Complex64]) {
        debug_assert_eq!(data.len(), self.n);
        for (i, &r) in self.rev.iter().enumerate() {
            let r = r as usize;
            if i < r {
                data.swap(i, r);
            }
        }
        let mut len = 2;
        while len <= self.n {
            let half = len / 2;
            let step = self.n / len;
            for block in data.chunks_exact_mut(len) {
                for k in 0..half {
                    let w = self.tw[k * step];
                    let lo = block[k];
                    let hi = block[k + half] * w;
                    block[k] = lo + hi;
                    block[k + half] = lo - hi;
                }
            }
            len *= 2;
        }
    }
}

/// 3D forward transform over one timeslice, axis plans precomputed.
#[derive(Clone, Debug)]
pub struct SpatialFft {
    geom: Geometry,
    plans: [FftPlan; 3],
    scratch_len: usize,
}

impl SpatialFft {
    /// Build per-axis plans; all three spatial extents must be powers of two.
    pub fn new(geom: &Geometry) -> Result<Self> {
        let plans = [
            FftPlan::new(geom.dims[0])?,
            FftPlan::new(geom.dims[1])?,
            FftPlan::new(geom.dims[2])?,
        ];
        let scratch_len = geom.dims[0].max(geom.dims[1]).max(geom.dims[2]);
        Ok(Self {
            geom: *geom,
            plans,
            scratch_len,
        })
    }

    /// In-place 3D forward transform of a spatial-volume field laid out
    /// by [`Geometry::spatial_index`].
    pub fn forward(&self, field: &mut [Complex64]) {
        debug_assert_eq!(field.len(), self.geom.spatial_volume());
        let [nx, ny, nz] = [self.geom.dims[0], self.geom.dims[1], self.geom.dims[2]];
        let mut line = vec![Complex64::ZERO; self.scratch_len];

        // z axis: contiguous lines.
        for chunk in field.chunks_exact_mut(nz) {
            self.plans[2].forward(chunk);
        }
        // y axis: stride nz.
        for x in 0..nx {
            for z in 0..nz {
                let base = x * ny * nz + z;
                for y in 0..ny {
                    line[y] = field[base + y * nz];
                }
                self.plans[1].forward(&mut line[..ny]);
                for y in 0..ny {
                    field[base + y * nz] = line[y];
                }
            }
        }
        // x axis: stride ny*nz.
        let nyz = ny * nz;
        for r in 0..nyz {
            for x in 0..nx {
                line[x] = field[x * nyz + r];
            }
            self.plans[0].forward(&mut line[..nx]);
            for x in 0..nx {
                field[x * nyz + r] = line[x];
            }
        }
    }
}
