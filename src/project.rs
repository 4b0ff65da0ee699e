// SPDX-License-Identifier: AGPL-3.0-only

//! Momentum projection of per-timeslice correlator fields.
//!
//! Two interchangeable evaluation paths behind one type:
//!
//! - FFT path: one batched forward 3D transform of the site field, then a
//!   sparse gather of only the requested bins via their precomputed grid
//!   indices. Used whenever all spatial extents are powers of two.
//! - Direct path: per-momentum phase-weighted sums with per-axis phase
//!   tables, Σ_x e^{−2πi p·x/L} f(x). Selected automatically on other
//!   extents; also the reference the FFT path is tested against.
//!
//! Zero momentum degenerates to the flat spatial sum in either path,
//! which is exactly the wall-sink projection.

use crate::error::Result;
use crate::fft::SpatialFft;
use crate::lattice::complex_f64::Complex64;
use crate::lattice::geometry::Geometry;
use crate::momentum::MomentumEntry;

enum Path {
    Fft(SpatialFft),
    Direct(Vec<[Vec<Complex64>; 3]>),
}

/// Projects one spatial field onto a fixed momentum list.
pub struct MomentumProjector {
    geom: Geometry,
    momenta: Vec<MomentumEntry>,
    path: Path,
}

impl MomentumProjector {
    /// Build for a geometry and momentum list; picks FFT when the spatial
    /// extents allow radix-2, the direct sum otherwise.
    pub fn new(geom: &Geometry, momenta: &[MomentumEntry]) -> Result<Self> {
        let path = if geom.fft_capable() {
            Path::Fft(SpatialFft::new(geom)?)
        } else {
            let tables = momenta
                .iter()
                .map(|m| {
                    let mut axes = [Vec::new(), Vec::new(), Vec::new()];
                    for mu in 0..3 {
                        let l = geom.dims[mu];
                        axes[mu] = (0..l)
                            .map(|x| {
                                let arg = -2.0 * std::f64::consts::PI * m.p[mu] as f64
                                    * x as f64
                                    / l as f64;
                                Complex64::from_polar(arg)
                            })
                            .collect();
                    }
                    axes
                })
                .collect();
            Path::Direct(tables)
        };
        Ok(Self {
            geom: *geom,
            momenta: momenta.to_vec(),
            path,
        })
    }

    /// Number of projected bins.
    #[must_use]
    pub fn n_momenta(&self) -> usize {
        self.momenta.len()
    }

    /// Whether the batched-transform path is active.
    #[must_use]
    pub fn uses_fft(&self) -> bool {
        matches!(self.path, Path::Fft(_))
    }

    /// Project one spatial field (laid out by `spatial_index`) onto every
    /// momentum in the list, in list order.
    #[must_use]
    pub fn project(&self, field: &[Complex64]) -> Vec<Complex64> {
        debug_assert_eq!(field.len(), self.geom.spatial_volume());
        match &self.path {
            Path::Fft(fft) => {
                let mut spectrum = field.to_vec();
                fft.forward(&mut spectrum);
                self.momenta.iter().map(|m| spectrum[m.grid_index]).collect()
            }
            Path::Direct(tables) => self
                .momenta
                .iter()
                .zip(tables)
                .map(|(_, axes)| {
                    let mut acc = Complex64::ZERO;
                    for (idx, &v) in field.iter().enumerate() {
                        let x = self.geom.spatial_coords(idx);
                        acc += v * axes[0][x[0]] * axes[1][x[1]] * axes[2][x[2]];
                    }
                    acc
                })
                .collect(),
        }
    }
}

/// Re-anchor a timeslice to the source origin: (t − origin + lt) mod lt.
#[must_use]
pub const fn time_shift(t: usize, origin: usize, lt: usize) -> usize {
    (t + lt - origin % lt) % lt
}

/// Configuration-space alternative to momentum binning: sum of the field
/// over sites at fixed periodic squared separation from a center.
#[must_use]
pub fn shell_sum(
    field: &[Complex64],
    geom: &Geometry,
    center: [usize; 3],
    rsq: usize,
) -> Complex64 {
    let mut acc = Complex64::ZERO;
    for (idx, &v) in field.iter().enumerate() {
        if geom.periodic_sep_sq(geom.spatial_coords(idx), center) == rsq {
            acc += v;
        }
    }
    acc
}
