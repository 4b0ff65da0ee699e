// SPDX-License-Identifier: AGPL-3.0-only

//! Explicit lattice geometry value.
//!
//! Every component that needs extents, site indexing, or periodic wrap
//! takes a `&Geometry` — there is no global mutable singleton. The index
//! convention matches the link-field layout used across the springs:
//! `dims = [Nx, Ny, Nz, Nt]`, z fastest, then y, then x, then t.

/// Lattice extents and index bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// `[Nx, Ny, Nz, Nt]`
    pub dims: [usize; 4],
}

impl Geometry {
    /// Construct from `[Nx, Ny, Nz, Nt]`. All extents must be nonzero.
    #[must_use]
    pub const fn new(dims: [usize; 4]) -> Self {
        Self { dims }
    }

    /// Total number of lattice sites.
    #[must_use]
    pub const fn volume(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2] * self.dims[3]
    }

    /// Number of sites in one timeslice.
    #[must_use]
    pub const fn spatial_volume(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    /// Temporal extent `Nt`.
    #[must_use]
    pub const fn nt(&self) -> usize {
        self.dims[3]
    }

    /// Linear index of a spatial site within a timeslice.
    ///
    /// `idx = x*NyNz + y*Nz + z` — z fastest. The FFT grid uses the same
    /// layout, so a wavevector `(kx, ky, kz)` lands at `spatial_index`.
    #[must_use]
    pub const fn spatial_index(&self, x: [usize; 3]) -> usize {
        x[0] * (self.dims[1] * self.dims[2]) + x[1] * self.dims[2] + x[2]
    }

    /// Inverse of [`spatial_index`](Self::spatial_index).
    #[must_use]
    pub const fn spatial_coords(&self, idx: usize) -> [usize; 3] {
        let nyz = self.dims[1] * self.dims[2];
        let x = idx / nyz;
        let rem = idx % nyz;
        [x, rem / self.dims[2], rem % self.dims[2]]
    }

    /// Full 4D site index: `t*NxNyNz + spatial_index`.
    #[must_use]
    pub const fn site_index(&self, x: [usize; 4]) -> usize {
        x[3] * self.spatial_volume() + self.spatial_index([x[0], x[1], x[2]])
    }

    /// Spatial neighbor in direction mu ∈ {0,1,2} with periodic wrap.
    #[must_use]
    pub const fn spatial_neighbor(&self, x: [usize; 3], mu: usize, forward: bool) -> [usize; 3] {
        let mut y = x;
        if forward {
            y[mu] = (x[mu] + 1) % self.dims[mu];
        } else {
            y[mu] = (x[mu] + self.dims[mu] - 1) % self.dims[mu];
        }
        y
    }

    /// Wrap an integer momentum component onto the FFT grid `[0, L)`.
    #[must_use]
    pub const fn wrap_momentum(&self, p: i32, mu: usize) -> usize {
        let l = self.dims[mu] as i64;
        (((p as i64 % l) + l) % l) as usize
    }

    /// Periodic squared separation between two spatial sites.
    ///
    /// Each component uses the shorter of the two ways around the torus.
    #[must_use]
    pub fn periodic_sep_sq(&self, a: [usize; 3], b: [usize; 3]) -> usize {
        let mut sq = 0;
        for mu in 0..3 {
            let l = self.dims[mu];
            let d = a[mu].abs_diff(b[mu]);
            let d = d.min(l - d);
            sq += d * d;
        }
        sq
    }

    /// Whether all spatial extents are powers of two (radix-2 FFT capable).
    #[must_use]
    pub const fn fft_capable(&self) -> bool {
        self.dims[0].is_power_of_two()
            && self.dims[1].is_power_of_two()
            && self.dims[2].is_power_of_two()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() {
        let g = Geometry::new([4, 6, 8, 16]);
        for idx in 0..g.spatial_volume() {
            let x = g.spatial_coords(idx);
            assert_eq!(g.spatial_index(x), idx);
        }
        assert_eq!(g.volume(), 4 * 6 * 8 * 16);
        assert_eq!(g.site_index([1, 2, 3, 5]), 5 * 192 + g.spatial_index([1, 2, 3]));
    }

    #[test]
    fn neighbor_wraps() {
        let g = Geometry::new([4, 4, 4, 8]);
        assert_eq!(g.spatial_neighbor([3, 0, 0], 0, true), [0, 0, 0]);
        assert_eq!(g.spatial_neighbor([0, 0, 0], 2, false), [0, 0, 3]);
    }

    #[test]
    fn momentum_wrap_negative() {
        let g = Geometry::new([8, 8, 8, 16]);
        assert_eq!(g.wrap_momentum(-1, 0), 7);
        assert_eq!(g.wrap_momentum(8, 0), 0);
        assert_eq!(g.wrap_momentum(3, 1), 3);
    }

    #[test]
    fn periodic_separation_takes_short_way() {
        let g = Geometry::new([8, 8, 8, 16]);
        assert_eq!(g.periodic_sep_sq([0, 0, 0], [7, 0, 0]), 1);
        assert_eq!(g.periodic_sep_sq([1, 1, 1], [1, 1, 1]), 0);
        assert_eq!(g.periodic_sep_sq([0, 0, 0], [4, 4, 4]), 48);
    }

    #[test]
    fn fft_capability() {
        assert!(Geometry::new([8, 8, 8, 16]).fft_capable());
        assert!(!Geometry::new([6, 8, 8, 16]).fft_capable());
    }
}
