// SPDX-License-Identifier: AGPL-3.0-only

//! Generalized-permutation gamma matrices.
//!
//! Every Euclidean gamma matrix (and every product of gamma matrices) has
//! exactly one nonzero entry per row and column, and that entry is a fourth
//! root of unity. A matrix is therefore stored as a column permutation plus
//! a phase code per row: row r carries the value i^`ph[r]` in column
//! `col[r]`. Multiplication composes permutations and adds phase codes
//! mod 4 — O(`N_SPIN`) instead of a dense 4×4 complex multiply.
//!
//! The 16-element basis table enumerates Γ(n) = γx^bx γy^by γz^bz γt^bt
//! with n = bx + 2·by + 4·bz + 8·bt, so Γ(0) is the identity and Γ(15)
//! is γ5 = γx γy γz γt.
//!
//! # References
//!
//! - DeGrand & Rossi, Comput. Phys. Commun. 60, 211 (1990) — chiral basis
//! - Gattringer & Lang, "QCD on the Lattice" (2010), App. A

use crate::error::{Error, Result};
use crate::lattice::complex_f64::Complex64;

/// Number of Dirac spin components.
pub const N_SPIN: usize = 4;

/// Table index of the identity Γ(0).
pub const G_ID: usize = 0;
/// Table index of γx.
pub const G_X: usize = 1;
/// Table index of γy.
pub const G_Y: usize = 2;
/// Table index of γz.
pub const G_Z: usize = 4;
/// Table index of γt.
pub const G_T: usize = 8;
/// Table index of γ5 = γx γy γz γt.
pub const G_5: usize = 15;

/// A gamma matrix as a generalized permutation.
///
/// Row r has its single nonzero at column `col[r]` with value i^`ph[r]`.
/// Invariant: `col` is a permutation of `0..N_SPIN`; phase codes are < 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct Gamma {
    /// Target column per row.
    pub col: [usize; N_SPIN],
    /// Phase code per row: value is i^`ph[r]`.
    pub ph: [u8; N_SPIN],
}

impl Gamma {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        col: [0, 1, 2, 3],
        ph: [0, 0, 0, 0],
    };

    /// Matrix product `self · rhs`, composing permutations and adding
    /// phase codes mod 4.
    pub const fn multiply(self, rhs: Self) -> Self {
        let mut out = Self::IDENTITY;
        let mut r = 0;
        while r < N_SPIN {
            let k = self.col[r];
            out.col[r] = rhs.col[k];
            out.ph[r] = (self.ph[r] + rhs.ph[k]) & 3;
            r += 1;
        }
        out
    }

    /// Transpose: the nonzero of row r moves to row `col[r]`, column r,
    /// keeping its phase.
    pub const fn transpose(self) -> Self {
        let mut out = Self::IDENTITY;
        let mut r = 0;
        while r < N_SPIN {
            out.col[self.col[r]] = r;
            out.ph[self.col[r]] = self.ph[r];
            r += 1;
        }
        out
    }

    /// Complex conjugate: phase code k → (4 − k) mod 4.
    pub const fn conjugate(self) -> Self {
        let mut out = self;
        let mut r = 0;
        while r < N_SPIN {
            out.ph[r] = (4 - self.ph[r]) & 3;
            r += 1;
        }
        out
    }

    /// Conjugate transpose.
    pub const fn adjoint(self) -> Self {
        self.conjugate().transpose()
    }

    /// Whether `col` is a valid permutation (one nonzero per row *and*
    /// column — the generalized-permutation invariant).
    #[must_use]
    pub const fn is_permutation(&self) -> bool {
        let mut seen = [false; N_SPIN];
        let mut r = 0;
        while r < N_SPIN {
            if seen[self.col[r]] {
                return false;
            }
            seen[self.col[r]] = true;
            r += 1;
        }
        true
    }

    /// Entry (r, c) as a complex value.
    #[must_use]
    pub fn entry(&self, r: usize, c: usize) -> Complex64 {
        if self.col[r] == c {
            Complex64::ONE.mul_phase(self.ph[r])
        } else {
            Complex64::ZERO
        }
    }

    /// Trace as a complex value.
    #[must_use]
    pub fn trace(&self) -> Complex64 {
        let mut t = Complex64::ZERO;
        for r in 0..N_SPIN {
            if self.col[r] == r {
                t += Complex64::ONE.mul_phase(self.ph[r]);
            }
        }
        t
    }
}

/// Gamma-matrix representation matching the upstream fermion discretization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GammaBasis {
    /// DeGrand-Rossi chiral basis: γ5 diagonal.
    Chiral,
    /// Dirac-Pauli basis: γt diagonal.
    NonRelativistic,
    /// Static-quark basis: Dirac-Pauli generators, γt diagonal.
    Static,
}

impl GammaBasis {
    /// Parse a basis tag. Unrecognized tags are a configuration error.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for anything but `chiral`, `nonrelativistic`
    /// (alias `nr`), or `static`.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "chiral" => Ok(Self::Chiral),
            "nonrelativistic" | "nr" => Ok(Self::NonRelativistic),
            "static" => Ok(Self::Static),
            other => Err(Error::Config(format!("unknown gamma basis tag '{other}'"))),
        }
    }

    /// Whether two tags share one matrix representation. The
    /// nonrelativistic and static bases use identical generators, so no
    /// rotation separates them; only chiral stands apart.
    #[must_use]
    pub const fn same_representation(self, other: Self) -> bool {
        matches!(self, Self::Chiral) == matches!(other, Self::Chiral)
    }

    /// The four generators `[γx, γy, γz, γt]` of this basis.
    #[must_use]
    pub const fn generators(self) -> [Gamma; 4] {
        // Spatial generators are shared; the bases differ in γt
        // (antidiagonal in the chiral basis, diagonal otherwise).
        let gx = Gamma {
            col: [3, 2, 1, 0],
            ph: [1, 1, 3, 3],
        };
        let gy = Gamma {
            col: [3, 2, 1, 0],
            ph: [2, 0, 0, 2],
        };
        let gz = Gamma {
            col: [2, 3, 0, 1],
            ph: [1, 3, 3, 1],
        };
        let gt = match self {
            Self::Chiral => Gamma {
                col: [2, 3, 0, 1],
                ph: [0, 0, 0, 0],
            },
            Self::NonRelativistic | Self::Static => Gamma {
                col: [0, 1, 2, 3],
                ph: [0, 0, 2, 2],
            },
        };
        [gx, gy, gz, gt]
    }
}

/// The 16 basis matrices Γ(n) for one gamma basis.
#[derive(Clone, Debug)]
pub struct GammaTable {
    /// Which basis the table was built for.
    pub basis: GammaBasis,
    g: [Gamma; 16],
}

impl GammaTable {
    /// Build the table for a basis.
    #[must_use]
    pub fn build(basis: GammaBasis) -> Self {
        let [gx, gy, gz, gt] = basis.generators();
        let mut g = [Gamma::IDENTITY; 16];
        for (n, slot) in g.iter_mut().enumerate() {
            let mut m = Gamma::IDENTITY;
            if n & 1 != 0 {
                m = m.multiply(gx);
            }
            if n & 2 != 0 {
                m = m.multiply(gy);
            }
            if n & 4 != 0 {
                m = m.multiply(gz);
            }
            if n & 8 != 0 {
                m = m.multiply(gt);
            }
            *slot = m;
        }
        Self { basis, g }
    }

    /// Build from a basis tag string.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for an unrecognized tag.
    pub fn from_tag(tag: &str) -> Result<Self> {
        Ok(Self::build(GammaBasis::parse(tag)?))
    }

    /// Γ(n).
    #[must_use]
    pub fn gamma(&self, n: usize) -> Gamma {
        self.g[n & 15]
    }

    /// γ5 = Γ(15).
    #[must_use]
    pub fn gamma5(&self) -> Gamma {
        self.g[G_5]
    }

    /// Generator γ_μ for μ ∈ {0=x, 1=y, 2=z, 3=t}.
    #[must_use]
    pub fn generator(&self, mu: usize) -> Gamma {
        self.g[1 << mu]
    }
}
