// SPDX-License-Identifier: AGPL-3.0-only

//! Streaming propagator sources.
//!
//! A propagator never exists in memory as a whole: the orchestrator pulls
//! one spatial slab at a time through [`PropagatorSource`], which is the
//! trait boundary behind which a file-backed reader, a solver, or the
//! in-memory test source all look identical. Sources are `Send` so the
//! read-ahead producer thread can own them during a run.

use crate::error::{Error, Result};
use crate::lattice::geometry::Geometry;
use crate::lattice::spinor::Spinor;

/// One timeslice worth of propagator data.
#[derive(Clone, Debug)]
pub struct TimesliceBuffer {
    /// Source-file timeslice this slab belongs to.
    pub t: usize,
    /// `spatial_volume` spinors, laid out by [`Geometry::spatial_index`].
    pub sites: Vec<Spinor>,
}

/// Sequential timeslice reader for one quark propagator.
pub trait PropagatorSource: Send {
    /// Next slab, in increasing t. Reading past `Nt` slabs is an error.
    fn read_timeslice(&mut self) -> Result<TimesliceBuffer>;

    /// Reset to t = 0.
    fn rewind(&mut self) -> Result<()>;

    /// Temporal extent this source will deliver.
    fn nt(&self) -> usize;
}

/// Fully materialized source for tests and synthetic runs.
pub struct InMemorySource {
    slices: Vec<Vec<Spinor>>,
    cursor: usize,
}

impl InMemorySource {
    /// Wrap per-timeslice site vectors. Every slice must hold exactly one
    /// spatial volume of spinors.
    pub fn from_slices(geom: &Geometry, slices: Vec<Vec<Spinor>>) -> Result<Self> {
        if slices.len() != geom.nt() {
            return Err(Error::InvalidInput(format!(
                "source holds {} timeslices, geometry wants {}",
                slices.len(),
                geom.nt()
            )));
        }
        for (t, s) in slices.iter().enumerate() {
            if s.len() != geom.spatial_volume() {
                return Err(Error::InvalidInput(format!(
                    "timeslice {t} holds {} sites, geometry wants {}",
                    s.len(),
                    geom.spatial_volume()
                )));
            }
        }
        Ok(Self { slices, cursor: 0 })
    }

    /// Free-field point source: the identity tensor at one site, zero
    /// everywhere else. The analytic baseline for kernel identities.
    pub fn point_identity(geom: &Geometry, origin: [usize; 4]) -> Result<Self> {
        for (mu, (&o, &l)) in origin.iter().zip(&geom.dims).enumerate() {
            if o >= l {
                return Err(Error::InvalidInput(format!(
                    "origin component {mu} is {o}, extent is {l}"
                )));
            }
        }
        let mut slices = vec![vec![Spinor::zero(); geom.spatial_volume()]; geom.nt()];
        let spatial = geom.spatial_index([origin[0], origin[1], origin[2]]);
        slices[origin[3]][spatial] = Spinor::identity();
        Self::from_slices(geom, slices)
    }

    /// Identity tensor at every site of every timeslice; with wall sums
    /// each slab contributes `spatial_volume` identity contractions.
    pub fn unit_everywhere(geom: &Geometry) -> Result<Self> {
        let slices = vec![vec![Spinor::identity(); geom.spatial_volume()]; geom.nt()];
        Self::from_slices(geom, slices)
    }
}

impl PropagatorSource for InMemorySource {
    fn read_timeslice(&mut self) -> Result<TimesliceBuffer> {
        let t = self.cursor;
        let slice = self.slices.get(t).ok_or_else(|| {
            Error::InvalidInput(format!("read past final timeslice {}", self.slices.len()))
        })?;
        self.cursor += 1;
        Ok(TimesliceBuffer {
            t,
            sites: slice.clone(),
        })
    }

    fn rewind(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }

    fn nt(&self) -> usize {
        self.slices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_reads_then_exhaustion() {
        let geom = Geometry::new([2, 2, 2, 3]);
        let mut src = InMemorySource::unit_everywhere(&geom).unwrap();
        for t in 0..3 {
            let slab = src.read_timeslice().unwrap();
            assert_eq!(slab.t, t);
            assert_eq!(slab.sites.len(), 8);
        }
        assert!(src.read_timeslice().is_err());
        src.rewind().unwrap();
        assert_eq!(src.read_timeslice().unwrap().t, 0);
    }

    #[test]
    fn point_identity_is_localized() {
        let geom = Geometry::new([2, 2, 2, 4]);
        let mut src = InMemorySource::point_identity(&geom, [1, 0, 1, 2]).unwrap();
        for t in 0..4 {
            let slab = src.read_timeslice().unwrap();
            let hot = geom.spatial_index([1, 0, 1]);
            for (idx, s) in slab.sites.iter().enumerate() {
                if t == 2 && idx == hot {
                    assert_eq!(*s, Spinor::identity());
                } else {
                    assert_eq!(*s, Spinor::zero());
                }
            }
        }
    }

    #[test]
    fn point_origin_outside_lattice_rejected() {
        let geom = Geometry::new([2, 2, 2, 4]);
        assert!(InMemorySource::point_identity(&geom, [0, 0, 0, 4]).is_err());
        assert!(InMemorySource::point_identity(&geom, [2, 0, 0, 0]).is_err());
        assert!(InMemorySource::point_identity(&geom, [1, 1, 1, 3]).is_ok());
    }

    #[test]
    fn shape_mismatch_rejected() {
        let geom = Geometry::new([2, 2, 2, 2]);
        let bad = vec![vec![Spinor::zero(); 7]; 2];
        assert!(InMemorySource::from_slices(&geom, bad).is_err());
        let short = vec![vec![Spinor::zero(); 8]];
        assert!(InMemorySource::from_slices(&geom, short).is_err());
    }
}
