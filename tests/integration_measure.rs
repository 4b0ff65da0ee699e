// SPDX-License-Identifier: AGPL-3.0-only

//! Full measurement pipeline: streamed sources through contraction,
//! projection, and serialization.

use coldspring_barracuda::corrfile::{read_correlator, ChecksumPolicy};
use coldspring_barracuda::error::{Error, Result};
use coldspring_barracuda::lattice::geometry::Geometry;
use coldspring_barracuda::measure::{run_baryon, run_meson, RunConfig};
use coldspring_barracuda::momentum::MomentumCut;
use coldspring_barracuda::propagator::{InMemorySource, PropagatorSource, TimesliceBuffer};

fn base_config(dims: [usize; 4]) -> RunConfig {
    RunConfig {
        dims,
        basis: "chiral".into(),
        source_gammas: vec![0, 15],
        sink_gammas: vec![0, 15],
        momentum: MomentumCut {
            max_psq: 1,
            max_component: None,
        },
        source_bases: None,
        flavor: None,
        parity: None,
        wall_source: false,
        time_origin: 0,
        output: None,
        threads: Some(2),
    }
}

#[test]
fn run_writes_file_matching_in_memory_result() {
    let dims = [4, 4, 4, 8];
    let geom = Geometry::new(dims);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("point.corr");
    let mut cfg = base_config(dims);
    cfg.output = Some(out.clone());
    cfg.time_origin = 3;
    let s1 = InMemorySource::point_identity(&geom, [1, 2, 3, 3]).unwrap();
    let s2 = InMemorySource::point_identity(&geom, [1, 2, 3, 3]).unwrap();
    let set = run_meson(&cfg, Box::new(s1), Box::new(s2)).unwrap();
    let back = read_correlator(&out, ChecksumPolicy::Reject).unwrap();
    assert_eq!(back, set);
    // The identity channel carries 12 at shifted t = 0; magnitude is
    // momentum-independent for a point source.
    for m in 0..back.momenta.len() {
        assert!((back.at(0, 0, m, 0).abs() - 12.0).abs() < 1e-9);
    }
    for t in 1..8 {
        assert!(back.at(0, 0, 0, t).abs() < 1e-12);
    }
}

#[test]
fn baryon_run_round_trips_through_file() {
    // Identity point sources: uds baryon carries term0 = 96 at the
    // shifted source timeslice in every momentum bin.
    let dims = [4, 4, 4, 8];
    let geom = Geometry::new(dims);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("baryon.corr");
    let mut cfg = base_config(dims);
    cfg.source_gammas = vec![0];
    cfg.sink_gammas = vec![0];
    cfg.flavor = Some("uds".into());
    cfg.output = Some(out.clone());
    cfg.time_origin = 2;
    let mk = || InMemorySource::point_identity(&geom, [1, 0, 2, 2]).unwrap();
    let set = run_baryon(&cfg, Box::new(mk()), Box::new(mk()), Box::new(mk())).unwrap();
    let back = read_correlator(&out, ChecksumPolicy::Reject).unwrap();
    assert_eq!(back, set);
    for m in 0..back.momenta.len() {
        assert!((back.at(0, 0, m, 0).abs() - 96.0).abs() < 1e-8);
    }
    for t in 1..8 {
        assert!(back.at(0, 0, 0, t).abs() < 1e-12);
    }
}

#[test]
fn config_loads_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    std::fs::write(
        &path,
        r#"{
            "dims": [4, 4, 4, 8],
            "basis": "nonrelativistic",
            "source_gammas": [15],
            "sink_gammas": [15],
            "momentum": { "max_psq": 2, "max_component": 1 },
            "wall_source": true,
            "time_origin": 2
        }"#,
    )
    .unwrap();
    let cfg = RunConfig::load(&path).unwrap();
    assert_eq!(cfg.dims, [4, 4, 4, 8]);
    assert_eq!(cfg.basis, "nonrelativistic");
    assert!(cfg.wall_source);
    assert_eq!(cfg.momentum.max_component, Some(1));
    assert_eq!(cfg.output, None);
    assert_eq!(cfg.threads, None);
}

#[test]
fn bad_config_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{ "dims": [4, 4, 4, 8] }"#).unwrap();
    match RunConfig::load(&path) {
        Err(Error::Config(_)) => {}
        other => panic!("expected config error, got {other:?}"),
    }
}

/// Source that fails partway through the stream.
struct FailingSource {
    inner: InMemorySource,
    fail_at: usize,
    served: usize,
}

impl PropagatorSource for FailingSource {
    fn read_timeslice(&mut self) -> Result<TimesliceBuffer> {
        if self.served == self.fail_at {
            return Err(Error::InvalidInput("simulated read failure".into()));
        }
        self.served += 1;
        self.inner.read_timeslice()
    }

    fn rewind(&mut self) -> Result<()> {
        self.served = 0;
        self.inner.rewind()
    }

    fn nt(&self) -> usize {
        self.inner.nt()
    }
}

#[test]
fn reader_failure_aborts_without_partial_output() {
    let dims = [4, 4, 4, 8];
    let geom = Geometry::new(dims);
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("aborted.corr");
    let mut cfg = base_config(dims);
    cfg.output = Some(out.clone());
    let s1 = FailingSource {
        inner: InMemorySource::unit_everywhere(&geom).unwrap(),
        fail_at: 3,
        served: 0,
    };
    let s2 = InMemorySource::unit_everywhere(&geom).unwrap();
    let res = run_meson(&cfg, Box::new(s1), Box::new(s2));
    assert!(res.is_err());
    assert!(!out.exists(), "failed run must not leave an output file");
}

#[test]
fn wall_and_point_agree_at_zero_momentum_for_uniform_sources() {
    // For a spatially uniform propagator the point-sink projection at
    // p = 0 equals the wall-wall value divided by the spatial volume
    // (one wall sum is already implied by the projection).
    let dims = [4, 4, 4, 4];
    let geom = Geometry::new(dims);
    let cfg_point = base_config(dims);
    let mut cfg_wall = base_config(dims);
    cfg_wall.wall_source = true;
    let mk = || InMemorySource::unit_everywhere(&geom).unwrap();
    let point = run_meson(&cfg_point, Box::new(mk()), Box::new(mk())).unwrap();
    let wall = run_meson(&cfg_wall, Box::new(mk()), Box::new(mk())).unwrap();
    let v = geom.spatial_volume() as f64;
    for t in 0..4 {
        let p = point.at(0, 0, 0, t);
        let w = wall.at(0, 0, 0, t);
        assert!((w.re - p.re * v).abs() < 1e-8, "t={t} point={p} wall={w}");
    }
}
