// SPDX-License-Identifier: AGPL-3.0-only

//! Timeslice-streaming measurement orchestrator.
//!
//! Correlator production never holds a full propagator: the quark lines
//! stream in one spatial slab at a time. A dedicated producer thread owns
//! every source and reads slab t+1 while the rayon pool contracts slab t;
//! the bounded capacity-1 channel between them is the double buffer, and
//! the pre-loop receive of slab 0 is the barrier before any contraction.
//!
//! Per slab: lines whose stored gamma representation differs from the run
//! basis are rotated on arrival, then every site is contracted for every
//! (source gamma, sink gamma) channel pair in a site-parallel loop, each
//! channel's site field is momentum-projected, and the projected values
//! land at (channel, momentum, shifted t) — unique slots in the result
//! set, so no write ever needs a lock. Wall-sourced runs instead sum each
//! slab to a single wall spinor per line and contract wall-wall per
//! channel pair, which only populates the zero-momentum bin.
//!
//! Two drivers share this plumbing: [`run_meson`] streams two lines and
//! γ5-adjoints the second; [`run_baryon`] streams three lines through the
//! epsilon contraction under the configured flavor weights and parity
//! projection.
//!
//! A reader failure sets a write-once flag and surfaces as the error of
//! the whole run; nothing is serialized on failure, so a crashed run
//! leaves no partial output file. Buffers die with the context by drop.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use rayon::prelude::*;
use serde::Deserialize;

use crate::contract::baryon::{self, BaryonFlavor};
use crate::contract::meson;
use crate::corrfile::{write_correlator, CorrelatorSet};
use crate::error::{Error, Result};
use crate::lattice::complex_f64::Complex64;
use crate::lattice::gamma::{GammaBasis, GammaTable};
use crate::lattice::geometry::Geometry;
use crate::lattice::projector::parity_projector;
use crate::lattice::spinor::{basis_rotation, full_adjoint, rotate_basis, SpinMatrix, Spinor};
use crate::momentum::{compute_momentum_list, MomentumCut};
use crate::project::{time_shift, MomentumProjector};
use crate::propagator::{PropagatorSource, TimesliceBuffer};

/// One measurement run, deserialized from JSON.
#[derive(Clone, Debug, Deserialize)]
pub struct RunConfig {
    /// `[nx, ny, nz, nt]`.
    pub dims: [usize; 4],
    /// Gamma basis tag: "chiral", "nonrelativistic" or "static".
    pub basis: String,
    /// Source-side gamma indices, 0..16.
    pub source_gammas: Vec<u8>,
    /// Sink-side gamma indices, 0..16.
    pub sink_gammas: Vec<u8>,
    /// Momentum selection.
    pub momentum: MomentumCut,
    /// Per-line stored basis tags for sources solved in a different basis
    /// than `basis`; their slabs are rotated on arrival. Omitted means
    /// every line already matches the run basis.
    #[serde(default)]
    pub source_bases: Option<Vec<String>>,
    /// Baryon flavor content tag: "uds", "uud" or "uuu". Omitted defaults
    /// to uds. Meson runs ignore it.
    #[serde(default)]
    pub flavor: Option<String>,
    /// Baryon sink parity projection: "positive" or "negative". Omitted
    /// leaves the sink spin structure unprojected. Meson runs ignore it.
    #[serde(default)]
    pub parity: Option<String>,
    /// Wall-wall instead of point-sink momentum projection.
    #[serde(default)]
    pub wall_source: bool,
    /// Source timeslice for re-anchoring.
    #[serde(default)]
    pub time_origin: usize,
    /// Output file; omitted means in-memory result only.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Rayon pool size; omitted means the global default.
    #[serde(default)]
    pub threads: Option<usize>,
}

impl RunConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Structural checks that do not need the sources yet.
    pub fn validate(&self) -> Result<()> {
        if self.dims.iter().any(|&d| d == 0) {
            return Err(Error::Config(format!("zero extent in dims {:?}", self.dims)));
        }
        if self.source_gammas.is_empty() || self.sink_gammas.is_empty() {
            return Err(Error::Config("empty gamma channel list".into()));
        }
        for &g in self.source_gammas.iter().chain(&self.sink_gammas) {
            if g >= 16 {
                return Err(Error::Config(format!("gamma index {g} out of range 0..16")));
            }
        }
        GammaBasis::parse(&self.basis)?;
        if let Some(bases) = &self.source_bases {
            for b in bases {
                GammaBasis::parse(b)?;
            }
        }
        if let Some(f) = &self.flavor {
            BaryonFlavor::parse(f)?;
        }
        if let Some(p) = &self.parity {
            match p.to_ascii_lowercase().as_str() {
                "positive" | "negative" => {}
                other => {
                    return Err(Error::Config(format!("unknown parity tag '{other}'")));
                }
            }
        }
        Ok(())
    }
}

/// Meson measurement over two streamed quark lines.
///
/// `src1` supplies the forward line S₁, `src2` the line that is
/// γ5-adjointed per site before contraction. Returns the filled set and,
/// when the config names an output file, serializes it.
pub fn run_meson(
    cfg: &RunConfig,
    src1: Box<dyn PropagatorSource>,
    src2: Box<dyn PropagatorSource>,
) -> Result<CorrelatorSet> {
    cfg.validate()?;
    with_pool(cfg, move || run_meson_inner(cfg, src1, src2))
}

/// Baryon measurement over three streamed quark lines.
///
/// Lines enter the epsilon contraction in argument order: `src1` and
/// `src2` form the diquark dressed by the channel gammas, `src3` closes
/// through the configured flavor weights and parity projection.
pub fn run_baryon(
    cfg: &RunConfig,
    src1: Box<dyn PropagatorSource>,
    src2: Box<dyn PropagatorSource>,
    src3: Box<dyn PropagatorSource>,
) -> Result<CorrelatorSet> {
    cfg.validate()?;
    with_pool(cfg, move || run_baryon_inner(cfg, src1, src2, src3))
}

fn with_pool<F>(cfg: &RunConfig, f: F) -> Result<CorrelatorSet>
where
    F: FnOnce() -> Result<CorrelatorSet> + Send,
{
    match cfg.threads {
        None => f(),
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| Error::Config(format!("thread pool: {e}")))?;
            pool.install(f)
        }
    }
}

struct RunSetup {
    geom: Geometry,
    nt: usize,
    table: GammaTable,
    projector: MomentumProjector,
    rotations: Vec<Option<SpinMatrix>>,
    set: CorrelatorSet,
    started: Instant,
}

fn prepare(cfg: &RunConfig, sources: &[Box<dyn PropagatorSource>], label: &str) -> Result<RunSetup> {
    let geom = Geometry::new(cfg.dims);
    let nt = geom.nt();
    for s in sources {
        if s.nt() != nt {
            return Err(Error::InvalidInput(format!(
                "source delivers {} timeslices, geometry wants {nt}",
                s.nt()
            )));
        }
    }
    let table = GammaTable::from_tag(&cfg.basis)?;
    let rotations = line_rotations(cfg, sources.len(), table.basis)?;
    let momenta = compute_momentum_list(&cfg.momentum, &geom)?;
    let projector = MomentumProjector::new(&geom, &momenta)?;
    let set = CorrelatorSet::new(
        cfg.source_gammas.len(),
        cfg.sink_gammas.len(),
        nt,
        momenta.iter().map(|m| m.p).collect(),
    );
    println!(
        "measure: {label} dims={:?} basis={} channels={}x{} momenta={} path={}",
        cfg.dims,
        cfg.basis,
        set.n_src,
        set.n_snk,
        set.momenta.len(),
        if projector.uses_fft() { "fft" } else { "direct" }
    );
    Ok(RunSetup {
        geom,
        nt,
        table,
        projector,
        rotations,
        set,
        started: Instant::now(),
    })
}

/// Per-line rotation into the run basis, one slot per streamed source.
fn line_rotations(
    cfg: &RunConfig,
    n_lines: usize,
    run_basis: GammaBasis,
) -> Result<Vec<Option<SpinMatrix>>> {
    match &cfg.source_bases {
        None => Ok(vec![None; n_lines]),
        Some(tags) => {
            if tags.len() != n_lines {
                return Err(Error::Config(format!(
                    "source_bases names {} lines, this run streams {n_lines}",
                    tags.len()
                )));
            }
            tags.iter()
                .map(|t| Ok(basis_rotation(GammaBasis::parse(t)?, run_basis)))
                .collect()
        }
    }
}

struct SlabStream {
    rx: Receiver<Result<Vec<TimesliceBuffer>>>,
    producer: JoinHandle<()>,
    failed: Arc<AtomicBool>,
}

fn start_stream(mut sources: Vec<Box<dyn PropagatorSource>>, nt: usize) -> Result<SlabStream> {
    for s in &mut sources {
        s.rewind()?;
    }
    let failed = Arc::new(AtomicBool::new(false));
    let producer_failed = Arc::clone(&failed);
    let (tx, rx) = sync_channel::<Result<Vec<TimesliceBuffer>>>(1);
    let producer = std::thread::spawn(move || {
        for _ in 0..nt {
            let mut slabs = Vec::with_capacity(sources.len());
            let mut err = None;
            for s in &mut sources {
                match s.read_timeslice() {
                    Ok(b) => slabs.push(b),
                    Err(e) => {
                        err = Some(e);
                        break;
                    }
                }
            }
            let msg = match err {
                None => Ok(slabs),
                Some(e) => Err(e),
            };
            let bad = msg.is_err();
            if bad {
                producer_failed.store(true, Ordering::Release);
            }
            // A closed receiver means the consumer already gave up.
            if tx.send(msg).is_err() || bad {
                return;
            }
        }
    });
    Ok(SlabStream {
        rx,
        producer,
        failed,
    })
}

impl SlabStream {
    /// Next aligned set of slabs, each rotated into the run basis where
    /// its line's stored representation differs.
    fn next(&self, rotations: &[Option<SpinMatrix>]) -> Result<Vec<TimesliceBuffer>> {
        let mut slabs = self
            .rx
            .recv()
            .map_err(|_| Error::InvalidInput("propagator reader stopped early".into()))??;
        let t = slabs[0].t;
        if slabs.iter().any(|s| s.t != t) {
            return Err(Error::InvalidInput(format!("sources out of step at t={t}")));
        }
        for (slab, rot) in slabs.iter_mut().zip(rotations) {
            if let Some(r) = rot {
                slab.sites.par_iter_mut().for_each(|s| *s = rotate_basis(s, r));
            }
        }
        Ok(slabs)
    }

    /// Tear down after the loop; `run` is the consumer-side outcome.
    fn finish(self, run: Result<()>) -> Result<()> {
        // Dropping the receiver unblocks a producer mid-send before the join.
        drop(self.rx);
        let _ = self.producer.join();
        run?;
        if self.failed.load(Ordering::Acquire) {
            return Err(Error::InvalidInput("propagator read failed".into()));
        }
        Ok(())
    }
}

/// One wall spinor per line: each slab summed over its spatial sites.
fn wall_sums(slabs: &[TimesliceBuffer]) -> Vec<Spinor> {
    slabs
        .iter()
        .map(|slab| {
            let mut w = Spinor::zero();
            for s in &slab.sites {
                w.accumulate(s);
            }
            w
        })
        .collect()
}

/// Wall-wall values land in the zero-momentum bin only.
fn store_wall(set: &mut CorrelatorSet, values: Vec<Complex64>, ts: usize) {
    let n_snk = set.n_snk;
    for (pair, v) in values.into_iter().enumerate() {
        let idx = set.index(pair / n_snk, pair % n_snk, 0, ts);
        set.data[idx] = v;
    }
}

/// Gather each channel's site field out of the per-site rows, project it,
/// and write every momentum bin at the shifted timeslice.
fn project_rows(
    set: &mut CorrelatorSet,
    projector: &MomentumProjector,
    per_site: &[Vec<Complex64>],
    ts: usize,
) {
    let volume = per_site.len();
    let n_snk = set.n_snk;
    let mut field = vec![Complex64::ZERO; volume];
    for ch in 0..set.n_src * n_snk {
        for idx in 0..volume {
            field[idx] = per_site[idx][ch];
        }
        let projected = projector.project(&field);
        for (m, v) in projected.into_iter().enumerate() {
            let slot = set.index(ch / n_snk, ch % n_snk, m, ts);
            set.data[slot] = v;
        }
    }
}

fn finish_run(cfg: &RunConfig, nt: usize, started: Instant, set: CorrelatorSet) -> Result<CorrelatorSet> {
    println!(
        "measure: {} slabs in {:.2}s",
        nt,
        started.elapsed().as_secs_f64()
    );
    if let Some(out) = &cfg.output {
        write_correlator(out, &set)?;
        println!("measure: wrote {}", out.display());
    }
    Ok(set)
}

fn run_meson_inner(
    cfg: &RunConfig,
    src1: Box<dyn PropagatorSource>,
    src2: Box<dyn PropagatorSource>,
) -> Result<CorrelatorSet> {
    let sources = vec![src1, src2];
    let RunSetup {
        geom,
        nt,
        table,
        projector,
        rotations,
        mut set,
        started,
    } = prepare(cfg, &sources, "meson")?;
    let g5 = table.gamma5();
    let volume = geom.spatial_volume();
    let n_src = set.n_src;
    let n_snk = set.n_snk;
    let stream = start_stream(sources, nt)?;

    let run = (|| -> Result<()> {
        for _ in 0..nt {
            let slabs = stream.next(&rotations)?;
            let ts = time_shift(slabs[0].t, cfg.time_origin, nt);
            if cfg.wall_source {
                // Wall sums first, then one contraction per channel pair.
                let walls = wall_sums(&slabs);
                let w2_adj = full_adjoint(&walls[1], g5);
                let values: Vec<Complex64> = (0..n_src * n_snk)
                    .into_par_iter()
                    .map(|pair| {
                        let g_src = table.gamma(cfg.source_gammas[pair / n_snk] as usize);
                        let g_snk = table.gamma(cfg.sink_gammas[pair % n_snk] as usize);
                        meson::contract(g_src, g_snk, &walls[0], &w2_adj)
                    })
                    .collect();
                store_wall(&mut set, values, ts);
            } else {
                // Site-parallel contraction of every channel pair, one
                // adjoint per site shared across channels.
                let per_site: Vec<Vec<Complex64>> = (0..volume)
                    .into_par_iter()
                    .map(|idx| {
                        let s2_adj = full_adjoint(&slabs[1].sites[idx], g5);
                        let mut row = Vec::with_capacity(n_src * n_snk);
                        for &gs in &cfg.source_gammas {
                            for &gk in &cfg.sink_gammas {
                                row.push(meson::contract(
                                    table.gamma(gs as usize),
                                    table.gamma(gk as usize),
                                    &slabs[0].sites[idx],
                                    &s2_adj,
                                ));
                            }
                        }
                        row
                    })
                    .collect();
                project_rows(&mut set, &projector, &per_site, ts);
            }
        }
        Ok(())
    })();

    stream.finish(run)?;
    finish_run(cfg, nt, started, set)
}

fn run_baryon_inner(
    cfg: &RunConfig,
    src1: Box<dyn PropagatorSource>,
    src2: Box<dyn PropagatorSource>,
    src3: Box<dyn PropagatorSource>,
) -> Result<CorrelatorSet> {
    let flavor = match &cfg.flavor {
        Some(tag) => BaryonFlavor::parse(tag)?,
        None => BaryonFlavor::Uds,
    };
    let sources = vec![src1, src2, src3];
    let RunSetup {
        geom,
        nt,
        table,
        projector,
        rotations,
        mut set,
        started,
    } = prepare(cfg, &sources, "baryon")?;
    let proj = match cfg.parity.as_deref() {
        None => SpinMatrix::IDENTITY,
        Some(p) => parity_projector(&table, p.eq_ignore_ascii_case("positive")),
    };
    let volume = geom.spatial_volume();
    let n_src = set.n_src;
    let n_snk = set.n_snk;
    let stream = start_stream(sources, nt)?;

    let run = (|| -> Result<()> {
        for _ in 0..nt {
            let slabs = stream.next(&rotations)?;
            let ts = time_shift(slabs[0].t, cfg.time_origin, nt);
            if cfg.wall_source {
                let walls = wall_sums(&slabs);
                let values: Vec<Complex64> = (0..n_src * n_snk)
                    .into_par_iter()
                    .map(|pair| {
                        let g_src = table.gamma(cfg.source_gammas[pair / n_snk] as usize);
                        let g_snk = table.gamma(cfg.sink_gammas[pair % n_snk] as usize);
                        baryon::contract(g_src, g_snk, &walls[0], &walls[1], &walls[2], &proj, flavor)
                    })
                    .collect();
                store_wall(&mut set, values, ts);
            } else {
                let per_site: Vec<Vec<Complex64>> = (0..volume)
                    .into_par_iter()
                    .map(|idx| {
                        let mut row = Vec::with_capacity(n_src * n_snk);
                        for &gs in &cfg.source_gammas {
                            for &gk in &cfg.sink_gammas {
                                row.push(baryon::contract(
                                    table.gamma(gs as usize),
                                    table.gamma(gk as usize),
                                    &slabs[0].sites[idx],
                                    &slabs[1].sites[idx],
                                    &slabs[2].sites[idx],
                                    &proj,
                                    flavor,
                                ));
                            }
                        }
                        row
                    })
                    .collect();
                project_rows(&mut set, &projector, &per_site, ts);
            }
        }
        Ok(())
    })();

    stream.finish(run)?;
    finish_run(cfg, nt, started, set)
}
