// SPDX-License-Identifier: AGPL-3.0-only

//! Checksummed binary correlator files.
//!
//! Layout (all 32-bit fields little-endian on write):
//!
//! ```text
//! magic             u32        0x434F5252 ("CORR")
//! n_mom             u32
//! per momentum:     u32 = 3, 3 × i32 components, u32 = 3   (redundant counts)
//! n_src, n_snk      u32, u32
//! per momentum block:
//!   n_src, n_snk    u32, u32                               (redundant)
//!   per (src, snk) channel pair:
//!     lt            u32
//!     lt samples    2 × f64 (re, im)
//! sum29, sum31      u32, u32
//! ```
//!
//! The checksums are rotating XORs over every logical 32-bit payload word
//! (magic through the last sample; an f64 contributes its two LE words):
//! `sum29 ^= w.rotl(k mod 29)`, `sum31 ^= w.rotl(k mod 31)` with k the
//! running word index. Rotation makes the sums order-sensitive, so a
//! transposed block fails even when a plain XOR would cancel.
//!
//! A reader facing a foreign-endian file detects it from the magic,
//! byte-swaps every field exactly once (u32 word swap, f64 8-byte
//! reversal) and re-verifies; a second mismatch is `Error::Format`.
//! Checksum verification happens over the logical words, so it is
//! endian-independent by construction. A failed checksum is handled per
//! [`ChecksumPolicy`]: the default warns and keeps the data, matching
//! long-standing practice for legacy ensembles; `Reject` turns it into
//! a hard error for production pipelines.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::lattice::complex_f64::Complex64;

/// File magic, "CORR" as a big-endian word value.
pub const CORR_MAGIC: u32 = 0x434F_5252;

/// What to do when stored and computed checksums disagree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChecksumPolicy {
    /// Warn on stderr, return the data anyway.
    #[default]
    Warn,
    /// Fail the read with `Error::Checksum`.
    Reject,
}

/// Rotating-XOR checksum pair over a stream of logical 32-bit words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChecksumAcc {
    k: u32,
    /// XOR of words rotated by k mod 29.
    pub sum29: u32,
    /// XOR of words rotated by k mod 31.
    pub sum31: u32,
}

impl ChecksumAcc {
    /// Fold one word into both sums.
    pub fn add_word(&mut self, w: u32) {
        self.sum29 ^= w.rotate_left(self.k % 29);
        self.sum31 ^= w.rotate_left(self.k % 31);
        self.k = self.k.wrapping_add(1);
    }

    /// Fold an f64 as its two little-endian 32-bit words.
    pub fn add_f64(&mut self, v: f64) {
        let bits = v.to_bits();
        self.add_word(bits as u32);
        self.add_word((bits >> 32) as u32);
    }
}

/// A full correlator measurement: every (source gamma, sink gamma)
/// channel pair at every momentum over the whole temporal extent.
///
/// Dense layout `data[((src · n_snk + snk) · n_mom + m) · lt + t]`, so a
/// (channel pair, momentum, timeslice) triple is a unique slot and the
/// orchestrator's writes need no locks.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelatorSet {
    pub n_src: usize,
    pub n_snk: usize,
    pub lt: usize,
    pub momenta: Vec<[i32; 3]>,
    pub data: Vec<Complex64>,
}

impl CorrelatorSet {
    /// Zero-filled set for the given shape.
    #[must_use]
    pub fn new(n_src: usize, n_snk: usize, lt: usize, momenta: Vec<[i32; 3]>) -> Self {
        let data = vec![Complex64::ZERO; n_src * n_snk * momenta.len() * lt];
        Self {
            n_src,
            n_snk,
            lt,
            momenta,
            data,
        }
    }

    /// Flat index of (src channel, snk channel, momentum, timeslice).
    #[must_use]
    pub fn index(&self, src: usize, snk: usize, m: usize, t: usize) -> usize {
        ((src * self.n_snk + snk) * self.momenta.len() + m) * self.lt + t
    }

    /// Read one sample.
    #[must_use]
    pub fn at(&self, src: usize, snk: usize, m: usize, t: usize) -> Complex64 {
        self.data[self.index(src, snk, m, t)]
    }

    /// Add into one sample.
    pub fn accumulate(&mut self, src: usize, snk: usize, m: usize, t: usize, v: Complex64) {
        let idx = self.index(src, snk, m, t);
        self.data[idx] += v;
    }
}

struct CountingWriter<W: Write> {
    inner: W,
    acc: ChecksumAcc,
}

impl<W: Write> CountingWriter<W> {
    fn put_u32(&mut self, w: u32) -> io::Result<()> {
        self.acc.add_word(w);
        self.inner.write_all(&w.to_le_bytes())
    }

    fn put_i32(&mut self, v: i32) -> io::Result<()> {
        self.put_u32(v as u32)
    }

    fn put_f64(&mut self, v: f64) -> io::Result<()> {
        self.acc.add_f64(v);
        self.inner.write_all(&v.to_le_bytes())
    }
}

/// Serialize a correlator set. The output is little-endian regardless of
/// host order.
pub fn write_correlator(path: &Path, set: &CorrelatorSet) -> Result<()> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut w = CountingWriter {
        inner: BufWriter::new(file),
        acc: ChecksumAcc::default(),
    };
    let body = |w: &mut CountingWriter<BufWriter<File>>| -> io::Result<()> {
        w.put_u32(CORR_MAGIC)?;
        w.put_u32(set.momenta.len() as u32)?;
        for p in &set.momenta {
            w.put_u32(3)?;
            for &c in p {
                w.put_i32(c)?;
            }
            w.put_u32(3)?;
        }
        w.put_u32(set.n_src as u32)?;
        w.put_u32(set.n_snk as u32)?;
        for m in 0..set.momenta.len() {
            w.put_u32(set.n_src as u32)?;
            w.put_u32(set.n_snk as u32)?;
            for src in 0..set.n_src {
                for snk in 0..set.n_snk {
                    w.put_u32(set.lt as u32)?;
                    for t in 0..set.lt {
                        let v = set.at(src, snk, m, t);
                        w.put_f64(v.re)?;
                        w.put_f64(v.im)?;
                    }
                }
            }
        }
        let acc = w.acc;
        w.inner.write_all(&acc.sum29.to_le_bytes())?;
        w.inner.write_all(&acc.sum31.to_le_bytes())?;
        w.inner.flush()
    };
    body(&mut w).map_err(io_err)
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    swap: bool,
    acc: ChecksumAcc,
    path: &'a Path,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(Error::Io {
                path: self.path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "truncated correlator file"),
            });
        }
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        let raw = [b[0], b[1], b[2], b[3]];
        let w = if self.swap {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        };
        self.acc.add_word(w);
        Ok(w)
    }

    fn i32(&mut self) -> Result<i32> {
        self.u32().map(|w| w as i32)
    }

    /// Trailing checksum words: read without folding into the accumulator.
    fn u32_raw(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        let raw = [b[0], b[1], b[2], b[3]];
        Ok(if self.swap {
            u32::from_be_bytes(raw)
        } else {
            u32::from_le_bytes(raw)
        })
    }

    fn f64(&mut self) -> Result<f64> {
        let b = self.take(8)?;
        let mut raw = [b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]];
        if self.swap {
            raw.reverse();
        }
        let v = f64::from_le_bytes(raw);
        self.acc.add_f64(v);
        Ok(v)
    }
}

/// Deserialize a correlator file, auto-detecting byte order from the
/// magic and verifying the rotating checksums per `policy`.
pub fn read_correlator(path: &Path, policy: ChecksumPolicy) -> Result<CorrelatorSet> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut buf = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut buf))
        .map_err(io_err)?;
    if buf.len() < 4 {
        return Err(Error::Format(format!(
            "{}: shorter than a magic word",
            path.display()
        )));
    }
    let head = [buf[0], buf[1], buf[2], buf[3]];
    let swap = if u32::from_le_bytes(head) == CORR_MAGIC {
        false
    } else if u32::from_be_bytes(head) == CORR_MAGIC {
        true
    } else {
        return Err(Error::Format(format!(
            "{}: bad magic {:#010x} in either byte order",
            path.display(),
            u32::from_le_bytes(head)
        )));
    };
    let mut c = Cursor {
        buf: &buf,
        pos: 0,
        swap,
        acc: ChecksumAcc::default(),
        path,
    };
    c.u32()?; // magic, already validated
    let n_mom = c.u32()? as usize;
    // A corrupt count must not reserve gigabytes before the first entry
    // fails to parse; each entry occupies 20 bytes on disk.
    let mut momenta = Vec::with_capacity(n_mom.min(buf.len() / 20));
    for _ in 0..n_mom {
        let lead = c.u32()?;
        if lead != 3 {
            return Err(Error::Format(format!(
                "{}: momentum component count {lead}, expected 3",
                path.display()
            )));
        }
        let p = [c.i32()?, c.i32()?, c.i32()?];
        let tail = c.u32()?;
        if tail != 3 {
            return Err(Error::Format(format!(
                "{}: trailing momentum count {tail}, expected 3",
                path.display()
            )));
        }
        momenta.push(p);
    }
    let n_src = c.u32()? as usize;
    let n_snk = c.u32()? as usize;
    let mut lt = 0usize;
    let mut lt_known = false;
    let mut data = Vec::new();
    for m in 0..n_mom {
        let bs = c.u32()? as usize;
        let bk = c.u32()? as usize;
        if bs != n_src || bk != n_snk {
            return Err(Error::Format(format!(
                "{}: block {m} channel counts ({bs}, {bk}) disagree with header ({n_src}, {n_snk})",
                path.display()
            )));
        }
        for src in 0..n_src {
            for snk in 0..n_snk {
                let this_lt = c.u32()? as usize;
                if !lt_known {
                    lt_known = true;
                    lt = this_lt;
                    // Header words are untrusted: the sample count must
                    // neither overflow nor exceed what the file can hold
                    // (16 bytes per complex sample).
                    let samples = n_src
                        .checked_mul(n_snk)
                        .and_then(|v| v.checked_mul(n_mom))
                        .and_then(|v| v.checked_mul(lt))
                        .ok_or_else(|| {
                            Error::Format(format!(
                                "{}: sample count {n_src}x{n_snk}x{n_mom}x{lt} overflows",
                                path.display()
                            ))
                        })?;
                    if samples.checked_mul(16).map_or(true, |b| b > buf.len()) {
                        return Err(Error::Format(format!(
                            "{}: header declares {samples} samples, more than the file holds",
                            path.display()
                        )));
                    }
                    data = vec![Complex64::ZERO; samples];
                } else if this_lt != lt {
                    return Err(Error::Format(format!(
                        "{}: temporal extent {this_lt} disagrees with {lt}",
                        path.display()
                    )));
                }
                for t in 0..lt {
                    let re = c.f64()?;
                    let im = c.f64()?;
                    data[((src * n_snk + snk) * n_mom + m) * lt + t] = Complex64::new(re, im);
                }
            }
        }
    }
    let computed = c.acc;
    let stored29 = c.u32_raw()?;
    let stored31 = c.u32_raw()?;
    if c.pos != buf.len() {
        return Err(Error::Format(format!(
            "{}: {} trailing bytes after checksums",
            path.display(),
            buf.len() - c.pos
        )));
    }
    if (computed.sum29, computed.sum31) != (stored29, stored31) {
        match policy {
            ChecksumPolicy::Reject => {
                return Err(Error::Checksum {
                    stored: (stored29, stored31),
                    computed: (computed.sum29, computed.sum31),
                })
            }
            ChecksumPolicy::Warn => {
                eprintln!(
                    "warning: {}: checksum mismatch (stored {:#010x}/{:#010x}, computed {:#010x}/{:#010x})",
                    path.display(),
                    stored29,
                    stored31,
                    computed.sum29,
                    computed.sum31
                );
            }
        }
    }
    Ok(CorrelatorSet {
        n_src,
        n_snk,
        lt,
        momenta,
        data,
    })
}
