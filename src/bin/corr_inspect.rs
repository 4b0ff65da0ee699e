// SPDX-License-Identifier: AGPL-3.0-only

//! Inspect a correlator file: header shape, momentum list, and the
//! zero-momentum diagonal channels.
//!
//! Usage: corr_inspect <file> [--checksum=warn|reject]
//!
//! Exit code 0 on a readable file, 1 on any error (including a checksum
//! mismatch under `--checksum=reject`).

use std::process;

use coldspring_barracuda::corrfile::{read_correlator, ChecksumPolicy};

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: corr_inspect <file> [--checksum=warn|reject]");
        process::exit(1);
    };
    let mut policy = ChecksumPolicy::Warn;
    for arg in args {
        match arg.as_str() {
            "--checksum=warn" => policy = ChecksumPolicy::Warn,
            "--checksum=reject" => policy = ChecksumPolicy::Reject,
            other => {
                eprintln!("corr_inspect: unknown argument {other}");
                process::exit(1);
            }
        }
    }
    let set = match read_correlator(std::path::Path::new(&path), policy) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("corr_inspect: {e}");
            process::exit(1);
        }
    };
    println!(
        "{path}: {} x {} channels, lt={}, {} momenta",
        set.n_src,
        set.n_snk,
        set.lt,
        set.momenta.len()
    );
    for (m, p) in set.momenta.iter().enumerate() {
        println!("  mom[{m}] = ({}, {}, {})  psq={}", p[0], p[1], p[2],
            p[0] * p[0] + p[1] * p[1] + p[2] * p[2]);
    }
    let diag = set.n_src.min(set.n_snk);
    for ch in 0..diag {
        println!("  channel ({ch}, {ch}) at p=0:");
        for t in 0..set.lt {
            let v = set.at(ch, ch, 0, t);
            println!("    t={t:3}  {:+.12e}  {:+.12e}", v.re, v.im);
        }
    }
}
