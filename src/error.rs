// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for coldSpring measurement and I/O operations.
//!
//! One enum covers the whole engine so callers can pattern-match on failure
//! modes (bad basis tag, truncated file, foreign magic) rather than parsing
//! opaque strings. No external error crates — zero-dependency error type.
//!
//! Checksum mismatches are deliberately *not* fatal by default: the reader
//! logs a warning and returns the full data. [`Error::Checksum`] is only
//! produced under [`crate::corrfile::ChecksumPolicy::Reject`].

use std::fmt;
use std::path::PathBuf;

/// Errors produced by the contraction engine.
#[derive(Debug)]
pub enum Error {
    /// Unsupported basis tag, color count, or dimension. Fatal before I/O.
    Config(String),

    /// File I/O failure with path context (missing file, truncated read).
    /// Aborts the current run; no partial output is written.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Correlator file structure error: bad magic after one endian swap,
    /// or a redundant length field that disagrees with its primary. Fatal.
    Format(String),

    /// Stored checksum disagrees with the recomputed one. Raised only under
    /// the `Reject` policy; the default policy logs and continues.
    Checksum {
        /// Checksum words stored in the file (sum29, sum31).
        stored: (u32, u32),
        /// Checksum words recomputed from the payload.
        computed: (u32, u32),
    },

    /// Invalid caller-supplied parameters (zero momentum for a transverse
    /// projector, non-power-of-two FFT length, mismatched buffer sizes).
    InvalidInput(String),
}

/// Result type alias for coldSpring operations.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {msg}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Format(msg) => write!(f, "correlator format error: {msg}"),
            Self::Checksum { stored, computed } => write!(
                f,
                "checksum mismatch: stored ({:#010x}, {:#010x}) != computed ({:#010x}, {:#010x})",
                stored.0, stored.1, computed.0, computed.1
            ),
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Config(_) | Self::Format(_) | Self::Checksum { .. } | Self::InvalidInput(_) => {
                None
            }
        }
    }
}
