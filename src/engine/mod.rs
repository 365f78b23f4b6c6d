//! Core remux engine module

pub mod interleave;
pub mod progress;
pub mod remux;

pub use progress::ProgressReporter;
pub use remux::{remux, RemuxWriter};

/// Output container format
pub const OUTPUT_FORMAT: &str = "matroska";

/// Knobs for one remux run
#[derive(Debug, Clone, Default)]
pub struct RemuxOptions {
    /// Seconds added to every packet of the secondary source
    pub subtitle_delay: f64,
}

/// Counters collected while copying packets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemuxStats {
    /// Packets accepted by the output
    pub written: u64,
    /// Packets of unselected streams
    pub skipped: u64,
    /// Packets the output rejected
    pub rejected: u64,
    /// Packets that had no dts and were given 0
    pub dts_patched: u64,
    /// Secondary packets appended after the primary ran out
    pub unanchored: u64,
}
