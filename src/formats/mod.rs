//! File format codecs
//!
//! Line-oriented record codecs layered on top of the core coordinate model.

pub mod peak;

pub use peak::{
    read_peak, read_peaks, validate_peaks, write_peak, write_peaks, PeakError, PeakFile,
    PeakFormat, PeakRecord, PeakStats, Strand,
};
