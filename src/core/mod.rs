//! Core coordinate model
//!
//! This module contains the genome/chromosome model, genome-scoped coordinate
//! and region types, the comparator families, and the streaming sequence
//! scanner.

mod coords;
mod error;
mod genome;
pub mod progress;
pub mod reader;

pub use coords::{GenomicCoordinate, GenomicRegion};
pub use error::{GenomeError, GenomeReadError, GenomeResult, LocationParseError, ReadResult};
pub use genome::{Chromosome, Genome, GenomeId};
pub use progress::{ProgressEvent, ProgressListener};
pub use reader::{
    detect_compression, scan_genome, scan_genome_bytes, scan_genome_file, CompressionFormat,
    GenomeReader,
};
