//! Genoscope - genome coordinate model and peak record toolkit
//!
//! Models a reference genome as an ordered sequence of chromosomes, with
//! coordinate and interval types scoped to the genome instance that created
//! them, four families of total orderings, a streaming scanner that derives
//! chromosome layout from a FASTA-like file without loading it, and a codec
//! for BED/ENCODE-style peak records.
//!
//! # Example
//!
//! ```ignore
//! use genoscope::{scan_genome_file, formats::peak};
//!
//! // Derive the chromosome layout from a sequence file
//! let genome = scan_genome_file("hg19.fa".as_ref(), "hg19", &[])?;
//!
//! // Coordinates and regions are scoped to that genome
//! let tss = genome.parse_location("chr1:11873")?;
//! let promoter = genome.parse_region("chr1:10873-11873")?;
//!
//! // Sort regions with the genome's comparators
//! let mut regions = vec![promoter];
//! regions.sort_by(genome.start_ascending());
//!
//! // Parse peak records against the same chromosome namespace
//! let peak = peak::read_peak("encode", "chr1\t100\t200\tpeak1\t500\t+")?;
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    scan_genome, scan_genome_bytes, scan_genome_file, Chromosome, CompressionFormat, Genome,
    GenomeError, GenomeId, GenomeReadError, GenomeReader, GenomeResult, GenomicCoordinate,
    GenomicRegion, LocationParseError, ProgressEvent, ProgressListener, ReadResult,
};
pub use formats::peak::{PeakError, PeakFormat, PeakRecord, PeakStats, Strand};
