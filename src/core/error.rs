//! Error types for the coordinate model and the streaming genome reader.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::genome::{Genome, GenomeId};

/// Errors from coordinate/region construction and location text parsing.
#[derive(Debug, Error)]
pub enum GenomeError {
    /// A chromosome was referenced that the genome does not contain.
    #[error("no chromosome with id \"{id}\" in genome {genome}")]
    UnknownChromosome { id: String, genome: String },

    /// A region was built from endpoints scoped to different genomes.
    #[error(
        "region endpoints do not both belong to genome {genome}: start is scoped to {start}, end to {end}"
    )]
    CrossGenomeReference {
        genome: String,
        start: GenomeId,
        end: GenomeId,
    },

    /// Location or region text did not match the expected grammar.
    #[error(transparent)]
    Parse(#[from] LocationParseError),

    /// Two chromosomes with the same id were supplied at construction.
    #[error("duplicate chromosome id \"{id}\" in genome {genome}")]
    DuplicateChromosome { id: String, genome: String },
}

/// A location/region grammar violation, carrying the offending text.
#[derive(Debug, Clone, Error)]
#[error("cannot parse \"{text}\": {reason}")]
pub struct LocationParseError {
    /// The text that failed to parse.
    pub text: String,
    /// What was wrong with it.
    pub reason: String,
}

impl LocationParseError {
    pub fn new(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from streaming genome construction.
///
/// An I/O failure mid-scan does not discard progress: every chromosome whose
/// block was completed before the failure is finalized into the `partial`
/// genome carried by the error.
#[derive(Debug, Error)]
pub enum GenomeReadError {
    /// Sequence file not found.
    #[error("sequence file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O failure before any scanning began.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O failure mid-scan; `partial` holds the chromosomes completed so far.
    #[error("I/O failure after {} complete chromosomes: {source}", .partial.chr_count())]
    Interrupted {
        #[source]
        source: std::io::Error,
        partial: Box<Genome>,
    },

    /// The scanned headers produced an invalid chromosome set.
    #[error(transparent)]
    Genome(#[from] GenomeError),
}

/// Result type alias for coordinate model operations.
pub type GenomeResult<T> = std::result::Result<T, GenomeError>;

/// Result type alias for streaming genome construction.
pub type ReadResult<T> = std::result::Result<T, GenomeReadError>;
