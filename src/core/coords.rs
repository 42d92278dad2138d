//! Coordinate and region value types.
//!
//! Both types are created through [`Genome`](crate::core::genome::Genome)
//! factory or parsing methods, which is what guarantees the chromosome they
//! reference belongs to the genome they are scoped to. Ordering is defined by
//! the owning genome's comparators, not by the types themselves.

use std::fmt;

use crate::core::genome::{Chromosome, GenomeId};

/// A point on one chromosome of one genome.
///
/// Renders as `<chromosome>:<base-index>` (for example `chr1:1000`), the same
/// grammar [`Genome::parse_location`](crate::core::genome::Genome::parse_location)
/// accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicCoordinate {
    chromosome: Chromosome,
    base_index: u64,
}

impl GenomicCoordinate {
    pub(crate) fn new(chromosome: Chromosome, base_index: u64) -> Self {
        Self {
            chromosome,
            base_index,
        }
    }

    /// The chromosome this coordinate lies on.
    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    /// 0-based offset on the chromosome.
    pub fn base_index(&self) -> u64 {
        self.base_index
    }

    /// Token of the genome this coordinate is scoped to.
    pub fn genome_id(&self) -> GenomeId {
        self.chromosome.genome_id()
    }
}

impl fmt::Display for GenomicCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chromosome, self.base_index)
    }
}

/// A pair of coordinates on one genome.
///
/// The endpoints are stored exactly as supplied; callers may pass them in
/// either order and the accessors never reorder them. Renders as
/// `<chromosome>:<start>-<end>` when both endpoints share a chromosome.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenomicRegion {
    start: GenomicCoordinate,
    end: GenomicCoordinate,
}

impl GenomicRegion {
    pub(crate) fn new(start: GenomicCoordinate, end: GenomicCoordinate) -> Self {
        Self { start, end }
    }

    /// The stored start endpoint, unmodified.
    pub fn start(&self) -> &GenomicCoordinate {
        &self.start
    }

    /// The stored end endpoint, unmodified.
    pub fn end(&self) -> &GenomicCoordinate {
        &self.end
    }

    /// Token of the genome this region is scoped to.
    pub fn genome_id(&self) -> GenomeId {
        self.start.genome_id()
    }
}

impl fmt::Display for GenomicRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.chromosome() == self.end.chromosome() {
            write!(
                f,
                "{}:{}-{}",
                self.start.chromosome(),
                self.start.base_index(),
                self.end.base_index()
            )
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
