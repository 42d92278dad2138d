//! Genome model
//!
//! A [`Genome`] is an ordered sequence of chromosomes. The order of insertion
//! defines each chromosome's 1-based priority, which in turn drives every
//! comparator this module exposes. Coordinates and regions are only meaningful
//! relative to the genome that created them, so all construction goes through
//! the factory methods here and identity is scoped by a process-unique
//! [`GenomeId`].

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::core::coords::{GenomicCoordinate, GenomicRegion};
use crate::core::error::{GenomeError, GenomeResult, LocationParseError};

static NEXT_GENOME_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique token identifying a genome instance.
///
/// Chromosomes and coordinates carry this token instead of a reference to the
/// genome itself, which keeps them plain values while still making equality
/// genome-scoped: two genomes built from identical input are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenomeId(u64);

impl GenomeId {
    fn next() -> Self {
        GenomeId(NEXT_GENOME_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

impl fmt::Display for GenomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "genome#{}", self.0)
    }
}

/// A named, fixed-length segment of one genome.
///
/// Immutable once constructed. Equality includes the owning genome's id, so
/// chromosomes with the same name from different genomes never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chromosome {
    genome: GenomeId,
    id: String,
    length: u64,
}

impl Chromosome {
    pub(crate) fn new(genome: GenomeId, id: String, length: u64) -> Self {
        Self { genome, id, length }
    }

    /// Identifier of this chromosome, unique within its genome.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of bases on this chromosome.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Token of the genome this chromosome belongs to.
    pub fn genome_id(&self) -> GenomeId {
        self.genome
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// An ordered collection of chromosomes plus derived priority tables.
///
/// Immutable after construction and safe to share read-only across threads.
/// Built either directly from `(id, length)` pairs or by the streaming reader
/// in [`crate::core::reader`].
#[derive(Debug)]
pub struct Genome {
    id: GenomeId,
    name: String,
    chrs: Vec<Chromosome>,
    // chromosome id -> position in `chrs`; also the source of priorities
    // (position + 1) and O(1) next/prev navigation (position +/- 1)
    positions: HashMap<String, usize>,
}

impl Genome {
    /// Build a genome from `(chromosome id, length)` pairs.
    ///
    /// Insertion order becomes priority order. Duplicate ids are rejected.
    pub fn with_chromosomes<I>(name: impl Into<String>, chrs: I) -> GenomeResult<Self>
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        let name = name.into();
        let id = GenomeId::next();
        let iter = chrs.into_iter();
        let mut list = Vec::with_capacity(iter.size_hint().0);
        let mut positions = HashMap::new();
        for (chr_id, length) in iter {
            if positions.insert(chr_id.clone(), list.len()).is_some() {
                return Err(GenomeError::DuplicateChromosome {
                    id: chr_id,
                    genome: name,
                });
            }
            list.push(Chromosome::new(id, chr_id, length));
        }
        Ok(Self {
            id,
            name,
            chrs: list,
            positions,
        })
    }

    /// Name of this genome.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token identifying this genome instance.
    pub fn id(&self) -> GenomeId {
        self.id
    }

    /// Number of chromosomes.
    pub fn chr_count(&self) -> usize {
        self.chrs.len()
    }

    /// Chromosomes in priority order.
    pub fn chrs(&self) -> &[Chromosome] {
        &self.chrs
    }

    /// The chromosome with priority 1, if the genome is non-empty.
    pub fn first_chr(&self) -> Option<&Chromosome> {
        self.chrs.first()
    }

    /// The chromosome with the highest priority index.
    pub fn last_chr(&self) -> Option<&Chromosome> {
        self.chrs.last()
    }

    /// Whether `chr` belongs to this genome.
    pub fn has_chr(&self, chr: &Chromosome) -> bool {
        chr.genome == self.id && self.positions.contains_key(&chr.id)
    }

    /// Whether a chromosome with the given id exists in this genome.
    pub fn has_chr_id(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Look up a chromosome by id.
    pub fn chr(&self, id: &str) -> GenomeResult<&Chromosome> {
        self.positions
            .get(id)
            .map(|&pos| &self.chrs[pos])
            .ok_or_else(|| GenomeError::UnknownChromosome {
                id: id.to_string(),
                genome: self.name.clone(),
            })
    }

    /// The chromosome at a 0-based position in priority order.
    pub fn chr_at(&self, index: usize) -> Option<&Chromosome> {
        self.chrs.get(index)
    }

    /// 1-based priority of `chr`, or `None` if it is not part of this genome.
    pub fn priority(&self, chr: &Chromosome) -> Option<usize> {
        if chr.genome != self.id {
            return None;
        }
        self.positions.get(&chr.id).map(|&pos| pos + 1)
    }

    /// The chromosome following `chr` in priority order, `None` for the last.
    pub fn next_chr(&self, chr: &Chromosome) -> Option<&Chromosome> {
        let pos = self.position_checked(chr)?;
        self.chrs.get(pos + 1)
    }

    /// The chromosome preceding `chr` in priority order, `None` for the first.
    pub fn prev_chr(&self, chr: &Chromosome) -> Option<&Chromosome> {
        let pos = self.position_checked(chr)?;
        pos.checked_sub(1).map(|p| &self.chrs[p])
    }

    fn position_checked(&self, chr: &Chromosome) -> Option<usize> {
        if chr.genome != self.id {
            return None;
        }
        self.positions.get(&chr.id).copied()
    }

    // Position lookup for comparators, where the contract is that both
    // operands belong to this genome.
    fn position(&self, chr: &Chromosome) -> usize {
        match self.position_checked(chr) {
            Some(pos) => pos,
            None => panic!(
                "chromosome \"{}\" does not belong to genome {}",
                chr.id, self.name
            ),
        }
    }

    /// Create a coordinate on `chr` at `base_index`.
    pub fn new_coordinate(&self, chr: &Chromosome, base_index: u64) -> GenomeResult<GenomicCoordinate> {
        if !self.has_chr(chr) {
            return Err(GenomeError::UnknownChromosome {
                id: chr.id.clone(),
                genome: self.name.clone(),
            });
        }
        Ok(GenomicCoordinate::new(chr.clone(), base_index))
    }

    /// Create a coordinate by chromosome id.
    pub fn new_coordinate_by_id(&self, chr_id: &str, base_index: u64) -> GenomeResult<GenomicCoordinate> {
        let chr = self.chr(chr_id)?;
        Ok(GenomicCoordinate::new(chr.clone(), base_index))
    }

    /// Create a region from two coordinates of this genome.
    ///
    /// The endpoints are stored as supplied; `start <= end` is not required.
    pub fn new_region(
        &self,
        start: GenomicCoordinate,
        end: GenomicCoordinate,
    ) -> GenomeResult<GenomicRegion> {
        if start.genome_id() != self.id || end.genome_id() != self.id {
            return Err(GenomeError::CrossGenomeReference {
                genome: self.name.clone(),
                start: start.genome_id(),
                end: end.genome_id(),
            });
        }
        Ok(GenomicRegion::new(start, end))
    }

    /// Parse coordinate text of the form `<chromosome>:<base-index>`.
    pub fn parse_location(&self, text: &str) -> GenomeResult<GenomicCoordinate> {
        let trimmed = text.trim();
        let (chr_id, base_str) = trimmed.split_once(':').ok_or_else(|| {
            LocationParseError::new(text, "expected <chromosome>:<base-index>")
        })?;
        if chr_id.is_empty() {
            return Err(LocationParseError::new(text, "missing chromosome id").into());
        }
        let base_index = parse_base_index(text, base_str)?;
        self.new_coordinate_by_id(chr_id, base_index)
    }

    /// Parse region text of the form `<chromosome>:<start>-<end>`.
    pub fn parse_region(&self, text: &str) -> GenomeResult<GenomicRegion> {
        let trimmed = text.trim();
        let (chr_id, range) = trimmed.split_once(':').ok_or_else(|| {
            LocationParseError::new(text, "expected <chromosome>:<start>-<end>")
        })?;
        if chr_id.is_empty() {
            return Err(LocationParseError::new(text, "missing chromosome id").into());
        }
        let (start_str, end_str) = range.split_once('-').ok_or_else(|| {
            LocationParseError::new(text, "expected <chromosome>:<start>-<end>")
        })?;
        let start = self.new_coordinate_by_id(chr_id, parse_base_index(text, start_str)?)?;
        let end = self.new_coordinate_by_id(chr_id, parse_base_index(text, end_str)?)?;
        self.new_region(start, end)
    }

    /// Compare chromosomes by increasing priority.
    ///
    /// # Panics
    ///
    /// Panics if either chromosome does not belong to this genome; comparing
    /// across genomes has no defined order.
    pub fn cmp_chr_ascending(&self, a: &Chromosome, b: &Chromosome) -> Ordering {
        self.position(a).cmp(&self.position(b))
    }

    /// Compare chromosomes by decreasing priority.
    ///
    /// # Panics
    ///
    /// Panics if either chromosome does not belong to this genome.
    pub fn cmp_chr_descending(&self, a: &Chromosome, b: &Chromosome) -> Ordering {
        self.position(b).cmp(&self.position(a))
    }

    /// Compare coordinates by chromosome priority, then base index.
    ///
    /// # Panics
    ///
    /// Panics if the operands lie on different chromosomes and either does not
    /// belong to this genome.
    pub fn cmp_location_ascending(&self, a: &GenomicCoordinate, b: &GenomicCoordinate) -> Ordering {
        if a.chromosome() == b.chromosome() {
            a.base_index().cmp(&b.base_index())
        } else {
            self.cmp_chr_ascending(a.chromosome(), b.chromosome())
        }
    }

    /// Compare coordinates in fully reversed order.
    ///
    /// Both tiers reverse independently: on one chromosome the base-index
    /// comparison inverts, across chromosomes the priority comparison inverts.
    ///
    /// # Panics
    ///
    /// Panics if the operands lie on different chromosomes and either does not
    /// belong to this genome.
    pub fn cmp_location_descending(&self, a: &GenomicCoordinate, b: &GenomicCoordinate) -> Ordering {
        if a.chromosome() == b.chromosome() {
            b.base_index().cmp(&a.base_index())
        } else {
            self.cmp_chr_descending(a.chromosome(), b.chromosome())
        }
    }

    /// Compare regions by ascending start, ties broken by ascending end.
    pub fn cmp_start_ascending(&self, a: &GenomicRegion, b: &GenomicRegion) -> Ordering {
        if a.start() == b.start() {
            self.cmp_location_ascending(a.end(), b.end())
        } else {
            self.cmp_location_ascending(a.start(), b.start())
        }
    }

    /// Compare regions by start with descending tie-break.
    ///
    /// The primary key stays in ascending start order; only the end tie-break
    /// reverses. Downstream sort stability depends on this exact shape, so it
    /// is part of the contract rather than a mirror of
    /// [`cmp_start_ascending`](Self::cmp_start_ascending).
    pub fn cmp_start_descending(&self, a: &GenomicRegion, b: &GenomicRegion) -> Ordering {
        if a.start() == b.start() {
            self.cmp_location_descending(a.end(), b.end())
        } else {
            self.cmp_location_ascending(a.start(), b.start())
        }
    }

    /// Compare regions by ascending end, ties broken by ascending start.
    pub fn cmp_end_ascending(&self, a: &GenomicRegion, b: &GenomicRegion) -> Ordering {
        if a.end() == b.end() {
            self.cmp_location_ascending(a.start(), b.start())
        } else {
            self.cmp_location_ascending(a.end(), b.end())
        }
    }

    /// Compare regions by descending end, ties broken by descending start.
    pub fn cmp_end_descending(&self, a: &GenomicRegion, b: &GenomicRegion) -> Ordering {
        if a.end() == b.end() {
            self.cmp_location_descending(a.start(), b.start())
        } else {
            self.cmp_location_descending(a.end(), b.end())
        }
    }

    /// Chromosome comparator closure, usable with `sort_by`.
    pub fn chr_ascending(&self) -> impl Fn(&Chromosome, &Chromosome) -> Ordering + '_ {
        move |a, b| self.cmp_chr_ascending(a, b)
    }

    /// Reversed chromosome comparator closure.
    pub fn chr_descending(&self) -> impl Fn(&Chromosome, &Chromosome) -> Ordering + '_ {
        move |a, b| self.cmp_chr_descending(a, b)
    }

    /// Coordinate comparator closure, ascending.
    pub fn location_ascending(
        &self,
    ) -> impl Fn(&GenomicCoordinate, &GenomicCoordinate) -> Ordering + '_ {
        move |a, b| self.cmp_location_ascending(a, b)
    }

    /// Coordinate comparator closure, descending.
    pub fn location_descending(
        &self,
    ) -> impl Fn(&GenomicCoordinate, &GenomicCoordinate) -> Ordering + '_ {
        move |a, b| self.cmp_location_descending(a, b)
    }

    /// Region comparator closure keyed on start, ascending.
    pub fn start_ascending(&self) -> impl Fn(&GenomicRegion, &GenomicRegion) -> Ordering + '_ {
        move |a, b| self.cmp_start_ascending(a, b)
    }

    /// Region comparator closure keyed on start with descending tie-break.
    pub fn start_descending(&self) -> impl Fn(&GenomicRegion, &GenomicRegion) -> Ordering + '_ {
        move |a, b| self.cmp_start_descending(a, b)
    }

    /// Region comparator closure keyed on end, ascending.
    pub fn end_ascending(&self) -> impl Fn(&GenomicRegion, &GenomicRegion) -> Ordering + '_ {
        move |a, b| self.cmp_end_ascending(a, b)
    }

    /// Region comparator closure keyed on end, descending.
    pub fn end_descending(&self) -> impl Fn(&GenomicRegion, &GenomicRegion) -> Ordering + '_ {
        move |a, b| self.cmp_end_descending(a, b)
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn parse_base_index(text: &str, field: &str) -> Result<u64, LocationParseError> {
    field.trim().parse::<u64>().map_err(|_| {
        LocationParseError::new(
            text,
            format!("base index \"{}\" is not a non-negative integer", field.trim()),
        )
    })
}
