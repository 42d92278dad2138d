//! Streaming genome construction
//!
//! Derives a genome's chromosome layout from a FASTA-like character stream in
//! a single forward pass.
//!
//! # Sequence Format
//!
//! ```text
//! >chr1
//! ACGTACGT
//! ACGT
//! >chr2
//! AC
//! ```
//!
//! - A line matching `>chr...` or `>chromosome...` (case-insensitive) starts a
//!   chromosome block
//! - Every other line adds its length in characters to the open block
//! - Block order in the stream becomes chromosome priority order
//!
//! The scanner holds only the per-chromosome totals and one running counter;
//! the sequence itself is never buffered.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::{GenomeReadError, ReadResult};
use crate::core::genome::Genome;
use crate::core::progress::{ProgressEvent, ProgressListener};

/// Buffer size for file scanning (128KB).
const SCAN_BUFFER_SIZE: usize = 128 * 1024;

// Lines that start a chromosome block.
static CHR_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^>(chr|chromosome)").unwrap());

/// Builder around the scanning functions, carrying a genome name and an
/// optional set of progress observers.
pub struct GenomeReader<'a> {
    name: String,
    listeners: Vec<&'a dyn ProgressListener>,
}

impl<'a> GenomeReader<'a> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listeners: Vec::new(),
        }
    }

    /// Register a progress observer. Observers are notified synchronously,
    /// once per chromosome header encountered.
    pub fn with_listener(mut self, listener: &'a dyn ProgressListener) -> Self {
        self.listeners.push(listener);
        self
    }

    /// Scan a sequence file, decompressing gzip/bzip2 transparently.
    pub fn read_file(&self, path: &Path) -> ReadResult<Genome> {
        scan_genome_file(path, &self.name, &self.listeners)
    }

    /// Scan an already-open sequence source.
    pub fn read<R: BufRead>(&self, source: R) -> ReadResult<Genome> {
        scan_genome(&self.name, source, &self.listeners)
    }
}

/// Scan a sequence stream into a [`Genome`].
///
/// A chromosome's id is the first whitespace-delimited token of its header
/// line with the leading `>` stripped. The final open block is flushed at end
/// of stream, so a trailing header with no sequence lines still yields a
/// (zero-length) chromosome.
///
/// On an I/O failure mid-stream the blocks completed before the failure are
/// finalized into a partial genome carried by
/// [`GenomeReadError::Interrupted`]; the block that was still accumulating is
/// dropped because its length is not trustworthy.
pub fn scan_genome<R: BufRead>(
    name: &str,
    source: R,
    listeners: &[&dyn ProgressListener],
) -> ReadResult<Genome> {
    let mut completed: Vec<(String, u64)> = Vec::new();
    let mut open: Option<String> = None;
    let mut count: u64 = 0;

    for line_result in source.lines() {
        let line = match line_result {
            Ok(line) => line,
            Err(source) => {
                let partial = Genome::with_chromosomes(name, completed)?;
                return Err(GenomeReadError::Interrupted {
                    source,
                    partial: Box::new(partial),
                });
            }
        };
        if CHR_HEADER.is_match(&line) {
            if let Some(id) = open.take() {
                completed.push((id, count));
            }
            let tag = line.trim_end();
            notify(
                listeners,
                &ProgressEvent::indeterminate(format!("Prereading {}: {}", name, tag)),
            );
            open = Some(header_id(tag).to_string());
            count = 0;
        } else if open.is_some() {
            count += line.len() as u64;
        }
        // sequence data before the first header has no chromosome to count toward
    }
    if let Some(id) = open.take() {
        completed.push((id, count));
    }

    let genome = Genome::with_chromosomes(name, completed)?;
    log::debug!(
        "scanned genome {}: {} chromosomes",
        name,
        genome.chr_count()
    );
    Ok(genome)
}

/// Scan a sequence file, detecting gzip/bzip2 compression by extension or
/// magic bytes.
pub fn scan_genome_file(
    path: &Path,
    name: &str,
    listeners: &[&dyn ProgressListener],
) -> ReadResult<Genome> {
    if !path.exists() {
        return Err(GenomeReadError::FileNotFound(path.to_path_buf()));
    }
    let format = detect_compression(path)?;
    let file = File::open(path)?;
    match format {
        CompressionFormat::Gzip => {
            let decoder = flate2::read::GzDecoder::new(file);
            scan_genome(name, BufReader::with_capacity(SCAN_BUFFER_SIZE, decoder), listeners)
        }
        CompressionFormat::Bzip2 => {
            let decoder = bzip2::read::BzDecoder::new(file);
            scan_genome(name, BufReader::with_capacity(SCAN_BUFFER_SIZE, decoder), listeners)
        }
        CompressionFormat::Plain => {
            scan_genome(name, BufReader::with_capacity(SCAN_BUFFER_SIZE, file), listeners)
        }
    }
}

/// Scan an in-memory sequence (for testing).
pub fn scan_genome_bytes(name: &str, data: &[u8]) -> ReadResult<Genome> {
    scan_genome(name, BufReader::new(data), &[])
}

/// Compression format for sequence files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file extension and/or magic bytes.
pub fn detect_compression(path: &Path) -> std::io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        return Ok(CompressionFormat::Gzip);
    }
    // BZ2 magic: "BZh"
    if bytes_read >= 3 && magic[0] == 0x42 && magic[1] == 0x5a && magic[2] == 0x68 {
        return Ok(CompressionFormat::Bzip2);
    }
    Ok(CompressionFormat::Plain)
}

fn header_id(header: &str) -> &str {
    header[1..].split_whitespace().next().unwrap_or("")
}

fn notify(listeners: &[&dyn ProgressListener], event: &ProgressEvent) {
    for listener in listeners {
        listener.update(event);
    }
}
