//! Peak record codec
//!
//! Parses and serializes genomic "peak" records from line-oriented tabular
//! formats (BED/ENCODE narrowPeak style). Columns, in order:
//!
//! ```text
//! chrom  chromStart  chromEnd  name  score  strand  signalValue  pValue  qValue  peak
//! ```
//!
//! Only the first three are required. A line is first gated by a structural
//! pattern (a token starting with `chr`, two integers, free remainder), then
//! each field is parsed and bounds-checked independently. Format names the
//! codec does not implement are reported as [`PeakError::FormatNotSupported`],
//! distinctly from [`PeakError::MalformedRecord`] for well-formed format
//! requests over bad lines.

use std::io::{BufRead, Write};

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;
use thiserror::Error;

/// Format names accepted by [`read_peak`].
pub const READ_FORMATS: &[&str] = &["bed", "encode", "xml"];
/// Format names accepted by [`write_peak`].
pub const WRITE_FORMATS: &[&str] = &["bed", "encode", "xml"];

/// Lines processed per rayon batch in [`validate_peaks`].
const VALIDATE_BATCH: usize = 8192;

// Structural gate: chromosome-like token, two integers, free-form remainder.
static TABULAR_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^chr\S*\s+\d+\s+\d+(\s+.*)?$").unwrap());

/// Peak codec errors.
#[derive(Debug, Error)]
pub enum PeakError {
    /// The format name is not one this codec implements.
    #[error("format \"{0}\" is not supported by the peak codec")]
    FormatNotSupported(String),

    /// The line is structurally or semantically invalid.
    #[error("malformed peak record \"{line}\": {reason}")]
    MalformedRecord { line: String, reason: String },

    /// I/O error while streaming records.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn malformed(line: &str, reason: impl Into<String>) -> PeakError {
    PeakError::MalformedRecord {
        line: line.to_string(),
        reason: reason.into(),
    }
}

/// Strand annotation of a peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strand {
    Plus,
    Minus,
    /// `.` in tabular formats
    #[default]
    Unknown,
}

impl Strand {
    /// Parse a strand column token.
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            "." => Some(Strand::Unknown),
            _ => None,
        }
    }

    /// The tabular column token for this strand.
    pub fn symbol(&self) -> &'static str {
        match self {
            Strand::Plus => "+",
            Strand::Minus => "-",
            Strand::Unknown => ".",
        }
    }
}

/// Recognized peak formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakFormat {
    Bed,
    Encode,
    /// Declared but not implemented; reading or writing it fails loudly
    /// instead of silently doing nothing.
    Xml,
}

impl PeakFormat {
    /// Match a format name case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bed" => Some(PeakFormat::Bed),
            "encode" => Some(PeakFormat::Encode),
            "xml" => Some(PeakFormat::Xml),
            _ => None,
        }
    }
}

/// A named genomic interval with statistical annotation fields.
///
/// Absent optional columns map to `None`; on the wire, absence is `.` for the
/// name, `-1` for pValue/qValue/peak, per the ENCODE conventions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeakRecord {
    pub chrom: String,
    /// 0-based start.
    pub start: u64,
    /// 0-based end. Not constrained to be >= start.
    pub end: u64,
    pub name: Option<String>,
    /// Display score, 0..=1000.
    pub score: Option<u32>,
    pub strand: Strand,
    /// Signal enrichment measurement, >= -1.
    pub signal_value: Option<f64>,
    /// -log10 p-value; `-1` on the wire means absent.
    pub p_value: Option<f64>,
    /// -log10 q-value; `-1` on the wire means absent.
    pub q_value: Option<f64>,
    /// Point-source offset from `start`; `-1` on the wire means absent.
    pub point_source: Option<u64>,
}

/// Parse one line of the named format into a [`PeakRecord`].
///
/// `"bed"` and `"encode"` share the tabular column layout above. Any other
/// format name, including the declared-but-unimplemented `"xml"`, fails with
/// [`PeakError::FormatNotSupported`].
pub fn read_peak(format: &str, line: &str) -> Result<PeakRecord, PeakError> {
    tabular_format(format)?;
    parse_tabular(line)
}

/// Serialize a record in the named format, appending a newline.
///
/// Columns are emitted through the last present optional field, using the
/// absent-markers of the wire format (`.`, `-1`) for gaps, so that records
/// produced by [`read_peak`] re-read field-equal. A record with a score gap
/// below later fields normalizes that gap to `0`; the parser never produces
/// such a record.
pub fn write_peak<W: Write>(record: &PeakRecord, format: &str, sink: &mut W) -> Result<(), PeakError> {
    tabular_format(format)?;
    writeln!(sink, "{}", serialize_tabular(record))?;
    Ok(())
}

fn tabular_format(format: &str) -> Result<PeakFormat, PeakError> {
    match PeakFormat::parse(format) {
        Some(PeakFormat::Bed) => Ok(PeakFormat::Bed),
        Some(PeakFormat::Encode) => Ok(PeakFormat::Encode),
        // declared in READ_FORMATS/WRITE_FORMATS but not implemented yet
        Some(PeakFormat::Xml) => Err(PeakError::FormatNotSupported(format.to_string())),
        None => Err(PeakError::FormatNotSupported(format.to_string())),
    }
}

fn parse_tabular(line: &str) -> Result<PeakRecord, PeakError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if !TABULAR_LINE.is_match(line) {
        return Err(malformed(
            line,
            "line does not match <chrom> <start> <end> [...] layout",
        ));
    }
    let fields: Vec<&str> = line.split_whitespace().collect();
    // the structural pattern guarantees at least three fields
    let chrom = fields[0].to_string();
    let start = parse_offset(line, "start", fields[1])?;
    let end = parse_offset(line, "end", fields[2])?;
    let name = fields
        .get(3)
        .and_then(|&s| (s != ".").then(|| s.to_string()));
    let score = match fields.get(4) {
        Some(&s) => Some(parse_score(line, s)?),
        None => None,
    };
    let strand = match fields.get(5) {
        Some(&s) => Strand::from_symbol(s)
            .ok_or_else(|| malformed(line, format!("invalid strand \"{}\"", s)))?,
        None => Strand::Unknown,
    };
    let signal_value = match fields.get(6) {
        Some(&s) => Some(parse_measure(line, "signalValue", s)?),
        None => None,
    };
    let p_value = parse_sentinel_measure(line, "pValue", fields.get(7).copied())?;
    let q_value = parse_sentinel_measure(line, "qValue", fields.get(8).copied())?;
    let point_source = match fields.get(9) {
        Some(&s) => parse_point_source(line, s)?,
        None => None,
    };
    Ok(PeakRecord {
        chrom,
        start,
        end,
        name,
        score,
        strand,
        signal_value,
        p_value,
        q_value,
        point_source,
    })
}

fn serialize_tabular(record: &PeakRecord) -> String {
    let mut cols = vec![
        record.chrom.clone(),
        record.start.to_string(),
        record.end.to_string(),
    ];
    let optional = [
        record.name.clone().unwrap_or_else(|| ".".to_string()),
        record
            .score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "0".to_string()),
        record.strand.symbol().to_string(),
        record
            .signal_value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-1".to_string()),
        record
            .p_value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-1".to_string()),
        record
            .q_value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-1".to_string()),
        record
            .point_source
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-1".to_string()),
    ];
    let present = [
        record.name.is_some(),
        record.score.is_some(),
        record.strand != Strand::Unknown,
        record.signal_value.is_some(),
        record.p_value.is_some(),
        record.q_value.is_some(),
        record.point_source.is_some(),
    ];
    let keep = present.iter().rposition(|&p| p).map(|i| i + 1).unwrap_or(0);
    cols.extend(optional.into_iter().take(keep));
    cols.join("\t")
}

fn parse_offset(line: &str, field: &str, value: &str) -> Result<u64, PeakError> {
    value
        .parse::<u64>()
        .map_err(|_| malformed(line, format!("{} \"{}\" is not a valid offset", field, value)))
}

fn parse_score(line: &str, value: &str) -> Result<u32, PeakError> {
    let score = value
        .parse::<i64>()
        .map_err(|_| malformed(line, format!("score \"{}\" is not an integer", value)))?;
    if !(0..=1000).contains(&score) {
        return Err(malformed(line, format!("score {} outside 0..=1000", score)));
    }
    Ok(score as u32)
}

fn parse_measure(line: &str, field: &str, value: &str) -> Result<f64, PeakError> {
    let measure = value
        .parse::<f64>()
        .map_err(|_| malformed(line, format!("{} \"{}\" is not a number", field, value)))?;
    // `>= -1.0` also rejects NaN
    if !(measure >= -1.0) {
        return Err(malformed(line, format!("{} {} below -1", field, measure)));
    }
    Ok(measure)
}

fn parse_sentinel_measure(
    line: &str,
    field: &str,
    value: Option<&str>,
) -> Result<Option<f64>, PeakError> {
    match value {
        None => Ok(None),
        Some(s) => {
            let measure = parse_measure(line, field, s)?;
            if measure == -1.0 {
                Ok(None)
            } else {
                Ok(Some(measure))
            }
        }
    }
}

fn parse_point_source(line: &str, value: &str) -> Result<Option<u64>, PeakError> {
    let offset = value
        .parse::<i64>()
        .map_err(|_| malformed(line, format!("peak offset \"{}\" is not an integer", value)))?;
    match offset {
        -1 => Ok(None),
        o if o >= 0 => Ok(Some(o as u64)),
        o => Err(malformed(line, format!("peak offset {} below -1", o))),
    }
}

/// Records and per-line failures collected from one peak file.
#[derive(Debug)]
pub struct PeakFile {
    pub records: Vec<PeakRecord>,
    /// 1-based line number of each line that failed, with its error.
    pub failures: Vec<(usize, PeakError)>,
}

impl PeakFile {
    pub fn stats(&self) -> PeakStats {
        PeakStats {
            total: self.records.len() + self.failures.len(),
            parsed: self.records.len(),
            failed: self.failures.len(),
        }
    }
}

/// Counters over one file's data lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeakStats {
    pub total: usize,
    pub parsed: usize,
    pub failed: usize,
}

/// Read every data line of a peak stream, keeping malformed lines as typed
/// failures instead of aborting.
///
/// Comment lines and `track`/`browser` declarations are skipped. Fails up
/// front on an unsupported format, before the stream is touched.
pub fn read_peaks<R: BufRead>(format: &str, source: R) -> Result<PeakFile, PeakError> {
    tabular_format(format)?;
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for (idx, line_result) in source.lines().enumerate() {
        let line = line_result?;
        let trimmed = line.trim();
        if skip_line(trimmed) {
            continue;
        }
        match parse_tabular(trimmed) {
            Ok(record) => records.push(record),
            Err(error) => failures.push((idx + 1, error)),
        }
    }
    Ok(PeakFile { records, failures })
}

/// Count well-formed and malformed data lines without keeping records.
///
/// Lines are independent, so batches are validated in parallel; per-line
/// semantics are identical to [`read_peak`].
pub fn validate_peaks<R: BufRead>(format: &str, source: R) -> Result<PeakStats, PeakError> {
    tabular_format(format)?;
    let mut stats = PeakStats::default();
    let mut batch: Vec<String> = Vec::with_capacity(VALIDATE_BATCH);
    for line_result in source.lines() {
        let line = line_result?;
        let trimmed = line.trim();
        if skip_line(trimmed) {
            continue;
        }
        batch.push(trimmed.to_string());
        if batch.len() == VALIDATE_BATCH {
            flush_batch(&mut batch, &mut stats);
        }
    }
    flush_batch(&mut batch, &mut stats);
    log::debug!(
        "validated {} peak lines: {} parsed, {} failed",
        stats.total,
        stats.parsed,
        stats.failed
    );
    Ok(stats)
}

fn flush_batch(batch: &mut Vec<String>, stats: &mut PeakStats) {
    let failed = batch
        .par_iter()
        .filter(|line| parse_tabular(line).is_err())
        .count();
    stats.total += batch.len();
    stats.failed += failed;
    stats.parsed += batch.len() - failed;
    batch.clear();
}

/// Serialize records to a sink, one line each.
pub fn write_peaks<W: Write>(
    records: &[PeakRecord],
    format: &str,
    sink: &mut W,
) -> Result<(), PeakError> {
    tabular_format(format)?;
    for record in records {
        writeln!(sink, "{}", serialize_tabular(record))?;
    }
    Ok(())
}

fn skip_line(trimmed: &str) -> bool {
    trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("track")
        || trimmed.starts_with("browser")
}
