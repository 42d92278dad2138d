//! Genoscope CLI entry point
//!
//! Scans sequence files into chromosome tables, validates peak files, and
//! resolves coordinate text against a scanned genome.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use genoscope::core::progress::{ProgressEvent, ProgressListener};
use genoscope::core::reader::GenomeReader;
use genoscope::formats::peak;
use genoscope::Genome;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "genoscope")]
#[command(about = "Genome coordinate model and peak record toolkit")]
#[command(version)]
struct Cli {
    /// Print chromosome headers to stderr as they are scanned
    #[arg(long, global = true)]
    progress: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a sequence file and print its chromosome table
    Scan {
        /// FASTA-like sequence file (plain, .gz or .bz2)
        input: PathBuf,
        /// Genome name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
    },
    /// Validate a peak file and report statistics
    Peaks {
        /// Input peak file
        input: PathBuf,
        /// Record format (bed, encode)
        #[arg(long, default_value = "bed")]
        format: String,
        /// Write normalized records to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Resolve coordinate or region text against a scanned genome
    Locate {
        /// FASTA-like sequence file defining the genome
        input: PathBuf,
        /// Location text: `chr1:1000` or `chr1:1000-2000`
        text: String,
        /// Genome name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
    },
}

struct StderrProgress;

impl ProgressListener for StderrProgress {
    fn update(&self, event: &ProgressEvent) {
        eprintln!("{}", event.message);
    }
}

fn genome_name(name: Option<String>, input: &Path) -> String {
    name.unwrap_or_else(|| {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "genome".to_string())
    })
}

fn scan(input: &Path, name: &str, progress: bool) -> anyhow::Result<Genome> {
    let listener = StderrProgress;
    let mut genome_reader = GenomeReader::new(name);
    if progress {
        genome_reader = genome_reader.with_listener(&listener);
    }
    genome_reader
        .read_file(input)
        .with_context(|| format!("failed to scan sequence file {:?}", input))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    match cli.command {
        Commands::Scan { input, name } => {
            let name = genome_name(name, &input);
            eprintln!("Scanning sequence file: {:?}", input);
            let genome = scan(&input, &name, cli.progress)?;

            println!("# genome {}: {} chromosomes", genome.name(), genome.chr_count());
            for (index, chr) in genome.chrs().iter().enumerate() {
                println!("{}\t{}\t{}", index + 1, chr.id(), chr.length());
            }
            eprintln!("Scanned in {:.2}s", start.elapsed().as_secs_f64());
        }

        Commands::Peaks {
            input,
            format,
            output,
        } => {
            let file =
                File::open(&input).with_context(|| format!("failed to open peak file {:?}", input))?;
            let parsed = peak::read_peaks(&format, BufReader::new(file))?;
            let stats = parsed.stats();

            for (line_number, error) in &parsed.failures {
                eprintln!("line {}: {}", line_number, error);
            }
            if let Some(out_path) = output {
                let out = File::create(&out_path)
                    .with_context(|| format!("failed to create output file {:?}", out_path))?;
                let mut writer = BufWriter::new(out);
                peak::write_peaks(&parsed.records, &format, &mut writer)?;
                writer.flush()?;
                eprintln!("Wrote {} records to {:?}", parsed.records.len(), out_path);
            }

            eprintln!("\n=== Peak Statistics ===");
            eprintln!("Total records:   {}", stats.total);
            eprintln!("Parsed:          {}", stats.parsed);
            eprintln!("Malformed:       {}", stats.failed);
            eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());

            if stats.failed > 0 {
                bail!("{} malformed records in {:?}", stats.failed, input);
            }
        }

        Commands::Locate { input, text, name } => {
            let name = genome_name(name, &input);
            let genome = scan(&input, &name, cli.progress)?;

            // region text has a '-' after the chromosome separator
            let is_region = text
                .split_once(':')
                .map(|(_, rest)| rest.contains('-'))
                .unwrap_or(false);
            if is_region {
                let region = genome.parse_region(&text)?;
                let chr = region.start().chromosome();
                println!("{}", region);
                println!("chromosome: {} ({} bases)", chr.id(), chr.length());
                if let Some(priority) = genome.priority(chr) {
                    println!("priority: {} of {}", priority, genome.chr_count());
                }
            } else {
                let location = genome.parse_location(&text)?;
                let chr = location.chromosome();
                println!("{}", location);
                println!("chromosome: {} ({} bases)", chr.id(), chr.length());
                if let Some(priority) = genome.priority(chr) {
                    println!("priority: {} of {}", priority, genome.chr_count());
                }
            }
        }
    }

    Ok(())
}
