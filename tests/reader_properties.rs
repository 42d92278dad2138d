//! Property and file-based tests for the streaming genome scanner.

use genoscope::core::reader::{detect_compression, scan_genome_bytes, scan_genome_file, CompressionFormat};
use proptest::prelude::*;
use std::io::Write;

/// Generate chromosome blocks: (id, sequence lines).
fn arb_blocks() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    let line = proptest::collection::vec(prop_oneof![Just('A'), Just('C'), Just('G'), Just('T')], 0..80)
        .prop_map(|chars| chars.into_iter().collect::<String>());
    let block = proptest::collection::vec(line, 0..5);
    (1usize..=8, proptest::collection::vec(block, 8)).prop_map(|(n, blocks)| {
        (0..n)
            .map(|i| (format!("chr{}", i + 1), blocks[i].clone()))
            .collect()
    })
}

fn render_fasta(blocks: &[(String, Vec<String>)]) -> String {
    let mut text = String::new();
    for (id, lines) in blocks {
        text.push('>');
        text.push_str(id);
        text.push('\n');
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
    }
    text
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Scanning recovers every block in order, with each chromosome's length
    /// equal to the total characters of its sequence lines.
    #[test]
    fn prop_scan_recovers_layout(blocks in arb_blocks()) {
        let text = render_fasta(&blocks);
        let genome = scan_genome_bytes("g", text.as_bytes()).unwrap();

        prop_assert_eq!(genome.chr_count(), blocks.len());
        for (i, (id, lines)) in blocks.iter().enumerate() {
            let chr = genome.chr_at(i).unwrap();
            prop_assert_eq!(chr.id(), id.as_str());
            let expected: u64 = lines.iter().map(|l| l.len() as u64).sum();
            prop_assert_eq!(chr.length(), expected);
            prop_assert_eq!(genome.priority(chr), Some(i + 1));
        }
    }

    /// The scanner is insensitive to trailing newline presence.
    #[test]
    fn prop_trailing_newline_irrelevant(blocks in arb_blocks()) {
        let text = render_fasta(&blocks);
        let with = scan_genome_bytes("g", text.as_bytes()).unwrap();
        let without = scan_genome_bytes("g", text.trim_end().as_bytes()).unwrap();

        prop_assert_eq!(with.chr_count(), without.chr_count());
        for (a, b) in with.chrs().iter().zip(without.chrs()) {
            prop_assert_eq!(a.id(), b.id());
            prop_assert_eq!(a.length(), b.length());
        }
    }
}

#[test]
fn test_gzip_and_plain_scans_are_equivalent() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let text = b">chr1\nACGT\nACGT\n>chr2\nAC\n";

    let dir = tempfile::tempdir().unwrap();
    let plain_path = dir.path().join("genome.fa");
    std::fs::write(&plain_path, text).unwrap();

    let gz_path = dir.path().join("genome.fa.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text).unwrap();
    std::fs::write(&gz_path, encoder.finish().unwrap()).unwrap();

    assert_eq!(detect_compression(&plain_path).unwrap(), CompressionFormat::Plain);
    assert_eq!(detect_compression(&gz_path).unwrap(), CompressionFormat::Gzip);

    let plain = scan_genome_file(&plain_path, "hg", &[]).unwrap();
    let zipped = scan_genome_file(&gz_path, "hg", &[]).unwrap();

    assert_eq!(plain.chr_count(), zipped.chr_count());
    for (a, b) in plain.chrs().iter().zip(zipped.chrs()) {
        assert_eq!(a.id(), b.id());
        assert_eq!(a.length(), b.length());
    }
}

#[test]
fn test_bzip2_scan_matches_plain() {
    use bzip2::write::BzEncoder;
    use bzip2::Compression;

    let text = b">chr1\nACGTACGT\n>chr2\nACGT\n>chr3\n";

    let dir = tempfile::tempdir().unwrap();
    let bz2_path = dir.path().join("genome.fa.bz2");
    let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text).unwrap();
    std::fs::write(&bz2_path, encoder.finish().unwrap()).unwrap();

    let genome = scan_genome_file(&bz2_path, "hg", &[]).unwrap();
    assert_eq!(genome.chr_count(), 3);
    assert_eq!(genome.chr("chr1").unwrap().length(), 8);
    assert_eq!(genome.chr("chr2").unwrap().length(), 4);
    assert_eq!(genome.chr("chr3").unwrap().length(), 0);
}

#[test]
fn test_gzip_detected_by_magic_without_extension() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let text = b">chr1\nACGT\n";
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("genome_no_ext");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text).unwrap();
    std::fs::write(&path, encoder.finish().unwrap()).unwrap();

    assert_eq!(detect_compression(&path).unwrap(), CompressionFormat::Gzip);
    let genome = scan_genome_file(&path, "hg", &[]).unwrap();
    assert_eq!(genome.chr("chr1").unwrap().length(), 4);
}

#[test]
fn test_missing_file_reported() {
    let err = scan_genome_file(std::path::Path::new("/no/such/genome.fa"), "hg", &[]).unwrap_err();
    assert!(matches!(
        err,
        genoscope::GenomeReadError::FileNotFound(_)
    ));
}
