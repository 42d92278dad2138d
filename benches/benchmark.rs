//! Performance benchmarks for genoscope
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use genoscope::core::reader::scan_genome_bytes;
use genoscope::formats::peak::read_peak;
use genoscope::Genome;

/// Build a synthetic FASTA-like text with `n` chromosomes.
fn synthetic_fasta(n: usize) -> Vec<u8> {
    let mut text = Vec::new();
    for i in 0..n {
        text.extend_from_slice(format!(">chr{}\n", i + 1).as_bytes());
        for _ in 0..50 {
            text.extend_from_slice(b"ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT\n");
        }
    }
    text
}

fn bench_genome_scan(c: &mut Criterion) {
    let text = synthetic_fasta(24);
    let mut group = c.benchmark_group("genome_scan");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("scan_24_chromosomes", |b| {
        b.iter(|| {
            let genome = scan_genome_bytes("bench", black_box(&text)).unwrap();
            black_box(genome)
        })
    });
    group.finish();
}

fn bench_location_sort(c: &mut Criterion) {
    let genome = Genome::with_chromosomes(
        "bench",
        (1..=24).map(|i| (format!("chr{}", i), 1_000_000u64)),
    )
    .unwrap();
    let locations: Vec<_> = (0..10_000u64)
        .map(|i| {
            let chr = genome.chr_at((i as usize * 7) % 24).unwrap().clone();
            genome.new_coordinate(&chr, (i * 31) % 1_000_000).unwrap()
        })
        .collect();

    c.bench_function("sort_10k_locations", |b| {
        b.iter(|| {
            let mut v = locations.clone();
            v.sort_by(genome.location_ascending());
            black_box(v)
        })
    });
}

fn bench_peak_parse(c: &mut Criterion) {
    let line = "chr1\t713984\t714547\tpeak_3\t339\t.\t8.38\t4.54\t2.51\t263";
    let mut group = c.benchmark_group("peak_parse");
    group.throughput(Throughput::Bytes(line.len() as u64));
    group.bench_function("narrow_peak_line", |b| {
        b.iter(|| {
            let record = read_peak("encode", black_box(line)).unwrap();
            black_box(record)
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_genome_scan,
    bench_location_sort,
    bench_peak_parse
);
criterion_main!(benches);
