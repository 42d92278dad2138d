//! Property-based tests for the peak record codec.

use genoscope::formats::peak::{read_peak, write_peak, PeakError, Strand};
use proptest::prelude::*;

/// Generate a valid chromosome name
fn arb_chrom_name() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u8..=22).prop_map(|n| format!("chr{}", n)),
        Just("chrX".to_string()),
        Just("chrY".to_string()),
    ]
}

/// Generate a valid peak name field
fn arb_peak_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_]{0,20}".prop_map(|s| s)
}

/// Generate a strand column token
fn arb_strand_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("+".to_string()),
        Just("-".to_string()),
        Just(".".to_string()),
    ]
}

/// Generate a pValue/qValue column token, including the absent sentinel
fn arb_sentinel_measure() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("-1".to_string()),
        (0u32..100_000).prop_map(|n| format!("{}.{}", n / 100, n % 100)),
    ]
}

/// Generate a full ten-column narrowPeak-style line
fn arb_narrow_peak_line() -> impl Strategy<Value = String> {
    (
        arb_chrom_name(),
        0u64..100_000_000,
        0u64..100_000_000,
        arb_peak_name(),
        0u32..=1000,
        arb_strand_token(),
        (-100i32..100_000).prop_map(|n| f64::from(n) / 100.0),
        arb_sentinel_measure(),
        arb_sentinel_measure(),
        prop_oneof![Just(-1i64), 0i64..10_000],
    )
        .prop_map(
            |(chrom, start, end, name, score, strand, signal, p, q, point)| {
                format!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    chrom, start, end, name, score, strand, signal, p, q, point
                )
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every generated well-formed line parses, with coordinate and score
    /// fields landing in the right places.
    #[test]
    fn prop_well_formed_lines_parse(line in arb_narrow_peak_line()) {
        let record = read_peak("encode", &line).unwrap();
        let fields: Vec<&str> = line.split('\t').collect();

        prop_assert_eq!(record.chrom.as_str(), fields[0]);
        prop_assert_eq!(record.start.to_string(), fields[1]);
        prop_assert_eq!(record.end.to_string(), fields[2]);
        prop_assert_eq!(record.name.as_deref(), Some(fields[3]));
        prop_assert_eq!(record.score.unwrap().to_string(), fields[4]);
        prop_assert_eq!(record.strand, Strand::from_symbol(fields[5]).unwrap());
        // sentinel columns become absent fields
        prop_assert_eq!(record.p_value.is_none(), fields[7] == "-1");
        prop_assert_eq!(record.q_value.is_none(), fields[8] == "-1");
        prop_assert_eq!(record.point_source.is_none(), fields[9] == "-1");
    }

    /// Serializing a parsed record and re-parsing it yields a field-equal
    /// record, for both accepted tabular formats.
    #[test]
    fn prop_serialize_reparse_idempotent(line in arb_narrow_peak_line()) {
        for format in ["bed", "encode"] {
            let record = read_peak(format, &line).unwrap();
            let mut out = Vec::new();
            write_peak(&record, format, &mut out).unwrap();
            let rewritten = String::from_utf8(out).unwrap();
            let reread = read_peak(format, rewritten.trim_end()).unwrap();
            prop_assert_eq!(&record, &reread);

            // and a second round is textually stable
            let mut out2 = Vec::new();
            write_peak(&reread, format, &mut out2).unwrap();
            prop_assert_eq!(rewritten, String::from_utf8(out2).unwrap());
        }
    }

    /// Scores above the display ceiling are malformed, whatever the rest of
    /// the line looks like.
    #[test]
    fn prop_score_ceiling(
        chrom in arb_chrom_name(),
        start in 0u64..1_000_000,
        end in 0u64..1_000_000,
        score in 1001u32..100_000,
    ) {
        let line = format!("{}\t{}\t{}\tp\t{}", chrom, start, end, score);
        let err = read_peak("bed", &line).unwrap_err();
        prop_assert!(matches!(err, PeakError::MalformedRecord { .. }));
    }

    /// Lines whose first token does not look like a chromosome never parse.
    #[test]
    fn prop_non_chromosome_lines_rejected(
        token in "[a-bd-z][a-z0-9]{0,8}",
        start in 0u64..1_000_000,
        end in 0u64..1_000_000,
    ) {
        let line = format!("{}\t{}\t{}", token, start, end);
        let err = read_peak("bed", &line).unwrap_err();
        prop_assert!(matches!(err, PeakError::MalformedRecord { .. }));
    }

    /// Unrecognized format names are rejected before the line is examined.
    #[test]
    fn prop_unknown_format_rejected(line in arb_narrow_peak_line()) {
        for format in ["gff", "vcf", "wig", ""] {
            let err = read_peak(format, &line).unwrap_err();
            prop_assert!(matches!(err, PeakError::FormatNotSupported(_)));
        }
    }
}
