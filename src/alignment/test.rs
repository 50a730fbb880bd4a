use super::*;
use crate::{
    data::{
        err::GetCode,
        mappings::{DNA_RANKS, PROTEIN_RANKS},
    },
    execution::{IndexedPair, align_pairwise},
};

fn dna(s: &[u8]) -> Vec<u8> {
    DNA_RANKS.encode(s)
}

fn render(sequence: &GappedSequence) -> String {
    String::from_utf8(sequence.to_bytes(|r| DNA_RANKS.to_byte(r).unwrap_or(b'?'), b'-')).unwrap()
}

fn align_one(first: &[u8], second: &[u8], config: AlignConfig) -> AlignmentResult<AllOutputs> {
    let (first, second) = (dna(first), dna(second));
    align_pairwise([(&first, &second)], config).unwrap().next().unwrap()
}

fn affine() -> AlignConfig {
    AlignConfig::global()
        .scoring(ScoringScheme::match_mismatch(4, -5))
        .gap_cost(GapCost::new(-10, -1))
}

#[test]
fn edit_distance_with_alignment() {
    let result = align_one(b"ACGTGATG", b"AGTGATACT", AlignConfig::edit_distance());
    assert_eq!(result.score(), -4);
    assert_eq!(result.begin_positions(), (0, 0));
    assert_eq!(result.end_positions(), (8, 9));
    assert_eq!(render(&result.alignment().first), "ACGTGATG--");
    assert_eq!(render(&result.alignment().second), "A-GTGATACT");
    assert_eq!((result.sequence1_id(), result.sequence2_id()), (0, 0));
}

#[test]
fn global_affine() {
    let result = align_one(b"ACGTACGT", b"ACGAACGTTT", affine());
    assert_eq!(result.score(), 11);
    assert_eq!(result.end_positions(), (8, 10));
    assert_eq!(render(&result.alignment().first), "ACGTACGT--");
    assert_eq!(render(&result.alignment().second), "ACGAACGTTT");
}

#[test]
fn local_affine() {
    let result = align_one(b"GGACGTACGTTT", b"CCACGTACGAA", affine().method(Method::Local));
    assert_eq!(result.score(), 28);
    assert_eq!(result.begin_positions(), (2, 2));
    assert_eq!(result.end_positions(), (9, 9));
    assert_eq!(render(&result.alignment().first), "ACGTACG");
    assert_eq!(render(&result.alignment().second), "ACGTACG");
}

#[test]
fn sequence1_overhangs_for_free() {
    let config = affine().free_end_gaps(FreeEndGaps::SEQUENCE1_FREE);
    let result = align_one(b"CCCGATTACACC", b"GATTACA", config.clone());
    assert_eq!(result.score(), 28);
    assert_eq!(result.begin_positions(), (3, 0));
    assert_eq!(result.end_positions(), (10, 7));

    let result = align_one(b"CCCGATTCACC", b"GATTACA", config);
    assert_eq!(result.score(), 13);
    assert_eq!(result.begin_positions(), (3, 0));
    assert_eq!(result.end_positions(), (9, 7));
    assert_eq!(render(&result.alignment().first), "GATT-CA");
    assert_eq!(render(&result.alignment().second), "GATTACA");
}

#[test]
fn overlap_alignment() {
    let result = align_one(b"ACGTACGTAA", b"AAACGTTACG", affine().free_end_gaps(FreeEndGaps::ALL));
    assert_eq!(result.score(), 17);
    assert_eq!(result.begin_positions(), (0, 2));
    assert_eq!(result.end_positions(), (7, 10));
    assert_eq!(render(&result.alignment().first), "ACGT-ACG");
    assert_eq!(render(&result.alignment().second), "ACGTTACG");
}

#[test]
fn empty_sequences() {
    let result = align_one(b"", b"ACG", affine());
    assert_eq!(result.score(), -13);
    assert_eq!(result.end_positions(), (0, 3));
    assert_eq!(render(&result.alignment().first), "---");

    let result = align_one(b"", b"", affine());
    assert_eq!(result.score(), 0);
    assert!(result.alignment().is_empty());

    let result = align_one(b"ACG", b"", affine().method(Method::Local));
    assert_eq!(result.score(), 0);
    assert!(result.alignment().is_empty());
}

#[test]
fn alignment_rescores_to_the_score() {
    let scheme = ScoringScheme::match_mismatch(3, -4);
    let gap = GapCost::new(-6, -2);
    let config = AlignConfig::global().scoring(scheme.clone()).gap_cost(gap);
    let result = align_one(b"TTGACCATGCAAGT", b"TGACCTTATGCGT", config);
    assert_eq!(result.alignment().rescore(&scheme, gap), result.score());
}

#[test]
fn protein_alignment_with_blosum62() {
    let scheme = ScoringScheme::Matrix(SubstitutionMatrix::blosum(Blosum::B62));
    let gap = GapCost::new(-10, -1);
    let (first, second) = (PROTEIN_RANKS.encode(b"HEAGAWGHEE"), PROTEIN_RANKS.encode(b"PAWHEAE"));
    let pairs = [(&first, &second)];
    let config = AlignConfig::global().scoring(scheme.clone()).gap_cost(gap);

    let global = align_pairwise(pairs, config.clone()).unwrap().next().unwrap();
    assert_eq!(global.score(), 2);
    assert_eq!(global.alignment().rescore(&scheme, gap), 2);

    let local = align_pairwise(pairs, config.clone().method(Method::Local)).unwrap().next().unwrap();
    assert_eq!(local.score(), 17);
    // Three cells tie, the last in column order wins
    assert_eq!(local.end_positions(), (10, 7));
    assert_eq!(local.alignment().rescore(&scheme, gap), 17);

    let bytes = config.method(Method::Local).score_type(ScoreType::I8).vectorised();
    let vectorised = align_pairwise(pairs, bytes).unwrap().next().unwrap();
    assert_eq!(vectorised.score(), 17);
    assert_eq!(vectorised.end_positions(), (10, 7));
}

#[test]
fn error_bound_reports_misses() {
    let (text, pattern) = (dna(b"AACCGGTAAACCGG"), dna(b"ACGTACGTA"));
    let semi_global = AlignConfig::edit_distance()
        .free_end_gaps(FreeEndGaps::SEQUENCE1_FREE)
        .outputs::<ScoreOnly>();

    let found = align_pairwise([(&text, &pattern)], semi_global.clone().max_errors(4)).unwrap().next().unwrap();
    assert!(found.is_hit());
    assert_eq!(found.score(), -4);

    let missed = align_pairwise([(&text, &pattern)], semi_global.clone().max_errors(3)).unwrap().next().unwrap();
    assert!(!missed.is_hit());
    assert_eq!(missed.score(), i64::MIN);

    let unbounded = align_pairwise([(&text, &pattern)], semi_global).unwrap().next().unwrap();
    assert!(unbounded.is_hit());
    assert_eq!(unbounded.score(), -4);
}

#[test]
fn error_bound_with_traceback() {
    let hit = align_one(b"ACGTGATG", b"AGTGATACT", AlignConfig::edit_distance().max_errors(4));
    assert!(hit.is_hit());
    assert_eq!(hit.score(), -4);
    assert_eq!(render(&hit.alignment().second), "A-GTGATACT");

    let miss = align_one(b"ACGTGATG", b"AGTGATACT", AlignConfig::edit_distance().max_errors(3));
    assert!(!miss.is_hit());
    assert_eq!(miss.score(), i64::MIN);
    assert_eq!(miss.begin_positions(), (8, 9));
    assert_eq!(miss.end_positions(), (8, 9));
    assert_eq!(miss.alignment(), &PairwiseAlignment::default());
    assert_eq!(miss.sequence1_id(), 0);
}

#[test]
fn select_kernel_table() {
    let mut config = normalize(&AlignConfig::edit_distance()).unwrap();
    let score_only = ScoreOnly::FLAGS;
    assert_eq!(select_kernel(&config, score_only), KernelKind::EditDistance);
    assert_eq!(select_kernel(&config, AllOutputs::FLAGS), KernelKind::Scalar);

    config.method = Method::Global(FreeEndGaps::SEQUENCE1_FREE);
    assert_eq!(select_kernel(&config, score_only), KernelKind::EditDistance);
    config.method = Method::Local;
    assert_eq!(select_kernel(&config, score_only), KernelKind::Scalar);

    config.method = Method::default();
    config.band = Some(Band::new(-2, 2));
    assert_eq!(select_kernel(&config, score_only), KernelKind::ScalarBanded);

    config.band = None;
    config.vectorised = true;
    assert_eq!(select_kernel(&config, score_only), KernelKind::Vectorised);

    config.vectorised = false;
    config.gap_cost = GapCost::new(-1, -1);
    assert_eq!(select_kernel(&config, score_only), KernelKind::Scalar);
}

#[test]
fn configuration_errors() {
    let errors = [
        (normalize(&AlignConfig::global()), ConfigError::MissingScoringScheme),
        (normalize(&affine().gap_cost(GapCost::new(1, -1))), ConfigError::PositiveGapCost {
            open:   1,
            extend: -1,
        }),
        (normalize(&affine().band(Band::new(3, 1))), ConfigError::DegenerateBand { lower: 3, upper: 1 }),
        (
            normalize(&affine().band(Band::new(-1, 1)).vectorised()),
            ConfigError::UnsupportedBand("vectorised alignments are computed without a band"),
        ),
        (normalize(&affine().parallel(Parallel::new())), ConfigError::MissingThreadCount),
        (normalize(&affine().threads(0)), ConfigError::ZeroThreadCount),
        (
            normalize(&affine().max_errors(2)),
            ConfigError::UnsupportedMaxErrors("errors are only counted under the unit edit distance"),
        ),
        (
            normalize(&AlignConfig::edit_distance().method(Method::Local).max_errors(2)),
            ConfigError::UnsupportedMaxErrors("local alignments are not bounded by errors"),
        ),
        (
            normalize(&AlignConfig::edit_distance().vectorised().max_errors(2)),
            ConfigError::UnsupportedMaxErrors("vectorised alignments are computed without an error bound"),
        ),
    ];
    for (result, expected) in errors {
        assert_eq!(result.unwrap_err(), expected);
    }

    let overflowing = AlignConfig::global()
        .scoring(ScoringScheme::match_mismatch(200, -1))
        .score_type(ScoreType::I8);
    assert_eq!(
        configure(overflowing).unwrap_err(),
        ConfigError::ScoreNotRepresentable {
            value:      200,
            score_type: ScoreType::I8,
        }
    );

    let gap_sum = affine().gap_cost(GapCost::new(-100, -50)).score_type(ScoreType::I8);
    assert!(matches!(
        configure(gap_sum).unwrap_err(),
        ConfigError::ScoreNotRepresentable { value: -150, .. }
    ));
}

#[test]
fn exit_codes() {
    let config = AlignmentError::from(ConfigError::MissingThreadCount);
    let input = AlignmentError::from(InputError::BandOutsideMatrix { pair: 0 });
    assert_eq!((config.get_code(), input.get_code()), (2, 1));
    assert!(std::error::Error::source(&config).is_some());
}

#[test]
fn defaults_are_filled_in() {
    let config = normalize(&AlignConfig::global().scoring(ScoringScheme::match_mismatch(1, -1))).unwrap();
    assert_eq!(config.gap_cost, GapCost::DEFAULT);
    assert_eq!(config.score_type, ScoreType::I32);
    assert_eq!(config.thread_count, None);

    let configured = configure(affine().vectorised().score_type(ScoreType::I16)).unwrap();
    assert_eq!(configured.algorithm.traits().chunk_size, 16);
    assert_eq!(configured.algorithm.traits().kernel, KernelKind::Vectorised);
}

fn pair<'a>(first: &'a [u8], second: &'a [u8]) -> IndexedPair<'a> {
    IndexedPair { first, second, index: 7 }
}

#[test]
fn input_validation() {
    let matrix = SubstitutionMatrix::with_match_mismatch(4, 1, -1);
    let algorithm = configure(AlignConfig::global().scoring(ScoringScheme::Matrix(matrix))).unwrap().algorithm;
    assert_eq!(algorithm.validate(&pair(&[0, 3], &[1])), Ok(()));
    assert_eq!(
        algorithm.validate(&pair(&[0, 4], &[1])),
        Err(InputError::RankOutOfRange {
            pair:          7,
            rank:          4,
            alphabet_size: 4,
        })
    );

    let packed = configure(affine().vectorised().score_type(ScoreType::I8)).unwrap().algorithm;
    assert_eq!(packed.validate(&pair(&[127], &[0])), Ok(()));
    assert_eq!(
        packed.validate(&pair(&[0], &[200])),
        Err(InputError::RankNotPackable { pair: 7, rank: 200 })
    );
}

#[test]
fn band_validation() {
    let (seq1, seq2) = ([0u8; 6], [0u8; 4]);
    let validate = |band: Band, free: FreeEndGaps| {
        configure(affine().band(band).free_end_gaps(free))
            .unwrap()
            .algorithm
            .validate(&pair(&seq1, &seq2))
    };

    assert_eq!(validate(Band::new(-1, 2), FreeEndGaps::NONE), Ok(()));
    assert_eq!(
        validate(Band::new(7, 9), FreeEndGaps::NONE),
        Err(InputError::BandOutsideMatrix { pair: 7 })
    );
    assert_eq!(
        validate(Band::new(1, 3), FreeEndGaps::NONE),
        Err(InputError::BandExcludesOrigin { pair: 7 })
    );
    assert_eq!(validate(Band::new(1, 3), FreeEndGaps::SEQUENCE1_FREE), Ok(()));
    assert_eq!(
        validate(Band::new(-2, 1), FreeEndGaps::NONE),
        Err(InputError::BandExcludesSink { pair: 7 })
    );
    // The last row is reachable inside the band
    let free_end = FreeEndGaps {
        sequence1_trailing: true,
        ..FreeEndGaps::NONE
    };
    assert_eq!(validate(Band::new(-2, 1), free_end), Ok(()));
}

#[test]
fn banded_matches_unbanded_on_a_narrow_path() {
    let first = dna(b"ACGTTGCAAGTCCATGACGT");
    let second = dna(b"ACGTGCAAGTCCATTGACGT");
    let pairs = [(&first, &second)];

    let full = align_pairwise(pairs, affine()).unwrap().next().unwrap();
    let banded = align_pairwise(pairs, affine().band(Band::new(-2, 2))).unwrap().next().unwrap();
    assert_eq!(banded.score(), full.score());
    assert_eq!(banded.end_positions(), full.end_positions());
    assert_eq!(banded.alignment(), full.alignment());
}

#[test]
fn unbounded_band_matches_unbanded() {
    let (first, second) = (vec![0, 1, 2, 3], vec![0, 1, 3]);
    let pairs = [(&first, &second)];
    let full = align_pairwise(pairs, affine()).unwrap().next().unwrap();
    let unbounded = Band::new(isize::MIN, isize::MAX);
    let banded = align_pairwise(pairs, affine().band(unbounded)).unwrap().next().unwrap();
    assert_eq!(banded.score(), full.score());
    assert_eq!(banded.alignment(), full.alignment());

    let edit = align_pairwise(pairs, AlignConfig::edit_distance().band(unbounded))
        .unwrap()
        .next()
        .unwrap();
    assert_eq!(edit.score(), -1);
}

#[test]
fn vectorised_matches_scalar() {
    let sequences: Vec<(Vec<u8>, Vec<u8>)> = [
        (&b"ACGTGATG"[..], &b"AGTGATACT"[..]),
        (b"A", b"ACGTACGTACGT"),
        (b"TTTTTTTTTTTTTTTTT", b"TTGTT"),
        (b"", b"GAT"),
        (b"GATTACA", b"GATTACA"),
    ]
    .iter()
    .map(|(a, b)| (dna(a), dna(b)))
    .collect();

    for method in [
        Method::default(),
        Method::Local,
        Method::Global(FreeEndGaps::SEQUENCE1_FREE),
        Method::Global(FreeEndGaps::ALL),
    ] {
        for scoring in [
            ScoringScheme::match_mismatch(2, -3),
            ScoringScheme::match_mismatch(-1, -3),
            ScoringScheme::Matrix(SubstitutionMatrix::dna_transition_transversion(5, -1, -4)),
        ] {
            let gap = GapCost::new(-4, -1);
            let config = AlignConfig::global()
                .method(method)
                .scoring(scoring.clone())
                .gap_cost(gap)
                .score_type(ScoreType::I16);
            let scalar: Vec<_> = align_pairwise(&sequences, config.clone()).unwrap().collect();
            let vectorised: Vec<_> = align_pairwise(&sequences, config.vectorised()).unwrap().collect();

            for (s, v) in scalar.iter().zip(&vectorised) {
                assert_eq!(s.score(), v.score(), "{method:?}");
                assert_eq!(s.end_positions(), v.end_positions(), "{method:?}");
                assert_eq!(s.sequence1_id(), v.sequence1_id());
                assert_eq!(v.alignment().rescore(&scoring, gap), v.score(), "{method:?}");
                assert_eq!(v.alignment().first.ungapped().len(), v.end_positions().0 - v.begin_positions().0);
            }
        }
    }
}
