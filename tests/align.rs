#![cfg(feature = "rand")]

use galign::{
    alignment::*,
    execution::align_pairwise,
    generate::{mutate, rand_pairs, rand_ranks},
};
use std::sync::Mutex;

fn related_pairs(count: usize, seed: u64) -> Vec<(Vec<u8>, Vec<u8>)> {
    (0..count as u64)
        .map(|i| {
            let first = rand_ranks(4, 20 + (i as usize * 7) % 60, seed + i);
            let second = mutate(&first, 4, 8, seed + 1000 + i);
            (first, second)
        })
        .collect()
}

fn scores<const B: bool, const E: bool, const A: bool, const I1: bool, const I2: bool>(
    results: impl IntoIterator<Item = AlignmentResult<Outputs<true, B, E, A, I1, I2>>>,
) -> Vec<i64> {
    results.into_iter().map(|r| r.score()).collect()
}

#[test]
fn edit_distance_kernel_agrees_with_affine_kernel() {
    let pairs = rand_pairs(4, 0..40, 60, 11);
    for free in [FreeEndGaps::NONE, FreeEndGaps::SEQUENCE1_FREE] {
        let edit = AlignConfig::edit_distance().free_end_gaps(free).outputs::<ScoreOnly>();
        // Asking for the alignment rules out the edit distance kernel
        let affine = AlignConfig::edit_distance().free_end_gaps(free);

        let expected = scores(align_pairwise(&pairs, affine).unwrap());
        let observed = scores(align_pairwise(&pairs, edit).unwrap());
        assert_eq!(observed, expected, "{free:?}");
    }
}

#[test]
fn alignments_rescore_to_their_scores() {
    let pairs = related_pairs(40, 3);
    let scheme = ScoringScheme::match_mismatch(2, -3);
    let gap = GapCost::new(-5, -2);
    for method in [Method::default(), Method::Local, Method::Global(FreeEndGaps::ALL)] {
        let config = AlignConfig::global().method(method).scoring(scheme.clone()).gap_cost(gap);
        for result in align_pairwise(&pairs, config).unwrap() {
            let (seq1, seq2) = &pairs[result.sequence1_id()];
            let (begin, end) = (result.begin_positions(), result.end_positions());
            let alignment = result.alignment();

            assert_eq!(alignment.rescore(&scheme, gap), result.score(), "{method:?}");
            assert_eq!(alignment.first.ungapped(), &seq1[begin.0..end.0]);
            assert_eq!(alignment.second.ungapped(), &seq2[begin.1..end.1]);
            assert_eq!(alignment.first.len(), alignment.second.len());
        }
    }
}

#[test]
fn band_covering_the_path_changes_nothing() {
    let pairs = related_pairs(30, 17);
    let config = AlignConfig::global()
        .scoring(ScoringScheme::match_mismatch(4, -5))
        .gap_cost(GapCost::new(-10, -1));

    let full: Vec<_> = align_pairwise(&pairs, config.clone()).unwrap().collect();
    let wide: Vec<_> = align_pairwise(&pairs, config.clone().band(Band::new(-200, 200)))
        .unwrap()
        .collect();
    assert_eq!(wide, full);

    for (pair, expected) in pairs.iter().zip(&full) {
        // The band spanned by the optimal path, from the origin to the sink
        let (lower, upper) = diagonal_range(expected.alignment());
        let banded = align_pairwise([pair], config.clone().band(Band::new(lower, upper)))
            .unwrap()
            .next()
            .unwrap();
        assert_eq!(banded.score(), expected.score(), "band {lower}..={upper}");
        assert_eq!(banded.alignment().rescore(&ScoringScheme::match_mismatch(4, -5), GapCost::new(-10, -1)), banded.score());
    }
}

/// The lowest and highest diagonal (sequence 1 position minus sequence 2
/// position) visited by a global alignment.
fn diagonal_range(alignment: &PairwiseAlignment) -> (isize, isize) {
    let mut diagonal = 0isize;
    let (mut lower, mut upper) = (0, 0);
    for column in alignment.columns() {
        match column {
            (Some(_), None) => diagonal += 1,
            (None, Some(_)) => diagonal -= 1,
            _ => {}
        }
        lower = lower.min(diagonal);
        upper = upper.max(diagonal);
    }
    (lower, upper)
}

#[test]
fn narrow_band_is_rejected_before_aligning() {
    let pairs = [(vec![0u8; 10], vec![0u8; 3]), (vec![0u8; 3], vec![0u8; 3])];
    let config = AlignConfig::global()
        .scoring(ScoringScheme::match_mismatch(1, -1))
        .band(Band::new(-2, 2));
    assert!(matches!(
        align_pairwise(&pairs, config),
        Err(AlignmentError::Input(InputError::BandExcludesSink { pair: 0 }))
    ));
}

#[test]
fn vectorised_agrees_with_scalar() {
    // More pairs than lanes, with a partially filled last chunk
    let pairs = rand_pairs(4, 0..35, 77, 5);
    let schemes = [
        ScoringScheme::match_mismatch(2, -3),
        ScoringScheme::match_mismatch(-1, -2),
        ScoringScheme::Matrix(SubstitutionMatrix::dna_transition_transversion(3, -1, -2)),
    ];
    let methods = [
        Method::default(),
        Method::Local,
        Method::Global(FreeEndGaps::SEQUENCE1_FREE),
        Method::Global(FreeEndGaps::ALL),
    ];

    for score_type in [ScoreType::I16, ScoreType::I32] {
        for scheme in &schemes {
            for method in methods {
                let config = AlignConfig::global()
                    .method(method)
                    .scoring(scheme.clone())
                    .gap_cost(GapCost::new(-3, -1))
                    .score_type(score_type)
                    .outputs::<ScoreAndEnd>();
                let scalar: Vec<_> = align_pairwise(&pairs, config.clone()).unwrap().collect();
                let vectorised: Vec<_> = align_pairwise(&pairs, config.vectorised()).unwrap().collect();
                assert_eq!(vectorised, scalar, "{method:?} {scheme:?} {score_type}");
            }
        }
    }
}

#[test]
fn vectorised_tracebacks_rescore() {
    let pairs = related_pairs(20, 23);
    let scheme = ScoringScheme::match_mismatch(2, -3);
    let gap = GapCost::new(-4, -1);
    let config = AlignConfig::local()
        .scoring(scheme.clone())
        .gap_cost(gap)
        .score_type(ScoreType::I16)
        .vectorised();
    let scalar = scores(align_pairwise(&pairs, config.clone().outputs::<ScoreOnly>()).unwrap());
    for (result, expected) in align_pairwise(&pairs, config).unwrap().zip(scalar) {
        assert_eq!(result.score(), expected);
        assert_eq!(result.alignment().rescore(&scheme, gap), expected);
    }
}

#[test]
fn byte_scores_on_short_sequences() {
    let pairs = rand_pairs(4, 0..12, 40, 31);
    let config = AlignConfig::global()
        .scoring(ScoringScheme::match_mismatch(2, -2))
        .gap_cost(GapCost::new(-2, -1))
        .score_type(ScoreType::I8)
        .outputs::<ScoreOnly>();
    let wide = scores(align_pairwise(&pairs, config.clone().score_type(ScoreType::I64)).unwrap());
    assert_eq!(scores(align_pairwise(&pairs, config.clone()).unwrap()), wide);
    assert_eq!(scores(align_pairwise(&pairs, config.vectorised()).unwrap()), wide);
}

#[test]
fn parallel_results_keep_input_order() {
    let pairs = rand_pairs(4, 5..50, 101, 7);
    let base = AlignConfig::global()
        .scoring(ScoringScheme::match_mismatch(4, -5))
        .gap_cost(GapCost::new(-10, -1));

    for config in [base.clone(), base.clone().vectorised(), base.clone().band(Band::new(-60, 60))] {
        let sequential: Vec<_> = align_pairwise(&pairs, config.clone()).unwrap().collect();
        for threads in [1, 2, 4] {
            let parallel: Vec<_> = align_pairwise(&pairs, config.clone().threads(threads)).unwrap().collect();
            assert_eq!(parallel, sequential, "{threads} threads");
            assert!(parallel.iter().enumerate().all(|(i, r)| r.sequence1_id() == i && r.sequence2_id() == i));
        }
    }
}

#[test]
fn results_are_pulled_lazily() {
    let pairs = rand_pairs(4, 1..20, 10, 2);
    let config = AlignConfig::global()
        .scoring(ScoringScheme::match_mismatch(1, -1))
        .outputs::<ScoreOnly>();
    let mut range = align_pairwise(&pairs, config).unwrap();
    assert_eq!(range.len(), 10);
    range.next();
    assert_eq!(range.len(), 9);
    assert_eq!(range.count(), 9);
}

#[test]
fn pushed_results_cover_the_batch() {
    let pairs = rand_pairs(4, 0..30, 50, 13);
    let config = AlignConfig::global()
        .scoring(ScoringScheme::match_mismatch(4, -5))
        .outputs::<Outputs<true, false, false, false, true, false>>();
    let expected = scores(align_pairwise(&pairs, config.clone()).unwrap());

    for threads in [None, Some(3)] {
        let received = Mutex::new(Vec::new());
        let mut config = config.clone();
        if let Some(threads) = threads {
            config = config.threads(threads);
        }
        align_pairwise(
            &pairs,
            config.on_result(|result| received.lock().unwrap().push((result.sequence1_id(), result.score()))),
        )
        .unwrap();

        let mut received = received.into_inner().unwrap();
        received.sort_unstable();
        assert_eq!(received.len(), pairs.len());
        assert!(received.iter().enumerate().all(|(i, &(id, _))| id == i));
        assert_eq!(received.into_iter().map(|(_, s)| s).collect::<Vec<_>>(), expected);
    }
}

#[test]
fn configuration_errors_surface_before_aligning() {
    let pairs = rand_pairs(4, 1..5, 3, 1);
    let config = AlignConfig::global()
        .scoring(ScoringScheme::match_mismatch(1, -1))
        .parallel(Parallel::new());
    let Err(error) = align_pairwise(&pairs, config) else {
        panic!("a thread count is required");
    };
    assert_eq!(error, AlignmentError::Config(ConfigError::MissingThreadCount));

    let matrix = ScoringScheme::Matrix(SubstitutionMatrix::with_match_mismatch(4, 1, -1));
    let pairs = [(vec![0u8, 1], vec![2u8]), (vec![3u8], vec![9u8])];
    let Err(error) = align_pairwise(&pairs, AlignConfig::global().scoring(matrix)) else {
        panic!("rank 9 is outside the alphabet");
    };
    assert_eq!(
        error,
        AlignmentError::Input(InputError::RankOutOfRange {
            pair:          1,
            rank:          9,
            alphabet_size: 4,
        })
    );
}

#[test]
fn cigar_round_trip() {
    let pairs = related_pairs(15, 41);
    let config = AlignConfig::local()
        .scoring(ScoringScheme::match_mismatch(2, -3))
        .gap_cost(GapCost::new(-5, -2));

    for result in align_pairwise(&pairs, config).unwrap() {
        let (reference, query) = &pairs[result.sequence1_id()];
        let (begin, end) = (result.begin_positions(), result.end_positions());
        let clipped = ClippedBases {
            soft_front: begin.1,
            soft_back: query.len() - end.1,
            ..ClippedBases::default()
        };

        let cigar = cigar_from_alignment(result.alignment(), clipped, true);
        if result.alignment().is_empty() {
            continue;
        }
        let rebuilt = alignment_from_cigar(&cigar, reference, begin.0, query).unwrap();
        assert_eq!(&rebuilt, result.alignment());
    }
}
