//! The DP sweep and the aligners built on it.
//!
//! [`sweep`] fills the matrix column by column, one symbol of sequence 1 per
//! column, and hands every cell to a [`Tracker`]. It is generic over the
//! score representation, so [`ScalarAligner`] runs it on one pair with
//! plain integers while [`SimdAligner`] runs it on a batch of pairs packed
//! into lane vectors.

use crate::{
    alignment::{
        AffineGapRecursion, AffineCell, Band, BandMapping, CoordinateMatrix, DpScore, LaneView, MatrixCoordinate,
        NoTrace, OptimumTracker, OutputFlags, PairwiseAlignment, ResultData, ScoreMatrixSingleColumn,
        ScoringProfile, SimdOptimumTracker, SimdScoringProfile, TraceDirections, TraceMatrix, TraceMatrixBanded, TraceMatrixFull,
        TraceStore, Tracker, TrackingRule, VerticalCarry, traceback,
    },
    execution::IndexedPair,
    math::ScoreInt,
    simd::Lanes,
};

#[inline]
fn store<S: DpScore, X: TraceStore<S::Trace>, const TRACE: bool>(
    scores: &mut ScoreMatrixSingleColumn<S>, trace: &mut X, coordinate: MatrixCoordinate, cell: &AffineCell<S>,
) {
    scores.optimal[coordinate.row] = cell.optimal;
    scores.horizontal[coordinate.row] = cell.horizontal;
    if TRACE {
        trace.set(coordinate, cell.trace);
        trace.set_horizontal(coordinate.row, cell.horizontal_open);
    }
}

fn sweep_columns<S, P, X, K, const TRACE: bool>(
    recursion: &AffineGapRecursion<S>, profile: &P, seq1: &[P::Symbol], seq2: &[P::Symbol], matrix: &CoordinateMatrix,
    trace: &mut X, tracker: &mut K,
) where
    S: DpScore,
    P: ScoringProfile<S>,
    X: TraceStore<S::Trace>,
    K: Tracker<S>, {
    let sentinel = recursion.lowest_viable_score();
    let mut scores = ScoreMatrixSingleColumn::new(matrix.rows(), sentinel);

    let mut carry = VerticalCarry::new(sentinel);
    for row in matrix.column_rows(0) {
        let coordinate = MatrixCoordinate::new(row, 0);
        let cell = if row == 0 {
            recursion.origin::<TRACE>(&mut carry)
        } else {
            recursion.first_column::<TRACE>(&mut carry)
        };
        store::<S, X, TRACE>(&mut scores, trace, coordinate, &cell);
        tracker.track(cell.optimal, coordinate);
    }

    for col in 1..matrix.cols() {
        let rows = matrix.column_rows(col);
        if rows.is_empty() {
            continue;
        }
        let (first, last) = rows.into_inner();
        let column = profile.column_profile(seq1[col - 1]);

        // A column starting below row 0 has no vertical gap entering it
        let mut carry = VerticalCarry::new(sentinel);
        let mut diagonal;
        let mut row = first;
        if first == 0 {
            let coordinate = MatrixCoordinate::new(0, col);
            let cell = recursion.first_row::<TRACE>(scores.horizontal[0], trace.horizontal(0), &mut carry);
            diagonal = scores.optimal[0];
            store::<S, X, TRACE>(&mut scores, trace, coordinate, &cell);
            tracker.track(cell.optimal, coordinate);
            row = 1;
        } else {
            diagonal = scores.optimal[first - 1];
        }

        while row <= last {
            let coordinate = MatrixCoordinate::new(row, col);
            let substitution = profile.score(column, seq2[row - 1]);
            let cell = recursion.inner::<TRACE>(
                diagonal.add(substitution),
                scores.horizontal[row],
                trace.horizontal(row),
                &mut carry,
            );
            diagonal = scores.optimal[row];
            store::<S, X, TRACE>(&mut scores, trace, coordinate, &cell);
            tracker.track(cell.optimal, coordinate);
            row += 1;
        }
    }
}

/// Computes every cell of `matrix` and reports it to `tracker`. Directions
/// are only computed if `trace` keeps them.
pub(crate) fn sweep<S, P, X, K>(
    recursion: &AffineGapRecursion<S>, profile: &P, seq1: &[P::Symbol], seq2: &[P::Symbol], matrix: &CoordinateMatrix,
    trace: &mut X, tracker: &mut K,
) where
    S: DpScore,
    P: ScoringProfile<S>,
    X: TraceStore<S::Trace>,
    K: Tracker<S>, {
    debug_assert_eq!(seq1.len() + 1, matrix.cols());
    debug_assert_eq!(seq2.len() + 1, matrix.rows());
    if X::ENABLED {
        sweep_columns::<S, P, X, K, true>(recursion, profile, seq1, seq2, matrix, trace, tracker);
    } else {
        sweep_columns::<S, P, X, K, false>(recursion, profile, seq1, seq2, matrix, trace, tracker);
    }
}

/// Fills in the requested outputs of one pair whose alignment ends at `end`
/// with `score`. A trace matrix is given exactly when begin positions or the
/// alignment were requested.
///
/// ## Panics
///
/// The traceback must stay inside `trace`, which holds for every matrix
/// filled by [`sweep`].
pub(crate) fn collect_result<M: TraceMatrix + ?Sized>(
    pair: &IndexedPair<'_>, outputs: OutputFlags, score: i64, end: MatrixCoordinate, trace: Option<&M>,
) -> ResultData {
    let mut data = ResultData {
        sequence1_id: outputs.sequence1_id.then_some(pair.index),
        sequence2_id: outputs.sequence2_id.then_some(pair.index),
        score: outputs.score.then_some(score),
        end: outputs.end.then_some((end.col, end.row)),
        ..ResultData::default()
    };

    if let Some(trace) = trace {
        let traceback = match traceback(trace, end) {
            Ok(traceback) => traceback,
            Err(e) => unreachable!("the traceback of a filled trace matrix failed: {e}"),
        };
        if outputs.begin {
            data.begin = Some((traceback.begin.col, traceback.begin.row));
        }
        if outputs.alignment {
            data.alignment = Some(PairwiseAlignment::from_traceback(
                pair.first,
                pair.second,
                traceback,
                end,
            ));
        }
    }
    data
}

/// Aligns one pair at a time with scalar scores, optionally in a band.
#[derive(Clone, Debug)]
pub(crate) struct ScalarAligner<T: DpScore, P> {
    pub(crate) recursion: AffineGapRecursion<T>,
    pub(crate) profile:   P,
    pub(crate) rule:      TrackingRule,
    pub(crate) band:      Option<Band>,
    /// Scores below this are reported as misses
    pub(crate) min_score: Option<i64>,
    pub(crate) outputs:   OutputFlags,
}

impl<T, P> ScalarAligner<T, P>
where
    T: ScoreInt + DpScore<Trace = TraceDirections>,
    P: ScoringProfile<T, Symbol = u8>,
{
    /// ## Panics
    ///
    /// The band, if any, must intersect the matrix of the pair.
    pub(crate) fn align(&self, pair: &IndexedPair<'_>) -> ResultData {
        let (seq1, seq2) = (pair.first, pair.second);
        let matrix = match self.band {
            Some(band) => match BandMapping::new(band, seq1.len(), seq2.len()) {
                Some(mapping) => CoordinateMatrix::banded(mapping),
                None => unreachable!("bands are validated against every pair"),
            },
            None => CoordinateMatrix::new(seq1.len(), seq2.len()),
        };
        let mut tracker = OptimumTracker::<T>::new(self.rule, seq1.len(), seq2.len());

        if !self.outputs.needs_traceback() {
            sweep(&self.recursion, &self.profile, seq1, seq2, &matrix, &mut NoTrace, &mut tracker);
            return self.finish(pair, &tracker, None::<&NoTrace>);
        }

        match matrix.band() {
            Some(mapping) => {
                let mut trace = TraceMatrixBanded::new(*mapping);
                sweep(&self.recursion, &self.profile, seq1, seq2, &matrix, &mut trace, &mut tracker);
                self.finish(pair, &tracker, Some(&trace))
            }
            None => {
                let mut trace = TraceMatrixFull::new(matrix.rows(), matrix.cols());
                sweep(&self.recursion, &self.profile, seq1, seq2, &matrix, &mut trace, &mut tracker);
                self.finish(pair, &tracker, Some(&trace))
            }
        }
    }

    #[inline]
    fn finish<M: TraceMatrix>(&self, pair: &IndexedPair<'_>, tracker: &OptimumTracker<T>, trace: Option<&M>) -> ResultData {
        let score = tracker.score().widen();
        if self.min_score.is_some_and(|min| score < min) {
            return ResultData::missed(pair, self.outputs);
        }
        collect_result(pair, self.outputs, score, tracker.coordinate(), trace)
    }
}

/// The sweep over lane vectors, compiled for every supported instruction set
/// when the `multiversion` feature is enabled.
#[cfg_attr(feature = "multiversion", multiversion::multiversion(targets = "simd"))]
fn vectorised_sweep<T, const N: usize, P, X>(
    recursion: &AffineGapRecursion<Lanes<T, N>>, profile: &P, seq1: &[Lanes<T, N>], seq2: &[Lanes<T, N>],
    matrix: &CoordinateMatrix, trace: &mut X, tracker: &mut SimdOptimumTracker<T, N>,
) where
    T: ScoreInt,
    P: SimdScoringProfile<T, N>,
    X: TraceStore<Lanes<u8, N>>, {
    sweep(recursion, profile, seq1, seq2, matrix, trace, tracker);
}

/// Aligns up to `N` pairs at once, one per lane.
///
/// Shorter sequences are filled up with the padding symbols of the scoring
/// profile. Every lane tracks its optimum within its own sequence lengths, so
/// the results equal those of [`ScalarAligner`].
#[derive(Clone, Debug)]
pub(crate) struct SimdAligner<T: ScoreInt, const N: usize, P> {
    pub(crate) recursion: AffineGapRecursion<Lanes<T, N>>,
    pub(crate) profile:   P,
    pub(crate) rule:      TrackingRule,
    pub(crate) outputs:   OutputFlags,
}

impl<T, const N: usize, P> SimdAligner<T, N, P>
where
    T: ScoreInt,
    P: SimdScoringProfile<T, N>,
{
    fn pack(&self, pairs: &[IndexedPair<'_>], length: usize, select: for<'b> fn(&'b IndexedPair<'_>) -> &'b [u8], padding: T) -> Vec<Lanes<T, N>> {
        (0..length)
            .map(|i| {
                Lanes(std::array::from_fn(|lane| {
                    match pairs.get(lane).and_then(|pair| select(pair).get(i)) {
                        Some(&rank) => match self.profile.pack(rank) {
                            Some(packed) => packed,
                            None => unreachable!("ranks are validated against the padding symbols"),
                        },
                        None => padding,
                    }
                }))
            })
            .collect()
    }

    /// Aligns `pairs`, of which there must be at most `N`.
    ///
    /// ## Panics
    ///
    /// Every rank must be packable next to the padding symbols.
    pub(crate) fn align_batch(&self, pairs: &[IndexedPair<'_>]) -> Vec<ResultData> {
        debug_assert!(pairs.len() <= N);
        let lengths: [(usize, usize); N] =
            std::array::from_fn(|lane| pairs.get(lane).map_or((0, 0), |p| (p.first.len(), p.second.len())));
        let max1 = lengths.iter().map(|l| l.0).max().unwrap_or(0);
        let max2 = lengths.iter().map(|l| l.1).max().unwrap_or(0);

        let (padding1, padding2) = self.profile.padding();
        let seq1 = self.pack(pairs, max1, |p| p.first, padding1);
        let seq2 = self.pack(pairs, max2, |p| p.second, padding2);

        let matrix = CoordinateMatrix::new(max1, max2);
        let mut tracker = SimdOptimumTracker::new(self.rule, &lengths);

        if self.outputs.needs_traceback() {
            let mut trace = TraceMatrixFull::new(matrix.rows(), matrix.cols());
            vectorised_sweep(&self.recursion, &self.profile, &seq1, &seq2, &matrix, &mut trace, &mut tracker);
            pairs
                .iter()
                .enumerate()
                .map(|(lane, pair)| {
                    let (score, end) = tracker.finish(lane);
                    collect_result(pair, self.outputs, score, end, Some(&LaneView::new(&trace, lane)))
                })
                .collect()
        } else {
            vectorised_sweep(&self.recursion, &self.profile, &seq1, &seq2, &matrix, &mut NoTrace, &mut tracker);
            pairs
                .iter()
                .enumerate()
                .map(|(lane, pair)| {
                    let (score, end) = tracker.finish(lane);
                    collect_result(pair, self.outputs, score, end, None::<&NoTrace>)
                })
                .collect()
        }
    }
}
