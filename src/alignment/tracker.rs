use crate::{
    alignment::{DpScore, LaneCoordinate, MatrixCoordinate, Method},
    math::ScoreInt,
    simd::{LaneMask, Lanes},
};

/// Which cells may hold the end of an alignment.
///
/// Local alignments may end anywhere. Global alignments end in the last
/// cell, or anywhere in the last row if sequence 1 may overhang at its end,
/// or anywhere in the last column if sequence 2 may.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TrackingRule {
    every_cell:  bool,
    last_row:    bool,
    last_column: bool,
}

impl TrackingRule {
    pub(crate) fn new(method: Method) -> Self {
        let free = method.free_end_gaps();
        TrackingRule {
            every_cell:  method.is_local(),
            last_row:    free.sequence1_trailing,
            last_column: free.sequence2_trailing,
        }
    }

    /// Whether `coordinate` is a candidate in a matrix whose last row and
    /// column are `last_row` and `last_col`.
    #[inline]
    pub(crate) fn accepts(&self, coordinate: MatrixCoordinate, last_row: usize, last_col: usize) -> bool {
        let MatrixCoordinate { row, col } = coordinate;
        row <= last_row
            && col <= last_col
            && (self.every_cell
                || (self.last_row && row == last_row)
                || (self.last_column && col == last_col)
                || (row == last_row && col == last_col))
    }
}

/// Receives every computed cell of the sweep in column-major order.
pub(crate) trait Tracker<S: DpScore> {
    fn track(&mut self, score: S, coordinate: MatrixCoordinate);
}

/// The best candidate cell of a scalar alignment. Later cells replace
/// earlier ones of equal score.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OptimumTracker<T> {
    rule:       TrackingRule,
    last_row:   usize,
    last_col:   usize,
    score:      T,
    coordinate: MatrixCoordinate,
}

impl<T: ScoreInt> OptimumTracker<T> {
    pub(crate) fn new(rule: TrackingRule, len1: usize, len2: usize) -> Self {
        OptimumTracker {
            rule,
            last_row: len2,
            last_col: len1,
            score: T::MIN,
            coordinate: MatrixCoordinate::new(len2, len1),
        }
    }

    #[inline]
    pub(crate) fn score(&self) -> T {
        self.score
    }

    #[inline]
    pub(crate) fn coordinate(&self) -> MatrixCoordinate {
        self.coordinate
    }
}

impl<T: ScoreInt + DpScore> Tracker<T> for OptimumTracker<T> {
    #[inline]
    fn track(&mut self, score: T, coordinate: MatrixCoordinate) {
        if score >= self.score && self.rule.accepts(coordinate, self.last_row, self.last_col) {
            self.score = score;
            self.coordinate = coordinate;
        }
    }
}

/// The best candidate cell of every lane of a vectorised alignment.
///
/// Each lane checks candidates against its own sequence lengths. A cell
/// within those lengths only depends on cells above and to the left of it,
/// which hold real symbols of the lane, so its score equals the scalar one no
/// matter how the padding behind it scores.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SimdOptimumTracker<T, const N: usize> {
    rule:       TrackingRule,
    ends:       LaneCoordinate<N>,
    score:      Lanes<T, N>,
    coordinate: LaneCoordinate<N>,
}

impl<T: ScoreInt, const N: usize> SimdOptimumTracker<T, N> {
    /// `lengths` holds the sequence lengths `(len1, len2)` of every lane.
    pub(crate) fn new(rule: TrackingRule, lengths: &[(usize, usize); N]) -> Self {
        let ends = LaneCoordinate {
            rows: lengths.map(|(_, len2)| len2),
            cols: lengths.map(|(len1, _)| len1),
        };
        SimdOptimumTracker {
            rule,
            ends,
            score: Lanes::splat(T::MIN),
            coordinate: ends,
        }
    }

    /// The score and the end of the alignment in `lane`.
    pub(crate) fn finish(&self, lane: usize) -> (i64, MatrixCoordinate) {
        (self.score.lane(lane).widen(), self.coordinate.lane(lane))
    }
}

impl<T: ScoreInt, const N: usize> Tracker<Lanes<T, N>> for SimdOptimumTracker<T, N> {
    #[inline]
    fn track(&mut self, score: Lanes<T, N>, coordinate: MatrixCoordinate) {
        let candidates =
            LaneMask::from_fn(|i| self.rule.accepts(coordinate, self.ends.rows[i], self.ends.cols[i]));
        let better = candidates & score.simd_ge(self.score);
        if better.any() {
            self.score = Lanes::select(better, score, self.score);
            self.coordinate.set_where(better, coordinate);
        }
    }
}
