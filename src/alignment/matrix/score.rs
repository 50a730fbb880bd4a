/// The scores of the most recent column of the DP matrix.
///
/// Entry `r` of `optimal` holds the best score of row `r` in the last column
/// that computed it, and entry `r` of `horizontal` the horizontal gap score
/// leaving that cell to the right. The vertical gap score never needs more
/// than one value, which the sweep carries down the column in a
/// [`VerticalCarry`](crate::alignment::VerticalCarry).
#[derive(Clone, Debug)]
pub(crate) struct ScoreMatrixSingleColumn<S> {
    pub(crate) optimal:    Vec<S>,
    pub(crate) horizontal: Vec<S>,
}

impl<S: Copy> ScoreMatrixSingleColumn<S> {
    /// Allocates a column of `rows` cells, all set to `fill`. Cells the
    /// sweep never computes keep this value.
    #[inline]
    pub(crate) fn new(rows: usize, fill: S) -> Self {
        ScoreMatrixSingleColumn {
            optimal:    vec![fill; rows],
            horizontal: vec![fill; rows],
        }
    }
}
