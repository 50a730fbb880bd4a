use crate::alignment::{MatrixCoordinate, TraceMatrix, TraceStep, TracebackError, trace_path};
use std::collections::VecDeque;

/// A run of `length` gap symbols inserted before the symbol at `position`
/// of a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GapSegment {
    pub position: usize,
    pub length:   usize,
}

/// The outcome of a traceback: where the alignment begins and the gaps of
/// both sequences, ordered by position. Positions are absolute positions in
/// the full sequences.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Traceback {
    pub begin:       MatrixCoordinate,
    pub first_gaps:  Vec<GapSegment>,
    pub second_gaps: Vec<GapSegment>,
}

#[inline]
fn push_gap(gaps: &mut VecDeque<GapSegment>, position: usize) {
    match gaps.front_mut() {
        Some(front) if front.position == position => front.length += 1,
        _ => gaps.push_front(GapSegment { position, length: 1 }),
    }
}

/// Walks back from `end` to the terminal cell the alignment starts in.
///
/// A step up consumes a symbol of sequence 2 against a gap in sequence 1 at
/// the current column, a step left consumes a symbol of sequence 1 against a
/// gap in sequence 2 at the current row. The walk takes at most
/// `end.row + end.col` steps.
///
/// ## Errors
///
/// Fails if the walk leaves the matrix or its band, or if the matrix does not
/// store directions. Neither happens for a matrix filled by the DP sweep.
pub fn traceback<M: TraceMatrix + ?Sized>(matrix: &M, end: MatrixCoordinate) -> Result<Traceback, TracebackError> {
    let mut first_gaps = VecDeque::new();
    let mut second_gaps = VecDeque::new();

    let mut path = trace_path(matrix, end)?;
    #[allow(clippy::while_let_on_iterator)]
    while let Some(step) = path.next() {
        let position = path.position();
        match step? {
            TraceStep::Diagonal => {}
            TraceStep::Up => push_gap(&mut first_gaps, position.col),
            TraceStep::Left => push_gap(&mut second_gaps, position.row),
        }
    }

    Ok(Traceback {
        begin:       path.position(),
        first_gaps:  first_gaps.into(),
        second_gaps: second_gaps.into(),
    })
}
