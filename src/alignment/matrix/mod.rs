//! Storage for the DP sweep.
//!
//! The sweep runs column by column over a virtual `(len2 + 1) × (len1 + 1)`
//! matrix whose columns belong to sequence 1 and whose rows belong to
//! sequence 2. Scores only ever need the previous column, so they live in a
//! [`ScoreMatrixSingleColumn`]. Directions are only stored when a traceback
//! will follow, in a [`TraceMatrixFull`] or, for banded alignments, a
//! [`TraceMatrixBanded`]. Otherwise the [`CoordinateMatrix`] alone tells the
//! sweep which cells exist.

mod band;
mod coordinate;
mod score;
mod trace;

pub use band::*;
pub use coordinate::*;
pub(crate) use score::*;
pub use trace::*;

#[cfg(test)]
mod test;
