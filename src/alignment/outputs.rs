//! Type-level selection of the alignment outputs.
//!
//! The outputs to compute are part of the type of a configuration, and the
//! [`AlignmentResult`]s it produces only offer accessors for those outputs.
//! Asking for anything else is rejected by the compiler:
//!
//! ```compile_fail
//! use galign::{
//!     alignment::{AlignConfig, ScoreOnly, ScoringScheme},
//!     execution::align_pairwise,
//! };
//!
//! let pairs = [(vec![0u8, 1, 2], vec![0u8, 2])];
//! let config = AlignConfig::global()
//!     .scoring(ScoringScheme::match_mismatch(4, -5))
//!     .outputs::<ScoreOnly>();
//! for result in align_pairwise(&pairs, config).unwrap() {
//!     let _ = result.alignment();
//! }
//! ```
//!
//! whereas the score is available:
//!
//! ```
//! use galign::{
//!     alignment::{AlignConfig, ScoreOnly, ScoringScheme},
//!     execution::align_pairwise,
//! };
//!
//! let pairs = [(vec![0u8, 1, 2], vec![0u8, 2])];
//! let config = AlignConfig::global()
//!     .scoring(ScoringScheme::match_mismatch(4, -5))
//!     .outputs::<ScoreOnly>();
//! for result in align_pairwise(&pairs, config).unwrap() {
//!     assert_eq!(result.score(), -3);
//! }
//! ```

use crate::{alignment::PairwiseAlignment, execution::IndexedPair, private::Sealed};
use std::{fmt, marker::PhantomData};

/// The runtime view of an [`OutputSelection`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct OutputFlags {
    pub score:        bool,
    pub begin:        bool,
    pub end:          bool,
    pub alignment:    bool,
    pub sequence1_id: bool,
    pub sequence2_id: bool,
}

impl OutputFlags {
    /// Whether the outputs can only be computed with a traceback.
    #[inline]
    #[must_use]
    pub const fn needs_traceback(&self) -> bool {
        self.begin || self.alignment
    }
}

/// A set of requested outputs. Implemented by [`Outputs`] only.
pub trait OutputSelection: Sealed + Copy + Default + fmt::Debug + Send + Sync + 'static {
    const SCORE: bool;
    const BEGIN: bool;
    const END: bool;
    const ALIGNMENT: bool;
    const SEQUENCE1_ID: bool;
    const SEQUENCE2_ID: bool;

    const FLAGS: OutputFlags = OutputFlags {
        score:        Self::SCORE,
        begin:        Self::BEGIN,
        end:          Self::END,
        alignment:    Self::ALIGNMENT,
        sequence1_id: Self::SEQUENCE1_ID,
        sequence2_id: Self::SEQUENCE2_ID,
    };
}

/// Requests the outputs whose flag is `true`: the score, the begin and end
/// positions, the alignment itself and the ids of both sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Outputs<
    const SCORE: bool,
    const BEGIN: bool,
    const END: bool,
    const ALIGNMENT: bool,
    const ID1: bool,
    const ID2: bool,
>;

impl<const S: bool, const B: bool, const E: bool, const A: bool, const I1: bool, const I2: bool> Sealed
    for Outputs<S, B, E, A, I1, I2>
{
}

impl<const S: bool, const B: bool, const E: bool, const A: bool, const I1: bool, const I2: bool> OutputSelection
    for Outputs<S, B, E, A, I1, I2>
{
    const SCORE: bool = S;
    const BEGIN: bool = B;
    const END: bool = E;
    const ALIGNMENT: bool = A;
    const SEQUENCE1_ID: bool = I1;
    const SEQUENCE2_ID: bool = I2;
}

/// Every output.
pub type AllOutputs = Outputs<true, true, true, true, true, true>;
/// The score alone, which never needs a trace matrix.
pub type ScoreOnly = Outputs<true, false, false, false, false, false>;
/// The score and where the alignment ends.
pub type ScoreAndEnd = Outputs<true, false, true, false, false, false>;

/// The untyped contents of a result. Fields are `Some` exactly for the
/// requested outputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ResultData {
    pub(crate) sequence1_id: Option<usize>,
    pub(crate) sequence2_id: Option<usize>,
    pub(crate) score:        Option<i64>,
    pub(crate) begin:        Option<(usize, usize)>,
    pub(crate) end:          Option<(usize, usize)>,
    pub(crate) alignment:    Option<PairwiseAlignment>,
    pub(crate) missed:       bool,
}

impl ResultData {
    /// The result of a pair that exceeded the error bound.
    pub(crate) fn missed(pair: &IndexedPair<'_>, outputs: OutputFlags) -> Self {
        let sink = (pair.first.len(), pair.second.len());
        ResultData {
            sequence1_id: outputs.sequence1_id.then_some(pair.index),
            sequence2_id: outputs.sequence2_id.then_some(pair.index),
            score:        outputs.score.then_some(i64::MIN),
            begin:        outputs.begin.then_some(sink),
            end:          outputs.end.then_some(sink),
            alignment:    outputs.alignment.then(PairwiseAlignment::default),
            missed:       true,
        }
    }
}

/// The outcome of aligning one pair. Positions are given as
/// `(sequence 1 position, sequence 2 position)`.
#[derive(Clone, PartialEq, Eq)]
pub struct AlignmentResult<O: OutputSelection> {
    data:    ResultData,
    outputs: PhantomData<O>,
}

macro_rules! requested {
    ($field:expr) => {
        match &$field {
            Some(value) => value,
            None => unreachable!("requested outputs are always filled in"),
        }
    };
}

impl<O: OutputSelection> AlignmentResult<O> {
    #[inline]
    pub(crate) fn new(data: ResultData) -> Self {
        AlignmentResult {
            data,
            outputs: PhantomData,
        }
    }

    /// Whether the pair aligned within the configured error bound. Always
    /// `true` without a bound.
    ///
    /// A pair that missed has a score of [`i64::MIN`], begin and end
    /// positions at the end of both sequences, and an empty alignment.
    #[inline]
    #[must_use]
    pub fn is_hit(&self) -> bool {
        !self.data.missed
    }
}

impl<const B: bool, const E: bool, const A: bool, const I1: bool, const I2: bool>
    AlignmentResult<Outputs<true, B, E, A, I1, I2>>
{
    /// The score of the optimal alignment.
    #[inline]
    #[must_use]
    pub fn score(&self) -> i64 {
        *requested!(self.data.score)
    }
}

impl<const S: bool, const E: bool, const A: bool, const I1: bool, const I2: bool>
    AlignmentResult<Outputs<S, true, E, A, I1, I2>>
{
    /// The positions of the first aligned symbols.
    #[inline]
    #[must_use]
    pub fn begin_positions(&self) -> (usize, usize) {
        *requested!(self.data.begin)
    }
}

impl<const S: bool, const B: bool, const A: bool, const I1: bool, const I2: bool>
    AlignmentResult<Outputs<S, B, true, A, I1, I2>>
{
    /// The positions one past the last aligned symbols.
    #[inline]
    #[must_use]
    pub fn end_positions(&self) -> (usize, usize) {
        *requested!(self.data.end)
    }
}

impl<const S: bool, const B: bool, const E: bool, const I1: bool, const I2: bool>
    AlignmentResult<Outputs<S, B, E, true, I1, I2>>
{
    #[inline]
    #[must_use]
    pub fn alignment(&self) -> &PairwiseAlignment {
        requested!(self.data.alignment)
    }

    /// Takes the alignment out of the result.
    #[inline]
    #[must_use]
    pub fn into_alignment(self) -> PairwiseAlignment {
        match self.data.alignment {
            Some(alignment) => alignment,
            None => unreachable!("requested outputs are always filled in"),
        }
    }
}

impl<const S: bool, const B: bool, const E: bool, const A: bool, const I2: bool>
    AlignmentResult<Outputs<S, B, E, A, true, I2>>
{
    /// The index of the pair within the batch.
    #[inline]
    #[must_use]
    pub fn sequence1_id(&self) -> usize {
        *requested!(self.data.sequence1_id)
    }
}

impl<const S: bool, const B: bool, const E: bool, const A: bool, const I1: bool>
    AlignmentResult<Outputs<S, B, E, A, I1, true>>
{
    /// The index of the pair within the batch.
    #[inline]
    #[must_use]
    pub fn sequence2_id(&self) -> usize {
        *requested!(self.data.sequence2_id)
    }
}

impl<O: OutputSelection> fmt::Debug for AlignmentResult<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("AlignmentResult");
        if let Some(id) = self.data.sequence1_id {
            s.field("sequence1_id", &id);
        }
        if let Some(id) = self.data.sequence2_id {
            s.field("sequence2_id", &id);
        }
        if let Some(score) = self.data.score {
            s.field("score", &score);
        }
        if let Some(begin) = self.data.begin {
            s.field("begin", &begin);
        }
        if let Some(end) = self.data.end {
            s.field("end", &end);
        }
        if let Some(alignment) = &self.data.alignment {
            s.field("alignment", alignment);
        }
        if self.data.missed {
            s.field("missed", &true);
        }
        s.finish()
    }
}
