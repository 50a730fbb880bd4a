//! The alignment configuration builder.
//!
//! An [`AlignConfig`] is a plain value describing one batch of alignments. It
//! is consumed exactly once by [`align_pairwise`], which hands it to the
//! [configurator](crate::alignment::configure).
//!
//! The two type parameters make two choices visible to the compiler:
//!
//! - `O` is the [`OutputSelection`]. Only the accessors of requested outputs
//!   exist on the produced [`AlignmentResult`]s.
//! - `D` is the delivery protocol: [`Pull`] (the default) yields a lazy
//!   iterator of results, [`Push`] hands every result to a callback instead.
//!
//! [`align_pairwise`]: crate::execution::align_pairwise
//! [`AlignmentResult`]: crate::alignment::AlignmentResult

use crate::{
    alignment::{AlignmentResult, AllOutputs, OutputSelection, ScoringScheme},
    execution::{Pull, Push},
};
use std::{fmt, marker::PhantomData};

/// Which ends of the two sequences may be left unaligned at no cost.
///
/// Sequence 1 spans the columns of the DP matrix, sequence 2 its rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
pub struct FreeEndGaps {
    pub sequence1_leading:  bool,
    pub sequence1_trailing: bool,
    pub sequence2_leading:  bool,
    pub sequence2_trailing: bool,
}

impl FreeEndGaps {
    /// Every end gap is penalised (classic global alignment).
    pub const NONE: Self = FreeEndGaps {
        sequence1_leading:  false,
        sequence1_trailing: false,
        sequence2_leading:  false,
        sequence2_trailing: false,
    };

    /// No end gap is penalised (overlap alignment).
    pub const ALL: Self = FreeEndGaps {
        sequence1_leading:  true,
        sequence1_trailing: true,
        sequence2_leading:  true,
        sequence2_trailing: true,
    };

    /// Sequence 2 must be aligned entirely, sequence 1 may overhang on both
    /// sides (search of sequence 2 within sequence 1).
    pub const SEQUENCE1_FREE: Self = FreeEndGaps {
        sequence1_leading:  true,
        sequence1_trailing: true,
        sequence2_leading:  false,
        sequence2_trailing: false,
    };
}

/// The alignment method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
pub enum Method {
    /// End-to-end alignment, optionally with free end gaps.
    Global(FreeEndGaps),
    /// Best scoring alignment of any two substrings.
    Local,
}

impl Default for Method {
    #[inline]
    fn default() -> Self {
        Method::Global(FreeEndGaps::NONE)
    }
}

impl Method {
    #[inline]
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Method::Local)
    }

    /// The free end gaps of the method. A local alignment behaves as if all
    /// ends were free.
    #[inline]
    #[must_use]
    pub const fn free_end_gaps(&self) -> FreeEndGaps {
        match self {
            Method::Global(free) => *free,
            Method::Local => FreeEndGaps::ALL,
        }
    }
}

/// Affine gap costs. A gap of length `n` costs `open + n * extend`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
pub struct GapCost {
    pub open:   i32,
    pub extend: i32,
}

impl GapCost {
    /// The costs used when none are configured.
    pub const DEFAULT: Self = GapCost { open: -10, extend: -1 };

    /// Linear gap costs of the unit edit distance.
    pub const EDIT: Self = GapCost { open: 0, extend: -1 };

    #[inline]
    #[must_use]
    pub const fn new(open: i32, extend: i32) -> Self {
        GapCost { open, extend }
    }

    /// The cost of a gap of `length` symbols.
    #[inline]
    #[must_use]
    pub fn cost(&self, length: usize) -> i64 {
        if length == 0 {
            0
        } else {
            i64::from(self.open) + i64::from(self.extend) * i64::try_from(length).unwrap_or(i64::MAX)
        }
    }
}

impl Default for GapCost {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A diagonal strip of the DP matrix. Diagonal `d` holds the cells whose
/// column minus row equals `d`, so positive diagonals lie above the main
/// diagonal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
pub struct Band {
    pub lower: isize,
    pub upper: isize,
}

impl Band {
    /// Creates a band. Its validity is checked when the configuration is
    /// consumed.
    #[inline]
    #[must_use]
    pub const fn new(lower: isize, upper: isize) -> Self {
        Band { lower, upper }
    }
}

/// The numeric width of all score arithmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
pub enum ScoreType {
    I8,
    I16,
    #[default]
    I32,
    I64,
}

impl fmt::Display for ScoreType {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ScoreType::I8 => "i8",
            ScoreType::I16 => "i16",
            ScoreType::I32 => "i32",
            ScoreType::I64 => "i64",
        };
        write!(f, "{name}")
    }
}

/// Parallel execution settings. A thread count must be given.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Parallel {
    pub thread_count: Option<usize>,
}

impl Parallel {
    /// Parallel execution without a thread count, which the configurator
    /// rejects.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Parallel { thread_count: None }
    }

    #[inline]
    #[must_use]
    pub const fn with_threads(thread_count: usize) -> Self {
        Parallel {
            thread_count: Some(thread_count),
        }
    }
}

/// A configuration for a batch of pairwise alignments.
///
/// ```
/// use galign::alignment::{AlignConfig, GapCost, ScoreOnly, ScoringScheme};
///
/// let config = AlignConfig::global()
///     .scoring(ScoringScheme::match_mismatch(4, -5))
///     .gap_cost(GapCost::new(-10, -1))
///     .outputs::<ScoreOnly>();
/// # let _ = config;
/// ```
#[derive(Clone, Debug)]
pub struct AlignConfig<O: OutputSelection = AllOutputs, D = Pull> {
    pub(crate) method:     Method,
    pub(crate) gap_cost:   Option<GapCost>,
    pub(crate) scoring:    Option<ScoringScheme>,
    pub(crate) band:       Option<Band>,
    pub(crate) max_errors: Option<usize>,
    pub(crate) score_type: Option<ScoreType>,
    pub(crate) vectorised: bool,
    pub(crate) parallel:   Option<Parallel>,
    pub(crate) delivery:   D,
    outputs:               PhantomData<O>,
}

impl Default for AlignConfig {
    #[inline]
    fn default() -> Self {
        AlignConfig {
            method:     Method::default(),
            gap_cost:   None,
            scoring:    None,
            band:       None,
            max_errors: None,
            score_type: None,
            vectorised: false,
            parallel:   None,
            delivery:   Pull,
            outputs:    PhantomData,
        }
    }
}

impl AlignConfig {
    /// A global alignment without free end gaps.
    #[inline]
    #[must_use]
    pub fn global() -> Self {
        Self::default()
    }

    /// A local alignment.
    #[inline]
    #[must_use]
    pub fn local() -> Self {
        Self::default().method(Method::Local)
    }

    /// The unit edit distance: global, match 0, mismatch -1 and linear gaps
    /// of -1. The reported score is the negated edit distance.
    #[inline]
    #[must_use]
    pub fn edit_distance() -> Self {
        Self::default().scoring(ScoringScheme::edit_distance()).gap_cost(GapCost::EDIT)
    }
}

impl<O: OutputSelection, D> AlignConfig<O, D> {
    #[inline]
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Makes the alignment global with the given free end gaps.
    #[inline]
    #[must_use]
    pub fn free_end_gaps(self, free: FreeEndGaps) -> Self {
        self.method(Method::Global(free))
    }

    #[inline]
    #[must_use]
    pub fn gap_cost(mut self, gap_cost: GapCost) -> Self {
        self.gap_cost = Some(gap_cost);
        self
    }

    #[inline]
    #[must_use]
    pub fn scoring(mut self, scoring: ScoringScheme) -> Self {
        self.scoring = Some(scoring);
        self
    }

    #[inline]
    #[must_use]
    pub fn band(mut self, band: Band) -> Self {
        self.band = Some(band);
        self
    }

    /// Only reports alignments with at most `max_errors` errors under the
    /// unit edit distance. Pairs without such an alignment give results for
    /// which [`AlignmentResult::is_hit`] is false.
    #[inline]
    #[must_use]
    pub fn max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = Some(max_errors);
        self
    }

    #[inline]
    #[must_use]
    pub fn score_type(mut self, score_type: ScoreType) -> Self {
        self.score_type = Some(score_type);
        self
    }

    /// Packs several pairs into the lanes of one vector and aligns them
    /// together.
    #[inline]
    #[must_use]
    pub fn vectorised(mut self) -> Self {
        self.vectorised = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn parallel(mut self, parallel: Parallel) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Shorthand for `parallel(Parallel::with_threads(thread_count))`.
    #[inline]
    #[must_use]
    pub fn threads(self, thread_count: usize) -> Self {
        self.parallel(Parallel::with_threads(thread_count))
    }

    /// Selects which outputs are computed and accessible.
    #[inline]
    #[must_use]
    pub fn outputs<O2: OutputSelection>(self) -> AlignConfig<O2, D> {
        AlignConfig {
            method:     self.method,
            gap_cost:   self.gap_cost,
            scoring:    self.scoring,
            band:       self.band,
            max_errors: self.max_errors,
            score_type: self.score_type,
            vectorised: self.vectorised,
            parallel:   self.parallel,
            delivery:   self.delivery,
            outputs:    PhantomData,
        }
    }

    /// Switches to the push protocol: every result is passed to `callback`,
    /// possibly from worker threads and in no particular order.
    #[inline]
    #[must_use]
    pub fn on_result<F>(self, callback: F) -> AlignConfig<O, Push<F>>
    where
        F: Fn(AlignmentResult<O>) + Send + Sync, {
        AlignConfig {
            method:     self.method,
            gap_cost:   self.gap_cost,
            scoring:    self.scoring,
            band:       self.band,
            max_errors: self.max_errors,
            score_type: self.score_type,
            vectorised: self.vectorised,
            parallel:   self.parallel,
            delivery:   Push(callback),
            outputs:    PhantomData,
        }
    }
}
