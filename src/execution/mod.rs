//! ## Running batches of alignments.
//!
//! [`align_pairwise`] configures the algorithm, validates every pair and
//! hands the batch to a [`BatchExecutor`]. How results come back depends on
//! the delivery protocol of the configuration:
//!
//! - [`Pull`] returns an [`AlignmentRange`], a lazy iterator yielding results
//!   in input order.
//! - [`Push`] passes every result to a callback as soon as it is computed,
//!   and returns once the batch is done.
//!
//! ```
//! use galign::{
//!     alignment::{AlignConfig, ScoreAndEnd, ScoringScheme},
//!     data::mappings::DNA_RANKS,
//!     execution::align_pairwise,
//! };
//!
//! let first = DNA_RANKS.encode(b"ACGTGATG");
//! let second = DNA_RANKS.encode(b"AGTGATACT");
//!
//! let config = AlignConfig::global()
//!     .scoring(ScoringScheme::match_mismatch(4, -5))
//!     .outputs::<ScoreAndEnd>();
//! let result = align_pairwise([(&first, &second)], config).unwrap().next().unwrap();
//! assert_eq!(result.end_positions(), (8, 9));
//! ```

mod executor;
mod handler;

pub use executor::*;
pub use handler::*;

use crate::{
    alignment::{AlignConfig, AlignmentError, AlignmentResult, Configured, OutputSelection, configure},
    private::Sealed,
};
use log::debug;

/// One pair of a batch with its position in the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexedPair<'a> {
    pub first:  &'a [u8],
    pub second: &'a [u8],
    pub index:  usize,
}

/// Anything that yields two rank-encoded sequences: a tuple of references
/// to sequences, or a reference to a tuple of sequences.
pub trait SequencePair<'a> {
    fn sequences(self) -> (&'a [u8], &'a [u8]);
}

impl<'a, A, B> SequencePair<'a> for (&'a A, &'a B)
where
    A: AsRef<[u8]> + ?Sized,
    B: AsRef<[u8]> + ?Sized,
{
    #[inline]
    fn sequences(self) -> (&'a [u8], &'a [u8]) {
        (self.0.as_ref(), self.1.as_ref())
    }
}

impl<'a, A, B> SequencePair<'a> for &'a (A, B)
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    #[inline]
    fn sequences(self) -> (&'a [u8], &'a [u8]) {
        (self.0.as_ref(), self.1.as_ref())
    }
}

/// How the results of a batch reach the caller.
pub trait Delivery<O: OutputSelection>: Sealed + Sized {
    /// What [`align_pairwise`] returns
    type Output<'a>;

    fn deliver(self, executor: BatchExecutor<'_, O>) -> Self::Output<'_>;
}

/// Results are pulled from a lazy iterator in input order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pull;

impl Sealed for Pull {}

impl<O: OutputSelection> Delivery<O> for Pull {
    type Output<'a> = AlignmentRange<'a, O>;

    #[inline]
    fn deliver(self, executor: BatchExecutor<'_, O>) -> AlignmentRange<'_, O> {
        AlignmentRange::new(executor)
    }
}

/// Results are pushed into a callback. With parallel execution the callback
/// is invoked from worker threads and the order is unspecified.
#[derive(Clone, Copy, Debug)]
pub struct Push<F>(pub(crate) F);

impl<F> Sealed for Push<F> {}

impl<O, F> Delivery<O> for Push<F>
where
    O: OutputSelection,
    F: Fn(AlignmentResult<O>) + Send + Sync,
{
    type Output<'a> = ();

    #[inline]
    fn deliver(self, executor: BatchExecutor<'_, O>) {
        executor.for_each(&self.0);
    }
}

/// Aligns every pair of `pairs` under `config`.
///
/// Pairs are numbered in input order, and these numbers are the sequence
/// ids of the results. Every pair is validated before the first alignment is
/// computed, so either all pairs are aligned or none.
///
/// ## Errors
///
/// Returns [`AlignmentError::Config`] if the configuration is incomplete or
/// inconsistent, and [`AlignmentError::Input`] if a pair cannot be aligned
/// under it.
pub fn align_pairwise<'a, I, O, D>(pairs: I, config: AlignConfig<O, D>) -> Result<D::Output<'a>, AlignmentError>
where
    I: IntoIterator,
    I::Item: SequencePair<'a>,
    O: OutputSelection,
    D: Delivery<O>, {
    let Configured { algorithm, delivery, .. } = configure(config)?;

    let pairs = pairs
        .into_iter()
        .enumerate()
        .map(|(index, pair)| {
            let (first, second) = pair.sequences();
            IndexedPair { first, second, index }
        })
        .collect::<Vec<_>>();
    for pair in &pairs {
        algorithm.validate(pair)?;
    }
    debug!("Aligning {} pairs with {:?}", pairs.len(), algorithm.traits());

    Ok(delivery.deliver(BatchExecutor::new(pairs, algorithm)))
}
