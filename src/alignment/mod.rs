//! Pairwise sequence alignment with affine gap costs.
//!
//! Sequences are slices of symbol ranks (see
//! [`ByteIndexMap`](crate::data::mappings::ByteIndexMap) for encoding text). An
//! [`AlignConfig`] selects the method, the scoring, an optional band and the
//! outputs, and [`align_pairwise`](crate::execution::align_pairwise) runs a
//! batch of pairs under it.
//!
//! The DP matrix has one column per symbol of sequence 1 plus one, and one
//! row per symbol of sequence 2 plus one. All positions are reported as
//! `(sequence 1, sequence 2)`.

mod aligned;
mod config;
mod configurator;
mod edit_distance;
mod errors;
mod kernel;
mod matrix;
mod outputs;
pub(crate) mod recursion;
pub(crate) mod scoring;
mod traceback;
mod tracker;

pub use aligned::*;
pub use config::*;
pub use configurator::*;
pub use errors::*;
pub use matrix::*;
pub use outputs::*;
pub use scoring::{Blosum, ScoringScheme, SubstitutionMatrix};
pub use traceback::*;

pub(crate) use edit_distance::EditDistanceAligner;
pub(crate) use kernel::{ScalarAligner, SimdAligner};
pub(crate) use recursion::{AffineCell, AffineGapRecursion, DpScore, VerticalCarry};
pub(crate) use scoring::{
    ScalarMatchMismatch, ScalarMatrix, ScoringProfile,
    simd::{SimdMatchMismatch, SimdMatrix, SimdScoringProfile},
};
pub(crate) use tracker::*;

#[cfg(test)]
mod test;
