#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::wildcard_imports,
    clippy::enum_glob_use
)]

/// Pairwise alignment: configuration, scoring, DP matrices and kernels.
pub mod alignment;
/// Data types exchanged with the alignment engine.
pub mod data;
/// Batch execution, sequential or on a worker pool.
pub mod execution;

/// Generate random rank-encoded sequences.
#[cfg(feature = "rand")]
pub mod generate;
/// Integer traits for score arithmetic.
pub mod math;
/// Lane vectors for the vectorised kernels.
pub mod simd;

mod private {
    pub trait Sealed {}
}

/// Common structures and traits re-exported
pub mod prelude {
    pub use crate::alignment::{
        AlignConfig, AlignmentResult, AllOutputs, Band, Blosum, FreeEndGaps, GapCost, GappedSequence, Method,
        PairwiseAlignment, ScoreAndEnd, ScoreOnly, ScoreType, ScoringScheme, SubstitutionMatrix,
    };
    pub use crate::data::{
        cigar::Cigar,
        mappings::{DNA_RANKS, DNA5_RANKS, PROTEIN_RANKS},
    };
    pub use crate::execution::align_pairwise;
    #[cfg(feature = "rand")]
    pub use crate::generate::rand_sequence;
}
