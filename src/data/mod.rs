//! ## Data types exchanged with the alignment engine.
//!
//! The engine works on rank-encoded symbols: every sequence is a slice of
//! `u8` ranks in `0..alphabet_size`. [`ByteIndexMap`] converts between text
//! and ranks for the common alphabets, and [`Cigar`] carries alignments to and
//! from SAM-style tooling.
//!
//! [`ByteIndexMap`]: mappings::ByteIndexMap
//! [`Cigar`]: cigar::Cigar

/// CIGAR strings and their validation.
pub mod cigar;
/// Error traits shared by the crate's error types.
pub mod err;
/// Byte to rank mappings for rank-encoded sequences.
pub mod mappings;
pub mod matrices;
