//! Vectorised scoring schemes.
//!
//! A batch packs one pair per lane. Sequences shorter than the longest
//! sequence of the batch are filled up with padding symbols, and the schemes
//! here define how padding scores:
//!
//! - Global alignment uses a single padding rank with the highest bit set.
//!   It matches everything, so scores running through the padded region
//!   only grow along its diagonal. Every lane reads its result at its own
//!   last cell, which no padding precedes.
//! - Local alignment uses two different padding ranks for the two sequences,
//!   so any comparison involving padding mismatches and no optimum can be
//!   found in padded territory.

use super::{ScoringProfile, SubstitutionMatrix, convert_score};
use crate::{
    alignment::{ConfigError, ScoreType},
    math::ScoreInt,
    simd::Lanes,
};

/// A scoring profile over lanes that knows how padding is encoded.
pub(crate) trait SimdScoringProfile<T: ScoreInt, const N: usize>:
    ScoringProfile<Lanes<T, N>, Symbol = Lanes<T, N>> {
    /// The padding symbols for sequence 1 and sequence 2.
    fn padding(&self) -> (T, T);

    /// Packs a rank into a lane, if it does not collide with padding.
    fn pack(&self, rank: u8) -> Option<T>;
}

/// Match/mismatch scoring over lanes. Equality is decided on the XOR of the
/// two symbols, which lets the padding rank take part without branches.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SimdMatchMismatch<T: ScoreInt, const N: usize> {
    match_score:    Lanes<T, N>,
    mismatch_score: Lanes<T, N>,
    local:          bool,
}

impl<T: ScoreInt, const N: usize> SimdMatchMismatch<T, N> {
    pub(crate) fn new(
        match_score: i32, mismatch_score: i32, local: bool, score_type: ScoreType,
    ) -> Result<Self, ConfigError> {
        Ok(SimdMatchMismatch {
            match_score: Lanes::splat(convert_score(i64::from(match_score), score_type)?),
            mismatch_score: Lanes::splat(convert_score(i64::from(mismatch_score), score_type)?),
            local,
        })
    }
}

impl<T: ScoreInt, const N: usize> ScoringProfile<Lanes<T, N>> for SimdMatchMismatch<T, N> {
    type Symbol = Lanes<T, N>;
    type Column = Lanes<T, N>;

    #[inline]
    fn column_profile(&self, a: Lanes<T, N>) -> Lanes<T, N> {
        a
    }

    #[inline]
    fn score(&self, a: Lanes<T, N>, b: Lanes<T, N>) -> Lanes<T, N> {
        let difference = a.xor(b);
        let zero = Lanes::splat(T::ZERO);
        let is_match = if self.local {
            difference.simd_eq(zero)
        } else {
            // A single padding operand sets the sign bit
            difference.simd_le(zero)
        };
        Lanes::select(is_match, self.match_score, self.mismatch_score)
    }
}

impl<T: ScoreInt, const N: usize> SimdScoringProfile<T, N> for SimdMatchMismatch<T, N> {
    #[inline]
    fn padding(&self) -> (T, T) {
        if self.local {
            (T::MIN, T::MIN ^ T::ONE)
        } else {
            (T::MIN, T::MIN)
        }
    }

    #[inline]
    fn pack(&self, rank: u8) -> Option<T> {
        T::from_rank(rank)
    }
}

/// Substitution matrix scoring over lanes. The matrix is linearised and
/// extended by one row and column for the padding rank, which equals the
/// alphabet size.
#[derive(Clone, Debug)]
pub(crate) struct SimdMatrix<T: ScoreInt, const N: usize> {
    stride:       usize,
    padding_rank: T,
    table:        Vec<T>,
}

impl<T: ScoreInt, const N: usize> SimdMatrix<T, N> {
    pub(crate) fn new(matrix: &SubstitutionMatrix, local: bool, score_type: ScoreType) -> Result<Self, ConfigError> {
        let alphabet_size = matrix.alphabet_size();
        let padding_rank = u8::try_from(alphabet_size)
            .ok()
            .and_then(T::from_rank)
            .ok_or(ConfigError::AlphabetTooLarge {
                alphabet_size,
                score_type,
            })?;
        let padding_score = if local { -T::ONE.widen() } else { T::ONE.widen() };
        let padding_score = convert_score::<T>(padding_score, score_type)?;

        let stride = alphabet_size + 1;
        let mut table = Vec::with_capacity(stride * stride);
        for a in 0..stride {
            for b in 0..stride {
                if a == alphabet_size || b == alphabet_size {
                    table.push(padding_score);
                } else {
                    // a and b are below the alphabet size, which is at most 256
                    #[allow(clippy::cast_possible_truncation)]
                    let score = matrix.score(a as u8, b as u8);
                    table.push(convert_score(i64::from(score), score_type)?);
                }
            }
        }

        Ok(SimdMatrix {
            stride,
            padding_rank,
            table,
        })
    }
}

impl<T: ScoreInt, const N: usize> ScoringProfile<Lanes<T, N>> for SimdMatrix<T, N> {
    type Symbol = Lanes<T, N>;
    type Column = [usize; N];

    #[inline]
    fn column_profile(&self, a: Lanes<T, N>) -> [usize; N] {
        a.to_array().map(|rank| rank.as_index() * self.stride)
    }

    #[inline]
    fn score(&self, rows: [usize; N], b: Lanes<T, N>) -> Lanes<T, N> {
        let offsets = std::array::from_fn(|i| rows[i] + b.lane(i).as_index());
        Lanes::gather(&self.table, &offsets)
    }
}

impl<T: ScoreInt, const N: usize> SimdScoringProfile<T, N> for SimdMatrix<T, N> {
    #[inline]
    fn padding(&self) -> (T, T) {
        (self.padding_rank, self.padding_rank)
    }

    #[inline]
    fn pack(&self, rank: u8) -> Option<T> {
        T::from_rank(rank).filter(|&r| r < self.padding_rank)
    }
}
