//! Bit-parallel unit edit distance.
//!
//! Myers' algorithm in the block formulation of Hyyrö: sequence 2 is split
//! into 64-symbol blocks, and every column of the DP matrix is advanced one
//! block at a time from bit vectors of the vertical score differences. Only
//! the score and the end position can be computed this way.

use crate::{
    alignment::{MatrixCoordinate, NoTrace, OutputFlags, ResultData, kernel::collect_result},
    execution::IndexedPair,
};

const WORD_SIZE: usize = 64;

/// The vertical differences of one block: bit `i` of `positive` (`negative`)
/// is set if the score of row `i` is one more (less) than the row above.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Block {
    positive: u64,
    negative: u64,
}

/// The horizontal differences leaving one block, before they are shifted
/// into place for the next column.
#[derive(Clone, Copy, Debug)]
struct Horizontal {
    positive: u64,
    negative: u64,
}

impl Horizontal {
    /// The horizontal difference of row `bit` of the block.
    #[inline]
    #[allow(clippy::cast_possible_wrap)]
    fn delta(&self, bit: usize) -> i64 {
        ((self.positive >> bit) & 1) as i64 - ((self.negative >> bit) & 1) as i64
    }
}

impl Block {
    const INITIAL: Self = Block {
        positive: u64::MAX,
        negative: 0,
    };

    /// Advances the block by one column. `matches` has a bit set for every
    /// row equal to the symbol of the column, and `carry_in` is the
    /// horizontal difference entering the top row of the block.
    #[inline]
    fn advance(&mut self, matches: u64, carry_in: i64) -> Horizontal {
        let carry_negative = u64::from(carry_in < 0);
        let carry_positive = u64::from(carry_in > 0);

        let vertical = matches | self.negative;
        let matches = matches | carry_negative;
        let horizontal = (((matches & self.positive).wrapping_add(self.positive)) ^ self.positive) | matches;
        let positive = self.negative | !(horizontal | self.positive);
        let negative = self.positive & horizontal;

        let shifted_positive = (positive << 1) | carry_positive;
        let shifted_negative = (negative << 1) | carry_negative;
        self.positive = shifted_negative | !(vertical | shifted_positive);
        self.negative = shifted_positive & vertical;

        Horizontal { positive, negative }
    }
}

/// Aligns pairs under the unit edit distance, either globally or with free
/// ends of sequence 1.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EditDistanceAligner {
    pub(crate) semi_global: bool,
    pub(crate) max_errors:  Option<usize>,
    pub(crate) outputs:     OutputFlags,
    /// The lowest score representable in the configured score type
    pub(crate) floor:       i64,
}

impl EditDistanceAligner {
    pub(crate) fn align(&self, pair: &IndexedPair<'_>) -> ResultData {
        let Some((distance, column)) = edit_distance(pair.first, pair.second, self.semi_global, self.max_errors)
        else {
            return ResultData::missed(pair, self.outputs);
        };
        let score = (-i64::try_from(distance).unwrap_or(i64::MAX)).max(self.floor);
        let end = MatrixCoordinate::new(pair.second.len(), column);
        collect_result(pair, self.outputs, score, end, None::<&NoTrace>)
    }
}

#[inline]
fn shift(score: usize, delta: i64) -> usize {
    match delta {
        1 => score + 1,
        -1 => score - 1,
        _ => score,
    }
}

/// The edit distance of `seq1` and `seq2`, and the column it ends in. With
/// `semi_global`, `seq2` may start and end anywhere within `seq1`, and the
/// last of the best columns is reported.
///
/// Returns `None` if the distance exceeds `max_errors`. Blocks whose cells
/// all exceed the bound are not advanced: only the blocks down to the last
/// active one are computed, and the next block joins once the cell above it
/// is within the bound (Ukkonen's cutoff).
pub(crate) fn edit_distance(
    seq1: &[u8], seq2: &[u8], semi_global: bool, max_errors: Option<usize>,
) -> Option<(usize, usize)> {
    let k = max_errors.unwrap_or(usize::MAX);
    let m = seq2.len();
    let n = seq1.len();
    if m == 0 {
        let (distance, column) = if semi_global { (0, n) } else { (n, n) };
        return (distance <= k).then_some((distance, column));
    }

    let blocks = m.div_ceil(WORD_SIZE);
    let alphabet = seq1.iter().chain(seq2).copied().max().map_or(1, |r| usize::from(r) + 1);
    let mut equalities = vec![0u64; alphabet * blocks];
    for (i, &rank) in seq2.iter().enumerate() {
        equalities[usize::from(rank) * blocks + i / WORD_SIZE] |= 1 << (i % WORD_SIZE);
    }

    let last_bit = (m - 1) % WORD_SIZE;
    let bottom_bit = |b: usize| if b + 1 == blocks { last_bit } else { WORD_SIZE - 1 };
    let top_carry = i64::from(!semi_global);

    let mut state = vec![Block::INITIAL; blocks];
    // The score in the bottom row of each block, kept for the active blocks
    let mut scores: Vec<usize> = (1..=blocks).map(|b| (b * WORD_SIZE).min(m)).collect();
    let mut active = (k / WORD_SIZE).min(blocks - 1);

    let mut best = (semi_global && active + 1 == blocks && m <= k).then_some((m, 0));
    for (column, &rank) in seq1.iter().enumerate() {
        let profile = &equalities[usize::from(rank) * blocks..][..blocks];
        let mut carry = top_carry;
        for (b, (block, score)) in state.iter_mut().zip(&mut scores).enumerate().take(active + 1) {
            let horizontal = block.advance(profile[b], carry);
            *score = shift(*score, horizontal.delta(bottom_bit(b)));
            carry = horizontal.delta(WORD_SIZE - 1);
        }

        let previous = shift(scores[active], -carry);
        if active + 1 < blocks && previous <= k && ((profile[active + 1] & 1) == 1 || carry < 0) {
            // The block below starts from the largest scores it could have had
            active += 1;
            state[active] = Block::INITIAL;
            let horizontal = state[active].advance(profile[active], carry);
            scores[active] = shift(previous + bottom_bit(active) + 1, horizontal.delta(bottom_bit(active)));
        } else {
            while scores[active] >= k.saturating_add(bottom_bit(active) + 1) {
                if active > 0 {
                    active -= 1;
                } else if semi_global {
                    break;
                } else {
                    return None;
                }
            }
        }

        let score = scores[active];
        if semi_global && active + 1 == blocks && score <= k && best.is_none_or(|(best, _)| score <= best) {
            best = Some((score, column + 1));
        }
    }

    if semi_global {
        best
    } else {
        (active + 1 == blocks && scores[active] <= k).then_some((scores[active], n))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[cfg(feature = "rand")]
    use crate::generate::rand_pairs;

    fn reference(seq1: &[u8], seq2: &[u8], semi_global: bool) -> usize {
        let mut previous: Vec<usize> = (0..=seq2.len()).collect();
        let mut best = previous[seq2.len()];
        for (j, &a) in seq1.iter().enumerate() {
            let mut current = vec![if semi_global { 0 } else { j + 1 }; seq2.len() + 1];
            for (i, &b) in seq2.iter().enumerate() {
                current[i + 1] = (previous[i] + usize::from(a != b))
                    .min(previous[i + 1] + 1)
                    .min(current[i] + 1);
            }
            best = best.min(current[seq2.len()]);
            previous = current;
        }
        if semi_global { best } else { previous[seq2.len()] }
    }

    #[test]
    fn small_cases() {
        assert_eq!(edit_distance(b"kitten", b"sitting", false, None), Some((3, 6)));
        assert_eq!(edit_distance(b"", b"abc", false, None), Some((3, 0)));
        assert_eq!(edit_distance(b"abc", b"", false, None), Some((3, 3)));
        assert_eq!(edit_distance(b"xxabcxx", b"abc", true, None), Some((0, 5)));
        assert_eq!(edit_distance(b"abcabc", b"abc", true, None), Some((0, 6)));
    }

    #[test]
    fn error_bound() {
        let distance = |seq1: &[u8], seq2: &[u8], semi_global, max_errors| {
            edit_distance(seq1, seq2, semi_global, Some(max_errors)).map(|(d, _)| d)
        };

        assert_eq!(distance(b"AACCGGTTAACCGGTT", b"ACGTACGTA", true, 255), Some(5));
        assert_eq!(distance(b"AACCGGTTAACCGGTT", b"ACGTACGTA", true, 5), Some(5));
        assert_eq!(distance(b"AACCGGTTAACCGGTT", b"ACGTACGTA", true, 2), None);
        assert_eq!(distance(b"ACGTACGTA", b"AACCGGTTAACCGGTT", true, 255), Some(8));
        assert_eq!(distance(b"AACCGGTAAACCGG", b"ACGTACGTA", true, 4), Some(4));
        assert_eq!(distance(b"AACCGGTAAACCGG", b"ACGTACGTA", true, 3), None);
        assert_eq!(distance(b"AACCGGTAAACCGG", b"AC", true, 0), Some(0));
        assert_eq!(distance(b"AACCGGTAAACCGG", b"", true, 0), Some(0));
        assert_eq!(distance(b"", b"AACCGGTTAACCGGTT", true, 255), Some(16));
        assert_eq!(distance(b"", b"AACCGGTTAACCGGTT", true, 5), None);
        assert_eq!(distance(b"", b"", true, 0), Some(0));

        assert_eq!(distance(b"AACCGGTTAACCGGTT", b"ACGTACGTA", false, 255), Some(8));
        assert_eq!(distance(b"AACCGGTTAACCGGTT", b"ACGTACGTA", false, 8), Some(8));
        assert_eq!(distance(b"AACCGGTTAACCGGTT", b"ACGTACGTA", false, 7), None);
        assert_eq!(distance(b"abc", b"", false, 2), None);
    }

    #[test]
    fn error_bound_across_blocks() {
        let seq2: Vec<u8> = (0..300).map(|i| (i * 7 % 4) as u8).collect();
        let mut seq1 = vec![3; 40];
        seq1.extend(seq2.iter().enumerate().filter(|&(i, _)| i % 50 != 10).map(|(_, &r)| r));
        seq1.extend([2; 40]);

        // Six deletions from seq2, and the flanks of seq1 are free
        assert_eq!(edit_distance(&seq1, &seq2, true, None), Some((6, 334)));
        assert_eq!(edit_distance(&seq1, &seq2, true, Some(6)), Some((6, 334)));
        assert_eq!(edit_distance(&seq1, &seq2, true, Some(5)), None);
    }

    #[cfg(feature = "rand")]
    #[test]
    fn error_bound_agrees_with_the_unbounded_distance() {
        for (seq1, seq2) in rand_pairs(4, 0..150, 40, 29) {
            for semi_global in [false, true] {
                let unbounded = edit_distance(&seq1, &seq2, semi_global, None);
                for max_errors in [0, 1, 3, 8, 20, 70] {
                    assert_eq!(
                        edit_distance(&seq1, &seq2, semi_global, Some(max_errors)),
                        unbounded.filter(|&(d, _)| d <= max_errors),
                        "{seq1:?} {seq2:?} {max_errors}"
                    );
                }
            }
        }
    }

    #[cfg(feature = "rand")]
    #[test]
    fn matches_the_quadratic_recursion() {
        for (seq1, seq2) in rand_pairs(4, 0..200, 50, 17) {
            for semi_global in [false, true] {
                assert_eq!(
                    edit_distance(&seq1, &seq2, semi_global, None).map(|(d, _)| d),
                    Some(reference(&seq1, &seq2, semi_global)),
                    "{seq1:?} {seq2:?}"
                );
            }
        }
    }
}
