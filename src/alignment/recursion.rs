//! The affine gap recursion of Gotoh.
//!
//! Every cell of the DP matrix holds three scores: the optimal score `M`,
//! the score `H` of a horizontal gap leaving the cell to the right, and the
//! score `V` of a vertical gap leaving it downwards. With `open` the cost of
//! the first gap symbol (gap open plus gap extend) and `extend` the cost of
//! every further one, an inner cell computes
//!
//! ```text
//! M = max(M[r-1][c-1] + s(a, b), V[r-1][c], H[r][c-1])
//! H = max(M + open, H[r][c-1] + extend)
//! V = max(M + open, V[r-1][c] + extend)
//! ```
//!
//! The same code runs on scalars and on lane vectors through [`DpScore`].

use crate::{
    alignment::{TraceDirections, TraceWord},
    math::ScoreInt,
    simd::{LaneMask, Lanes},
};

/// The arithmetic of the DP sweep. Implemented by the score integers and by
/// lane vectors of them, in which case every operation is lane-wise.
pub(crate) trait DpScore: Copy + Send + Sync + 'static {
    type Scalar: ScoreInt;
    type Mask: Copy;
    type Trace: TraceWord<Mask = Self::Mask>;

    fn splat(value: Self::Scalar) -> Self;

    /// Saturating addition.
    #[must_use]
    fn add(self, other: Self) -> Self;

    #[must_use]
    fn max(self, other: Self) -> Self;

    fn eq(self, other: Self) -> Self::Mask;

    fn gt(self, other: Self) -> Self::Mask;
}

macro_rules! impl_dp_score {
    { $($ty:ty),* } => {
        $(
        impl DpScore for $ty {
            type Scalar = $ty;
            type Mask = bool;
            type Trace = TraceDirections;

            #[inline]
            fn splat(value: $ty) -> Self {
                value
            }

            #[inline]
            fn add(self, other: Self) -> Self {
                self.saturating_add(other)
            }

            #[inline]
            fn max(self, other: Self) -> Self {
                Ord::max(self, other)
            }

            #[inline]
            fn eq(self, other: Self) -> bool {
                self == other
            }

            #[inline]
            fn gt(self, other: Self) -> bool {
                self > other
            }
        } )*
    }
}

impl_dp_score! {i8, i16, i32, i64}

impl<T: ScoreInt, const N: usize> DpScore for Lanes<T, N> {
    type Scalar = T;
    type Mask = LaneMask<N>;
    type Trace = Lanes<u8, N>;

    #[inline]
    fn splat(value: T) -> Self {
        Lanes::splat(value)
    }

    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        self.simd_max(other)
    }

    #[inline]
    fn eq(self, other: Self) -> LaneMask<N> {
        self.simd_eq(other)
    }

    #[inline]
    fn gt(self, other: Self) -> LaneMask<N> {
        other.simd_lt(self)
    }
}

/// The result of one cell: its optimal score, the horizontal gap score
/// handed to the cell on its right, and, if the sweep records directions,
/// the trace of the cell and the open bit of that horizontal gap.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AffineCell<S: DpScore> {
    pub(crate) optimal:         S,
    pub(crate) horizontal:      S,
    pub(crate) trace:           S::Trace,
    pub(crate) horizontal_open: S::Trace,
}

/// The vertical gap score handed from a cell to the one below it, together
/// with its open bit. Only one value is alive per column, so the sweep
/// threads it through the column instead of storing a vertical column.
#[derive(Clone, Copy, Debug)]
pub(crate) struct VerticalCarry<S: DpScore> {
    pub(crate) score: S,
    pub(crate) open:  S::Trace,
}

impl<S: DpScore> VerticalCarry<S> {
    #[inline]
    pub(crate) fn new(score: S) -> Self {
        VerticalCarry {
            score,
            open: S::Trace::default(),
        }
    }
}

/// The recursion with its gap costs and initialisation rules bound.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AffineGapRecursion<S: DpScore> {
    gap_open:          S,
    gap_extend:        S,
    first_row_free:    bool,
    first_column_free: bool,
    local:             bool,
    lowest_viable:     S,
}

impl<S: DpScore> AffineGapRecursion<S> {
    /// `gap_open` is the score of a gap of length one, `gap_extend` the score
    /// of every further gap symbol. A free first row lets sequence 1 start
    /// with an unpenalised overhang, a free first column does the same for
    /// sequence 2. Local alignments never drop below zero.
    pub(crate) fn new(
        gap_open: S::Scalar, gap_extend: S::Scalar, first_row_free: bool, first_column_free: bool, local: bool,
    ) -> Self {
        let lowest_viable = <S::Scalar as ScoreInt>::MIN.sat_sub(gap_open.sat_add(gap_extend));
        AffineGapRecursion {
            gap_open: S::splat(gap_open),
            gap_extend: S::splat(gap_extend),
            first_row_free,
            first_column_free,
            local,
            lowest_viable: S::splat(lowest_viable),
        }
    }

    /// The score of cells that cannot be reached. Subtracting one more gap
    /// from it cannot underflow.
    #[inline]
    pub(crate) fn lowest_viable_score(&self) -> S {
        self.lowest_viable
    }

    #[inline]
    fn zero() -> S {
        S::splat(<S::Scalar as ScoreInt>::ZERO)
    }

    #[inline]
    fn none() -> S::Trace {
        S::Trace::default()
    }

    #[inline]
    fn all() -> S::Mask {
        S::splat(<S::Scalar as ScoreInt>::ZERO).eq(Self::zero())
    }

    /// The cell `(0, 0)`.
    #[inline]
    pub(crate) fn origin<const TRACE: bool>(&self, carry: &mut VerticalCarry<S>) -> AffineCell<S> {
        let zero = Self::zero();
        carry.score = if self.first_column_free { zero } else { self.gap_open };
        let horizontal = if self.first_row_free { zero } else { self.gap_open };
        let mut cell = AffineCell {
            optimal: zero,
            horizontal,
            trace: Self::none(),
            horizontal_open: Self::none(),
        };
        if TRACE {
            cell.horizontal_open = Self::none().set_where(Self::all(), TraceDirections::LEFT_OPEN);
            carry.open = Self::none().set_where(Self::all(), TraceDirections::UP_OPEN);
        }
        cell
    }

    /// A cell `(r, 0)` with `r > 0`, continuing the vertical gap from above
    /// unless the first column is free.
    #[inline]
    pub(crate) fn first_column<const TRACE: bool>(&self, carry: &mut VerticalCarry<S>) -> AffineCell<S> {
        let zero = Self::zero();
        let mut cell;
        if self.first_column_free {
            cell = AffineCell {
                optimal:         zero,
                horizontal:      self.gap_open,
                trace:           Self::none(),
                horizontal_open: Self::none(),
            };
            carry.score = zero;
            if TRACE {
                carry.open = Self::none().set_where(Self::all(), TraceDirections::UP_OPEN);
            }
        } else {
            let vertical = carry.score;
            cell = AffineCell {
                optimal:         vertical,
                horizontal:      vertical.add(self.gap_open),
                trace:           Self::none(),
                horizontal_open: Self::none(),
            };
            carry.score = vertical.add(self.gap_extend);
            if TRACE {
                cell.trace = carry.open.set_where(Self::all(), TraceDirections::UP);
                carry.open = Self::none();
            }
        }
        if TRACE {
            cell.horizontal_open = Self::none().set_where(Self::all(), TraceDirections::LEFT_OPEN);
        }
        cell
    }

    /// A cell `(0, c)` with `c > 0`, continuing the horizontal gap from the
    /// left unless the first row is free.
    #[inline]
    pub(crate) fn first_row<const TRACE: bool>(
        &self, horizontal: S, horizontal_open: S::Trace, carry: &mut VerticalCarry<S>,
    ) -> AffineCell<S> {
        let zero = Self::zero();
        let mut cell;
        if self.first_row_free {
            cell = AffineCell {
                optimal:         zero,
                horizontal:      zero,
                trace:           Self::none(),
                horizontal_open: Self::none(),
            };
            carry.score = self.gap_open;
            if TRACE {
                cell.horizontal_open = Self::none().set_where(Self::all(), TraceDirections::LEFT_OPEN);
            }
        } else {
            cell = AffineCell {
                optimal:         horizontal,
                horizontal:      horizontal.add(self.gap_extend),
                trace:           Self::none(),
                horizontal_open: Self::none(),
            };
            carry.score = horizontal.add(self.gap_open);
            if TRACE {
                cell.trace = horizontal_open.set_where(Self::all(), TraceDirections::LEFT);
            }
        }
        if TRACE {
            carry.open = Self::none().set_where(Self::all(), TraceDirections::UP_OPEN);
        }
        cell
    }

    /// An inner cell. `diagonal` is the optimal score of the upper left
    /// neighbour plus the substitution score of the cell, `horizontal` and
    /// `horizontal_open` come from the left neighbour.
    ///
    /// Ties between predecessors set several direction bits. An open bit is
    /// only set when opening a gap scores strictly better than extending one.
    #[inline]
    pub(crate) fn inner<const TRACE: bool>(
        &self, diagonal: S, horizontal: S, horizontal_open: S::Trace, carry: &mut VerticalCarry<S>,
    ) -> AffineCell<S> {
        let vertical = carry.score;
        let mut optimal = diagonal.max(vertical).max(horizontal);
        if self.local {
            optimal = optimal.max(Self::zero());
        }

        let open = optimal.add(self.gap_open);
        let horizontal_extend = horizontal.add(self.gap_extend);
        let vertical_extend = vertical.add(self.gap_extend);

        let mut cell = AffineCell {
            optimal,
            horizontal: open.max(horizontal_extend),
            trace: Self::none(),
            horizontal_open: Self::none(),
        };
        carry.score = open.max(vertical_extend);

        if TRACE {
            let mut trace = Self::none()
                .set_where(optimal.eq(diagonal), TraceDirections::DIAGONAL)
                .set_where(optimal.eq(vertical), TraceDirections::UP)
                .set_where(optimal.eq(horizontal), TraceDirections::LEFT);
            if self.local {
                trace = trace.clear_where(optimal.eq(Self::zero()), TraceDirections::DIRECTIONS);
            }
            cell.trace = trace.union(carry.open).union(horizontal_open);
            cell.horizontal_open = Self::none().set_where(open.gt(horizontal_extend), TraceDirections::LEFT_OPEN);
            carry.open = Self::none().set_where(open.gt(vertical_extend), TraceDirections::UP_OPEN);
        }
        cell
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn global() -> AffineGapRecursion<i32> {
        AffineGapRecursion::new(-11, -1, false, false, false)
    }

    #[test]
    fn initialisation() {
        let recursion = global();
        let mut carry = VerticalCarry::new(recursion.lowest_viable_score());
        let origin = recursion.origin::<true>(&mut carry);
        assert_eq!((origin.optimal, origin.horizontal, carry.score), (0, -11, -11));
        assert!(origin.trace.is_terminal());

        let below = recursion.first_column::<true>(&mut carry);
        assert_eq!((below.optimal, below.horizontal, carry.score), (-11, -22, -12));
        assert_eq!(below.trace, TraceDirections::UP | TraceDirections::UP_OPEN);

        let below = recursion.first_column::<true>(&mut carry);
        assert_eq!(below.optimal, -12);
        assert_eq!(below.trace, TraceDirections::UP);

        let mut carry = VerticalCarry::new(0);
        let right = recursion.first_row::<true>(-11, TraceDirections::LEFT_OPEN, &mut carry);
        assert_eq!((right.optimal, right.horizontal, carry.score), (-11, -12, -22));
        assert_eq!(right.trace, TraceDirections::LEFT | TraceDirections::LEFT_OPEN);
    }

    #[test]
    fn free_ends_ignore_predecessors() {
        let recursion = AffineGapRecursion::<i16>::new(-3, -1, true, true, false);
        let mut carry = VerticalCarry::new(recursion.lowest_viable_score());
        let cell = recursion.first_column::<true>(&mut carry);
        assert_eq!((cell.optimal, carry.score), (0, 0));
        assert!(cell.trace.is_terminal());

        let cell = recursion.first_row::<true>(i16::MIN, TraceDirections::NONE, &mut carry);
        assert_eq!((cell.optimal, cell.horizontal, carry.score), (0, 0, -3));
    }

    #[test]
    fn inner_ties_and_open_bits() {
        let recursion = global();
        let mut carry = VerticalCarry::new(-5);
        let cell = recursion.inner::<true>(-5, -20, TraceDirections::NONE, &mut carry);
        assert_eq!(cell.optimal, -5);
        assert_eq!(cell.trace, TraceDirections::DIAGONAL | TraceDirections::UP);
        // -5 - 11 is worse than extending the vertical gap to -6
        assert_eq!(carry.score, -6);
        assert_eq!(carry.open, TraceDirections::NONE);
        assert_eq!(cell.horizontal, -16);
        assert_eq!(cell.horizontal_open, TraceDirections::LEFT_OPEN);
    }

    #[test]
    fn local_clamps_to_zero() {
        let recursion = AffineGapRecursion::<i8>::new(-2, -1, true, true, true);
        let mut carry = VerticalCarry::new(-4);
        let cell = recursion.inner::<true>(-3, -7, TraceDirections::NONE, &mut carry);
        assert_eq!(cell.optimal, 0);
        assert!(cell.trace.is_terminal());
    }

    #[test]
    fn lanes_match_scalars() {
        let scalar = global();
        let vector = AffineGapRecursion::<Lanes<i32, 2>>::new(-11, -1, false, false, false);
        let mut carry = VerticalCarry::new(-5);
        let mut lanes = VerticalCarry::new(Lanes([-5, -30]));
        let expected = scalar.inner::<true>(3, -20, TraceDirections::NONE, &mut carry);
        let cell = vector.inner::<true>(Lanes([3, 3]), Lanes([-20, -20]), Lanes::splat(0), &mut lanes);
        assert_eq!(cell.optimal.lane(0), expected.optimal);
        assert_eq!(cell.trace.lane(0), expected.trace.bits());
        assert_eq!(lanes.score.lane(0), carry.score);
    }
}
