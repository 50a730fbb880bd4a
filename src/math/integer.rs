use std::{
    fmt::{Debug, Display},
    hash::Hash,
    ops::BitXor,
};

/// Signed integer types that can be used as the score type of an alignment.
///
/// All DP arithmetic saturates, so a score type that is too narrow for the
/// sequences being aligned clamps rather than wraps.
pub trait ScoreInt:
    Sized + Copy + Debug + Display + Ord + Hash + Default + Send + Sync + BitXor<Output = Self> + 'static {
    const ZERO: Self;
    const ONE: Self;
    const MIN: Self;
    const MAX: Self;
    const BITS: u32;

    /// Converts an `i64`, returning `None` if the value is not representable.
    fn from_i64(value: i64) -> Option<Self>;

    /// Losslessly widens the value to `i64`.
    fn widen(self) -> i64;

    /// Converts a symbol rank, returning `None` if it is not representable.
    fn from_rank(rank: u8) -> Option<Self>;

    /// Interprets the value as an index. Only meaningful for non-negative
    /// values.
    fn as_index(self) -> usize;

    #[must_use]
    fn sat_add(self, other: Self) -> Self;

    #[must_use]
    fn sat_sub(self, other: Self) -> Self;
}

macro_rules! impl_score_int {
    { $($ty:ty),* } => {
        $(
        impl ScoreInt for $ty {
            const ZERO: $ty = 0;
            const ONE: $ty = 1;
            const MIN: $ty = <$ty>::MIN;
            const MAX: $ty = <$ty>::MAX;
            const BITS: u32 = <$ty>::BITS;

            #[inline]
            fn from_i64(value: i64) -> Option<Self> {
                <$ty>::try_from(value).ok()
            }

            #[inline]
            fn widen(self) -> i64 {
                i64::from(self)
            }

            #[inline]
            fn from_rank(rank: u8) -> Option<Self> {
                <$ty>::try_from(rank).ok()
            }

            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            #[inline]
            fn as_index(self) -> usize {
                self as usize
            }

            #[inline]
            fn sat_add(self, other: Self) -> Self {
                self.saturating_add(other)
            }

            #[inline]
            fn sat_sub(self, other: Self) -> Self {
                self.saturating_sub(other)
            }
        } )*
    }
}

impl_score_int! {i8, i16, i32, i64}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(i8::from_i64(127), Some(127));
        assert_eq!(i8::from_i64(128), None);
        assert_eq!(i16::from_i64(-32_768), Some(i16::MIN));
        assert_eq!(i8::from_rank(200), None);
        assert_eq!(i32::from_rank(200), Some(200));
        assert_eq!((-5i16).widen(), -5i64);
    }

    #[test]
    fn saturation() {
        assert_eq!(i8::MIN.sat_add(-1), i8::MIN);
        assert_eq!(i8::MAX.sat_add(1), i8::MAX);
        assert_eq!(i16::MIN.sat_sub(1), i16::MIN);
    }
}
