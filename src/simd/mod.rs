//! Array-backed lane vectors used by the vectorised alignment kernels.
//!
//! [`Lanes`] is a fixed-width bundle of `N` scalars with element-wise
//! operations written as simple loops over arrays, which the optimizer lowers
//! to the target's vector instructions. Combined with the `multiversion`
//! feature, kernels generic over [`Lanes`] are compiled once per supported
//! instruction set and the best version is picked at runtime.

use crate::math::ScoreInt;
use std::ops::{BitAnd, BitOr};

/// The register width in bits that lane counts are derived from.
pub const REGISTER_BITS: usize = 256;

/// Returns the number of lanes of type `T` that fit in one register.
#[inline]
#[must_use]
pub const fn lanes_for<T: ScoreInt>() -> usize {
    REGISTER_BITS / T::BITS as usize
}

/// A vector of `N` lanes of type `T`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct Lanes<T, const N: usize>(pub [T; N]);

/// A mask with one boolean per lane.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct LaneMask<const N: usize>(pub [bool; N]);

impl<const N: usize> LaneMask<N> {
    #[inline]
    #[must_use]
    pub fn from_fn(f: impl FnMut(usize) -> bool) -> Self {
        LaneMask(std::array::from_fn(f))
    }

    #[inline]
    #[must_use]
    pub const fn test(&self, lane: usize) -> bool {
        self.0[lane]
    }

    #[inline]
    #[must_use]
    pub fn any(&self) -> bool {
        self.0.iter().any(|&b| b)
    }
}

impl<const N: usize> BitAnd for LaneMask<N> {
    type Output = Self;

    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        LaneMask(std::array::from_fn(|i| self.0[i] & rhs.0[i]))
    }
}

impl<const N: usize> BitOr for LaneMask<N> {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        LaneMask(std::array::from_fn(|i| self.0[i] | rhs.0[i]))
    }
}

impl<T: Copy, const N: usize> Lanes<T, N> {
    #[inline]
    #[must_use]
    pub const fn splat(value: T) -> Self {
        Lanes([value; N])
    }

    #[inline]
    #[must_use]
    pub fn to_array(self) -> [T; N] {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn lane(&self, lane: usize) -> T {
        self.0[lane]
    }

    /// Lane-wise `if mask { a } else { b }`.
    #[inline]
    #[must_use]
    pub fn select(mask: LaneMask<N>, a: Self, b: Self) -> Self {
        Lanes(std::array::from_fn(|i| if mask.0[i] { a.0[i] } else { b.0[i] }))
    }
}

impl<T: ScoreInt, const N: usize> Lanes<T, N> {
    #[inline]
    #[must_use]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Lanes(std::array::from_fn(|i| self.0[i].sat_add(rhs.0[i])))
    }

    #[inline]
    #[must_use]
    pub fn simd_max(self, rhs: Self) -> Self {
        Lanes(std::array::from_fn(|i| self.0[i].max(rhs.0[i])))
    }

    #[inline]
    #[must_use]
    pub fn simd_eq(self, rhs: Self) -> LaneMask<N> {
        LaneMask(std::array::from_fn(|i| self.0[i] == rhs.0[i]))
    }

    #[inline]
    #[must_use]
    pub fn simd_lt(self, rhs: Self) -> LaneMask<N> {
        LaneMask(std::array::from_fn(|i| self.0[i] < rhs.0[i]))
    }

    #[inline]
    #[must_use]
    pub fn simd_le(self, rhs: Self) -> LaneMask<N> {
        LaneMask(std::array::from_fn(|i| self.0[i] <= rhs.0[i]))
    }

    #[inline]
    #[must_use]
    pub fn simd_ge(self, rhs: Self) -> LaneMask<N> {
        LaneMask(std::array::from_fn(|i| self.0[i] >= rhs.0[i]))
    }

    #[inline]
    #[must_use]
    pub fn xor(self, rhs: Self) -> Self {
        Lanes(std::array::from_fn(|i| self.0[i] ^ rhs.0[i]))
    }

    /// Gathers `table[offsets[i]]` into each lane.
    ///
    /// ## Panics
    ///
    /// Every offset must be in bounds of `table`.
    #[inline]
    #[must_use]
    pub fn gather(table: &[T], offsets: &[usize; N]) -> Self {
        Lanes(std::array::from_fn(|i| table[offsets[i]]))
    }
}

impl<const N: usize> Lanes<u8, N> {
    /// Sets `bits` in every lane where `mask` holds.
    #[inline]
    #[must_use]
    pub fn set_where(self, mask: LaneMask<N>, bits: u8) -> Self {
        Lanes(std::array::from_fn(|i| if mask.0[i] { self.0[i] | bits } else { self.0[i] }))
    }
}

impl<const N: usize> BitOr for Lanes<u8, N> {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Lanes(std::array::from_fn(|i| self.0[i] | rhs.0[i]))
    }
}
