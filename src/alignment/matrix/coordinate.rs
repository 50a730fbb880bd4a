use super::BandMapping;
use crate::simd::LaneMask;
use std::ops::RangeInclusive;

/// A cell of the DP matrix. Row `r` belongs to the first `r` symbols of
/// sequence 2 and column `c` to the first `c` symbols of sequence 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatrixCoordinate {
    pub row: usize,
    pub col: usize,
}

impl MatrixCoordinate {
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        MatrixCoordinate { row, col }
    }
}

/// One coordinate per lane, used when the pairs of a vectorised batch each
/// have their own cell of interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LaneCoordinate<const N: usize> {
    pub rows: [usize; N],
    pub cols: [usize; N],
}

impl<const N: usize> LaneCoordinate<N> {
    #[inline]
    #[must_use]
    pub fn lane(&self, lane: usize) -> MatrixCoordinate {
        MatrixCoordinate::new(self.rows[lane], self.cols[lane])
    }

    /// Sets the lanes selected by `mask` to `coordinate`.
    #[inline]
    pub fn set_where(&mut self, mask: LaneMask<N>, coordinate: MatrixCoordinate) {
        for i in 0..N {
            if mask.test(i) {
                self.rows[i] = coordinate.row;
                self.cols[i] = coordinate.col;
            }
        }
    }
}

/// A matrix without storage that only knows which cells exist, column by
/// column. With a band, only the cells inside the band exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoordinateMatrix {
    rows: usize,
    cols: usize,
    band: Option<BandMapping>,
}

impl CoordinateMatrix {
    /// A matrix for sequences of length `len1` (columns) and `len2` (rows).
    #[inline]
    #[must_use]
    pub const fn new(len1: usize, len2: usize) -> Self {
        CoordinateMatrix {
            rows: len2 + 1,
            cols: len1 + 1,
            band: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn banded(band: BandMapping) -> Self {
        CoordinateMatrix {
            rows: band.rows(),
            cols: band.cols(),
            band: Some(band),
        }
    }

    /// The number of rows, one more than the length of sequence 2.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns, one more than the length of sequence 1.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    #[must_use]
    pub const fn band(&self) -> Option<&BandMapping> {
        self.band.as_ref()
    }

    /// The rows of column `col` that exist. Empty if no cell of the column
    /// does.
    #[inline]
    #[must_use]
    #[allow(clippy::reversed_empty_ranges)]
    pub fn column_rows(&self, col: usize) -> RangeInclusive<usize> {
        match &self.band {
            Some(band) => band.column_rows(col),
            None if col < self.cols => 0..=self.rows - 1,
            None => 1..=0,
        }
    }

    /// Every existing coordinate in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = MatrixCoordinate> + '_ {
        (0..self.cols).flat_map(move |col| self.column_rows(col).map(move |row| MatrixCoordinate::new(row, col)))
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, coordinate: MatrixCoordinate) -> bool {
        coordinate.row < self.rows
            && coordinate.col < self.cols
            && self.band.is_none_or(|band| band.contains(coordinate))
    }
}
