use super::MatrixCoordinate;
use crate::alignment::Band;
use std::ops::RangeInclusive;

/// Maps cells of a banded matrix to their storage and back.
///
/// Column `c` of the band holds the rows `max(0, c - upper)` to
/// `min(len2, c - lower)`. Each column is stored as a slice of
/// [`band_size`](BandMapping::band_size) cells whose first entry is the
/// topmost row of the column inside the band. All banded components go
/// through this type, so the offsets are derived in one place only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BandMapping {
    lower:     isize,
    upper:     isize,
    rows:      usize,
    cols:      usize,
    band_size: usize,
}

/// A cell in banded storage: the column and the offset of the row from the
/// first row of the column that lies inside the band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BandCoordinate {
    pub col:    usize,
    pub offset: usize,
}

impl BandMapping {
    /// Creates the mapping for sequences of length `len1` (columns) and
    /// `len2` (rows). Returns `None` if the band is degenerate or does not
    /// intersect the matrix.
    #[must_use]
    pub fn new(band: Band, len1: usize, len2: usize) -> Option<Self> {
        let (lower, upper) = (band.lower, band.upper);
        let max_diagonal = isize::try_from(len1).ok()?;
        let min_diagonal = -isize::try_from(len2).ok()?;

        if lower > upper || upper < min_diagonal || lower > max_diagonal {
            return None;
        }

        // Diagonals past the matrix corners select no further cells
        let (lower, upper) = (lower.max(min_diagonal), upper.min(max_diagonal));
        let band_size = usize::try_from(upper - lower).ok()?.min(len2) + 1;

        Some(BandMapping {
            lower,
            upper,
            rows: len2 + 1,
            cols: len1 + 1,
            band_size,
        })
    }

    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// The number of cells stored per column.
    #[inline]
    #[must_use]
    pub const fn band_size(&self) -> usize {
        self.band_size
    }

    /// The rows of column `col` inside the band. The range is empty if the
    /// band misses the column.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::reversed_empty_ranges)]
    pub fn column_rows(&self, col: usize) -> RangeInclusive<usize> {
        if col >= self.cols {
            return 1..=0;
        }
        let c = col as isize;
        let first = (c - self.upper).max(0);
        let last = (c - self.lower).min(self.rows as isize - 1);
        if first > last {
            1..=0
        } else {
            first as usize..=last as usize
        }
    }

    /// The columns of row `row` inside the band. The range is empty if the
    /// band misses the row.
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::reversed_empty_ranges)]
    pub fn row_columns(&self, row: usize) -> RangeInclusive<usize> {
        if row >= self.rows {
            return 1..=0;
        }
        let r = row as isize;
        let first = (r + self.lower).max(0);
        let last = (r + self.upper).min(self.cols as isize - 1);
        if first > last {
            1..=0
        } else {
            first as usize..=last as usize
        }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, coordinate: MatrixCoordinate) -> bool {
        self.column_rows(coordinate.col).contains(&coordinate.row)
    }

    /// The storage position of a cell, or `None` outside the band.
    #[inline]
    #[must_use]
    pub fn to_storage(&self, coordinate: MatrixCoordinate) -> Option<BandCoordinate> {
        let rows = self.column_rows(coordinate.col);
        rows.contains(&coordinate.row).then(|| BandCoordinate {
            col:    coordinate.col,
            offset: coordinate.row - rows.start(),
        })
    }

    /// The matrix cell of a storage position, or `None` if the position does
    /// not hold a cell of the band.
    #[inline]
    #[must_use]
    pub fn to_matrix(&self, coordinate: BandCoordinate) -> Option<MatrixCoordinate> {
        let rows = self.column_rows(coordinate.col);
        let row = rows.start() + coordinate.offset;
        rows.contains(&row).then_some(MatrixCoordinate::new(row, coordinate.col))
    }

    /// The index of a cell into a column-major buffer of
    /// `cols * band_size` entries.
    #[inline]
    #[must_use]
    pub fn linear_index(&self, coordinate: MatrixCoordinate) -> Option<usize> {
        self.to_storage(coordinate)
            .map(|BandCoordinate { col, offset }| col * self.band_size + offset)
    }
}
