use super::{BandMapping, MatrixCoordinate};
use crate::{alignment::TracebackError, simd::{LaneMask, Lanes}};
use std::{
    fmt,
    ops::{BitOr, BitOrAssign},
};

/// The directions a cell of the DP matrix was reached from.
///
/// The three direction bits record which predecessors attained the optimal
/// score of the cell, so ties leave several bits set. The two `open` bits
/// belong to the gap states: [`UP_OPEN`] means the vertical gap entering the
/// cell was opened in the cell above it, [`LEFT_OPEN`] means the horizontal
/// gap entering the cell was opened in the cell to its left. A cell without
/// direction bits is terminal.
///
/// [`UP_OPEN`]: TraceDirections::UP_OPEN
/// [`LEFT_OPEN`]: TraceDirections::LEFT_OPEN
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TraceDirections(pub(crate) u8);

impl TraceDirections {
    pub const NONE: Self = TraceDirections(0);
    pub const DIAGONAL: Self = TraceDirections(1);
    pub const UP_OPEN: Self = TraceDirections(2);
    pub const UP: Self = TraceDirections(4);
    pub const LEFT_OPEN: Self = TraceDirections(8);
    pub const LEFT: Self = TraceDirections(16);

    /// The bits naming a predecessor of the optimal score.
    pub const DIRECTIONS: Self = TraceDirections(1 | 4 | 16);

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        TraceDirections(bits & 0b1_1111)
    }

    /// True if every bit of `other` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// A cell without a predecessor, where every traceback stops.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.intersects(Self::DIRECTIONS)
    }
}

impl BitOr for TraceDirections {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        TraceDirections(self.0 | rhs.0)
    }
}

impl BitOrAssign for TraceDirections {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for TraceDirections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(TraceDirections, &str); 5] = [
            (TraceDirections::DIAGONAL, "diagonal"),
            (TraceDirections::UP_OPEN, "up_open"),
            (TraceDirections::UP, "up"),
            (TraceDirections::LEFT_OPEN, "left_open"),
            (TraceDirections::LEFT, "left"),
        ];

        if self.0 == 0 {
            return write!(f, "none");
        }
        let mut first = true;
        for (bits, name) in NAMES {
            if self.contains(bits) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// The word stored per cell by a trace matrix: [`TraceDirections`] for
/// scalar alignments, or one direction byte per lane.
pub trait TraceWord: Copy + Default + Send + Sync + 'static {
    type Mask: Copy;

    /// Sets `bits` wherever `mask` holds.
    #[must_use]
    fn set_where(self, mask: Self::Mask, bits: TraceDirections) -> Self;

    /// Clears `bits` wherever `mask` holds.
    #[must_use]
    fn clear_where(self, mask: Self::Mask, bits: TraceDirections) -> Self;

    #[must_use]
    fn union(self, other: Self) -> Self;
}

impl TraceWord for TraceDirections {
    type Mask = bool;

    #[inline]
    fn set_where(self, mask: bool, bits: TraceDirections) -> Self {
        if mask { self | bits } else { self }
    }

    #[inline]
    fn clear_where(self, mask: bool, bits: TraceDirections) -> Self {
        if mask { TraceDirections(self.0 & !bits.0) } else { self }
    }

    #[inline]
    fn union(self, other: Self) -> Self {
        self | other
    }
}

impl<const N: usize> Default for Lanes<u8, N> {
    #[inline]
    fn default() -> Self {
        Lanes::splat(0)
    }
}

impl<const N: usize> TraceWord for Lanes<u8, N> {
    type Mask = LaneMask<N>;

    #[inline]
    fn set_where(self, mask: LaneMask<N>, bits: TraceDirections) -> Self {
        Lanes::set_where(self, mask, bits.0)
    }

    #[inline]
    fn clear_where(self, mask: LaneMask<N>, bits: TraceDirections) -> Self {
        Lanes(std::array::from_fn(|i| if mask.test(i) { self.0[i] & !bits.0 } else { self.0[i] }))
    }

    #[inline]
    fn union(self, other: Self) -> Self {
        self | other
    }
}

/// Storage written by the DP sweep. Besides one word per cell, a store keeps
/// the [`LEFT_OPEN`](TraceDirections::LEFT_OPEN) bits of the horizontal gaps
/// leaving the current column, one per row.
pub trait TraceStore<W: TraceWord> {
    /// False for stores that discard everything, which lets the sweep skip
    /// computing directions at all.
    const ENABLED: bool;

    fn set(&mut self, coordinate: MatrixCoordinate, word: W);

    fn horizontal(&self, row: usize) -> W;

    fn set_horizontal(&mut self, row: usize, word: W);
}

/// Read access to recorded directions for the traceback.
pub trait TraceMatrix {
    /// The number of rows and columns of the matrix.
    fn dimensions(&self) -> (usize, usize);

    /// The directions of one cell.
    ///
    /// ## Errors
    ///
    /// The coordinate must lie inside the matrix (and its band), and the
    /// matrix must store directions.
    fn trace_at(&self, coordinate: MatrixCoordinate) -> Result<TraceDirections, TracebackError>;
}

/// The coordinate-only mode: remembers nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoTrace;

impl<W: TraceWord> TraceStore<W> for NoTrace {
    const ENABLED: bool = false;

    #[inline]
    fn set(&mut self, _: MatrixCoordinate, _: W) {}

    #[inline]
    fn horizontal(&self, _: usize) -> W {
        W::default()
    }

    #[inline]
    fn set_horizontal(&mut self, _: usize, _: W) {}
}

impl TraceMatrix for NoTrace {
    #[inline]
    fn dimensions(&self) -> (usize, usize) {
        (0, 0)
    }

    #[inline]
    fn trace_at(&self, _: MatrixCoordinate) -> Result<TraceDirections, TracebackError> {
        Err(TracebackError::TraceDisabled)
    }
}

/// Directions for every cell of the matrix, stored column by column.
#[derive(Clone, Debug)]
pub struct TraceMatrixFull<W> {
    rows:       usize,
    cols:       usize,
    cells:      Vec<W>,
    horizontal: Vec<W>,
}

impl<W: TraceWord> TraceMatrixFull<W> {
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        TraceMatrixFull {
            rows,
            cols,
            cells: vec![W::default(); rows * cols],
            horizontal: vec![W::default(); rows],
        }
    }

    #[inline]
    fn index(&self, coordinate: MatrixCoordinate) -> Result<usize, TracebackError> {
        if coordinate.row < self.rows && coordinate.col < self.cols {
            Ok(coordinate.col * self.rows + coordinate.row)
        } else {
            Err(TracebackError::CoordinateOutOfBounds {
                row: coordinate.row,
                col: coordinate.col,
            })
        }
    }

    /// The stored word of one cell.
    ///
    /// ## Errors
    ///
    /// The coordinate must lie inside the matrix.
    #[inline]
    pub fn word_at(&self, coordinate: MatrixCoordinate) -> Result<W, TracebackError> {
        self.index(coordinate).map(|i| self.cells[i])
    }

    /// The words in column-major order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &W> {
        self.cells.iter()
    }
}

impl<W: TraceWord> TraceStore<W> for TraceMatrixFull<W> {
    const ENABLED: bool = true;

    #[inline]
    fn set(&mut self, coordinate: MatrixCoordinate, word: W) {
        let index = coordinate.col * self.rows + coordinate.row;
        self.cells[index] = word;
    }

    #[inline]
    fn horizontal(&self, row: usize) -> W {
        self.horizontal[row]
    }

    #[inline]
    fn set_horizontal(&mut self, row: usize, word: W) {
        self.horizontal[row] = word;
    }
}

impl TraceMatrix for TraceMatrixFull<TraceDirections> {
    #[inline]
    fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    fn trace_at(&self, coordinate: MatrixCoordinate) -> Result<TraceDirections, TracebackError> {
        self.word_at(coordinate)
    }
}

/// Directions for the cells inside a band only.
#[derive(Clone, Debug)]
pub struct TraceMatrixBanded<W> {
    mapping:    BandMapping,
    cells:      Vec<W>,
    horizontal: Vec<W>,
}

impl<W: TraceWord> TraceMatrixBanded<W> {
    #[must_use]
    pub fn new(mapping: BandMapping) -> Self {
        TraceMatrixBanded {
            mapping,
            cells: vec![W::default(); mapping.band_size() * mapping.cols()],
            horizontal: vec![W::default(); mapping.rows()],
        }
    }

    #[inline]
    #[must_use]
    pub const fn mapping(&self) -> &BandMapping {
        &self.mapping
    }
}

impl<W: TraceWord> TraceStore<W> for TraceMatrixBanded<W> {
    const ENABLED: bool = true;

    #[inline]
    fn set(&mut self, coordinate: MatrixCoordinate, word: W) {
        if let Some(index) = self.mapping.linear_index(coordinate) {
            self.cells[index] = word;
        }
    }

    #[inline]
    fn horizontal(&self, row: usize) -> W {
        self.horizontal[row]
    }

    #[inline]
    fn set_horizontal(&mut self, row: usize, word: W) {
        self.horizontal[row] = word;
    }
}

impl TraceMatrix for TraceMatrixBanded<TraceDirections> {
    #[inline]
    fn dimensions(&self) -> (usize, usize) {
        (self.mapping.rows(), self.mapping.cols())
    }

    fn trace_at(&self, coordinate: MatrixCoordinate) -> Result<TraceDirections, TracebackError> {
        let MatrixCoordinate { row, col } = coordinate;
        if row >= self.mapping.rows() || col >= self.mapping.cols() {
            return Err(TracebackError::CoordinateOutOfBounds { row, col });
        }
        self.mapping
            .linear_index(coordinate)
            .map(|i| self.cells[i])
            .ok_or(TracebackError::OutsideBand { row, col })
    }
}

/// One lane of a vectorised trace matrix, read as a scalar one.
#[derive(Clone, Copy, Debug)]
pub struct LaneView<'a, const N: usize> {
    matrix: &'a TraceMatrixFull<Lanes<u8, N>>,
    lane:   usize,
}

impl<'a, const N: usize> LaneView<'a, N> {
    /// ## Panics
    ///
    /// `lane` must be less than `N`.
    #[inline]
    #[must_use]
    pub fn new(matrix: &'a TraceMatrixFull<Lanes<u8, N>>, lane: usize) -> Self {
        assert!(lane < N, "lane {lane} does not exist in a vector of {N} lanes");
        LaneView { matrix, lane }
    }
}

impl<const N: usize> TraceMatrix for LaneView<'_, N> {
    #[inline]
    fn dimensions(&self) -> (usize, usize) {
        (self.matrix.rows, self.matrix.cols)
    }

    #[inline]
    fn trace_at(&self, coordinate: MatrixCoordinate) -> Result<TraceDirections, TracebackError> {
        self.matrix
            .word_at(coordinate)
            .map(|word| TraceDirections::from_bits(word.lane(self.lane)))
    }
}

/// A single move of the traceback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceStep {
    /// From `(row, col)` to `(row - 1, col - 1)`
    Diagonal,
    /// From `(row, col)` to `(row - 1, col)`, a gap in sequence 1
    Up,
    /// From `(row, col)` to `(row, col - 1)`, a gap in sequence 2
    Left,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PathState {
    Optimal,
    Vertical,
    Horizontal,
    Done,
}

/// The moves from a cell back to the terminal cell it descends from.
///
/// At a cell reached through its optimal score, a vertical gap is preferred
/// over a horizontal gap, which is preferred over the diagonal. Inside a gap
/// the walk continues until it crosses the cell that opened the gap.
#[derive(Debug)]
pub struct TracePath<'a, M: ?Sized> {
    matrix:     &'a M,
    coordinate: MatrixCoordinate,
    state:      PathState,
}

/// Starts a traceback at `coordinate`.
///
/// ## Errors
///
/// The coordinate must be readable from `matrix`.
pub fn trace_path<M: TraceMatrix + ?Sized>(
    matrix: &M, coordinate: MatrixCoordinate,
) -> Result<TracePath<'_, M>, TracebackError> {
    matrix.trace_at(coordinate)?;
    Ok(TracePath {
        matrix,
        coordinate,
        state: PathState::Optimal,
    })
}

impl<M: TraceMatrix + ?Sized> TracePath<'_, M> {
    /// The cell the walk currently stands on. Once the iterator is exhausted
    /// this is the terminal cell.
    #[inline]
    #[must_use]
    pub fn position(&self) -> MatrixCoordinate {
        self.coordinate
    }

    fn advance(&mut self) -> Result<Option<TraceStep>, TracebackError> {
        let MatrixCoordinate { row, col } = self.coordinate;
        let out_of_bounds = TracebackError::CoordinateOutOfBounds { row, col };
        let trace = self.matrix.trace_at(self.coordinate)?;

        if self.state == PathState::Optimal {
            self.state = if trace.contains(TraceDirections::UP) {
                PathState::Vertical
            } else if trace.contains(TraceDirections::LEFT) {
                PathState::Horizontal
            } else if trace.contains(TraceDirections::DIAGONAL) {
                if row == 0 || col == 0 {
                    return Err(out_of_bounds);
                }
                self.coordinate = MatrixCoordinate::new(row - 1, col - 1);
                return Ok(Some(TraceStep::Diagonal));
            } else {
                PathState::Done
            };
        }

        match self.state {
            PathState::Vertical => {
                self.coordinate.row = row.checked_sub(1).ok_or(out_of_bounds)?;
                if trace.contains(TraceDirections::UP_OPEN) {
                    self.state = PathState::Optimal;
                }
                Ok(Some(TraceStep::Up))
            }
            PathState::Horizontal => {
                self.coordinate.col = col.checked_sub(1).ok_or(out_of_bounds)?;
                if trace.contains(TraceDirections::LEFT_OPEN) {
                    self.state = PathState::Optimal;
                }
                Ok(Some(TraceStep::Left))
            }
            PathState::Optimal | PathState::Done => Ok(None),
        }
    }
}

impl<M: TraceMatrix + ?Sized> Iterator for TracePath<'_, M> {
    type Item = Result<TraceStep, TracebackError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == PathState::Done {
            return None;
        }
        match self.advance() {
            Ok(step) => step.map(Ok),
            Err(e) => {
                self.state = PathState::Done;
                Some(Err(e))
            }
        }
    }
}
