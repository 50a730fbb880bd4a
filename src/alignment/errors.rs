use crate::{alignment::ScoreType, data::err::GetCode};
use std::{error::Error, fmt};

/// Errors raised while turning an [`AlignConfig`] into an algorithm, before
/// any sequence is looked at.
///
/// [`AlignConfig`]: crate::alignment::AlignConfig
#[derive(Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// No scoring scheme was supplied
    MissingScoringScheme,
    /// The lower diagonal of the band exceeds its upper diagonal
    DegenerateBand { lower: isize, upper: isize },
    /// Banding was combined with an algorithm family that does not support it
    UnsupportedBand(&'static str),
    /// An error bound was combined with settings it cannot be applied to
    UnsupportedMaxErrors(&'static str),
    /// Parallel execution was requested without a thread count
    MissingThreadCount,
    /// Parallel execution was requested with zero threads
    ZeroThreadCount,
    /// A gap cost was positive
    PositiveGapCost { open: i32, extend: i32 },
    /// A score or gap cost does not fit into the chosen score type
    ScoreNotRepresentable { value: i64, score_type: ScoreType },
    /// The alphabet is too large for the ranks to be packed into lanes of the
    /// chosen score type
    AlphabetTooLarge { alphabet_size: usize, score_type: ScoreType },
    /// A substitution matrix was not square over its alphabet
    MalformedMatrix { alphabet_size: usize, len: usize },
    /// No substitution matrix is known by this name
    UnknownMatrix(String),
}

impl fmt::Display for ConfigError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::MissingScoringScheme => write!(f, "No scoring scheme was configured!"),
            ConfigError::DegenerateBand { lower, upper } => write!(
                f,
                "The lower diagonal ({lower}) of the band must not be greater than the upper diagonal ({upper})"
            ),
            ConfigError::UnsupportedBand(reason) => write!(f, "The band cannot be used here: {reason}"),
            ConfigError::UnsupportedMaxErrors(reason) => write!(f, "The error bound cannot be used here: {reason}"),
            ConfigError::MissingThreadCount => {
                write!(f, "Parallel execution requires an explicit thread count")
            }
            ConfigError::ZeroThreadCount => write!(f, "The thread count for parallel execution must be at least 1"),
            ConfigError::PositiveGapCost { open, extend } => write!(
                f,
                "Gap costs must not be positive, but gap open was {open} and gap extend was {extend}"
            ),
            ConfigError::ScoreNotRepresentable { value, score_type } => {
                write!(f, "The score {value} cannot be represented by the score type {score_type}")
            }
            ConfigError::AlphabetTooLarge {
                alphabet_size,
                score_type,
            } => write!(
                f,
                "An alphabet of size {alphabet_size} cannot be packed into lanes of the score type {score_type}"
            ),
            ConfigError::MalformedMatrix { alphabet_size, len } => write!(
                f,
                "A substitution matrix over {alphabet_size} symbols needs {} entries, but {len} were given",
                alphabet_size * alphabet_size
            ),
            ConfigError::UnknownMatrix(name) => write!(f, "There is no substitution matrix named '{name}'"),
        }
    }
}

impl fmt::Debug for ConfigError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Error for ConfigError {}
impl GetCode for ConfigError {}

/// Errors found while validating the sequences of a batch. All pairs are
/// validated before any alignment of the batch runs.
#[derive(Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputError {
    /// A symbol rank is outside the alphabet of the substitution matrix
    RankOutOfRange { pair: usize, rank: u8, alphabet_size: usize },
    /// A symbol rank cannot be packed into a lane next to the padding symbols
    RankNotPackable { pair: usize, rank: u8 },
    /// The band does not contain the origin of the matrix although the leading
    /// ends are not free
    BandExcludesOrigin { pair: usize },
    /// The band does not contain the last cell of the matrix although the
    /// trailing ends are not free
    BandExcludesSink { pair: usize },
    /// The band does not intersect the matrix at all
    BandOutsideMatrix { pair: usize },
}

impl fmt::Display for InputError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InputError::RankOutOfRange {
                pair,
                rank,
                alphabet_size,
            } => write!(
                f,
                "Pair {pair} contains the rank {rank}, which is outside the alphabet of size {alphabet_size}"
            ),
            InputError::RankNotPackable { pair, rank } => {
                write!(f, "Pair {pair} contains the rank {rank}, which collides with the padding symbols")
            }
            InputError::BandExcludesOrigin { pair } => {
                write!(f, "The band does not cover the origin of the matrix for pair {pair}")
            }
            InputError::BandExcludesSink { pair } => {
                write!(f, "The band does not cover the last cell of the matrix for pair {pair}")
            }
            InputError::BandOutsideMatrix { pair } => {
                write!(f, "The band does not intersect the matrix for pair {pair}")
            }
        }
    }
}

impl fmt::Debug for InputError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Error for InputError {}
impl GetCode for InputError {}

/// Invariant violations while reading a trace matrix. These indicate a defect
/// in the caller and are never caused by user input.
#[derive(Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TracebackError {
    /// The coordinate lies outside the matrix
    CoordinateOutOfBounds { row: usize, col: usize },
    /// The coordinate lies inside the matrix but outside the band
    OutsideBand { row: usize, col: usize },
    /// The matrix does not store any trace
    TraceDisabled,
}

impl fmt::Display for TracebackError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TracebackError::CoordinateOutOfBounds { row, col } => {
                write!(f, "The coordinate (row {row}, column {col}) exceeds the matrix")
            }
            TracebackError::OutsideBand { row, col } => {
                write!(f, "The coordinate (row {row}, column {col}) lies outside the band")
            }
            TracebackError::TraceDisabled => write!(f, "The matrix was built without trace storage"),
        }
    }
}

impl fmt::Debug for TracebackError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Error for TracebackError {}
impl GetCode for TracebackError {}

/// Errors when reconstructing an alignment from a CIGAR string.
#[derive(Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CigarConversionError {
    /// The CIGAR contained no operations
    EmptyCigar,
    /// The CIGAR consumes more reference than is available
    ReferenceTooShort { required: usize, available: usize },
    /// The CIGAR implies a different query length than supplied
    QueryLengthMismatch { implied: usize, actual: usize },
}

impl fmt::Display for CigarConversionError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CigarConversionError::EmptyCigar => write!(f, "An empty CIGAR is not a valid alignment representation"),
            CigarConversionError::ReferenceTooShort { required, available } => write!(
                f,
                "The CIGAR string indicates a reference length of at least {required}, but the supplied reference is only of size {available}"
            ),
            CigarConversionError::QueryLengthMismatch { implied, actual } => write!(
                f,
                "The CIGAR string indicates a query length of {implied}, but the supplied query is of size {actual}"
            ),
        }
    }
}

impl fmt::Debug for CigarConversionError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Error for CigarConversionError {}
impl GetCode for CigarConversionError {}

/// The error type of [`align_pairwise`](crate::execution::align_pairwise).
#[derive(Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AlignmentError {
    Config(ConfigError),
    Input(InputError),
}

impl fmt::Display for AlignmentError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AlignmentError::Config(e) => write!(f, "Invalid alignment configuration: {e}"),
            AlignmentError::Input(e) => write!(f, "Invalid alignment input: {e}"),
        }
    }
}

impl fmt::Debug for AlignmentError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Error for AlignmentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AlignmentError::Config(e) => Some(e),
            AlignmentError::Input(e) => Some(e),
        }
    }
}

impl GetCode for AlignmentError {
    fn get_code(&self) -> i32 {
        match self {
            AlignmentError::Config(_) => 2,
            AlignmentError::Input(_) => 1,
        }
    }
}

impl From<ConfigError> for AlignmentError {
    #[inline]
    fn from(e: ConfigError) -> Self {
        AlignmentError::Config(e)
    }
}

impl From<InputError> for AlignmentError {
    #[inline]
    fn from(e: InputError) -> Self {
        AlignmentError::Input(e)
    }
}
