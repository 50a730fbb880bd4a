//! Scoring schemes for rank-encoded symbols.
//!
//! [`ScoringScheme`] is the user-facing description: either a match/mismatch
//! pair or a full [`SubstitutionMatrix`]. When an algorithm is configured,
//! the scheme is converted into a profile specialised for the chosen score
//! type (and lane width, for the vectorised kernels in [`simd`]), which is
//! what the DP sweep queries once per cell.

use crate::{
    alignment::{ConfigError, DpScore, ScoreType},
    data::matrices::{BLOSUM_30, BLOSUM_45, BLOSUM_62, BLOSUM_80},
    math::ScoreInt,
};
use std::{fmt, str::FromStr};

pub(crate) mod simd;

/// Scores two symbol ranks against each other.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScoringScheme {
    /// A constant score for equal ranks and another for different ranks.
    MatchMismatch { match_score: i32, mismatch_score: i32 },
    /// A full substitution matrix.
    Matrix(SubstitutionMatrix),
}

impl ScoringScheme {
    #[inline]
    #[must_use]
    pub const fn match_mismatch(match_score: i32, mismatch_score: i32) -> Self {
        ScoringScheme::MatchMismatch {
            match_score,
            mismatch_score,
        }
    }

    /// Match 0 and mismatch -1.
    #[inline]
    #[must_use]
    pub const fn edit_distance() -> Self {
        Self::match_mismatch(0, -1)
    }

    /// The score of aligning rank `a` to rank `b`.
    ///
    /// ## Panics
    ///
    /// For a matrix scheme, both ranks must be within its alphabet.
    #[inline]
    #[must_use]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        match self {
            ScoringScheme::MatchMismatch {
                match_score,
                mismatch_score,
            } => {
                if a == b {
                    *match_score
                } else {
                    *mismatch_score
                }
            }
            ScoringScheme::Matrix(matrix) => matrix.score(a, b),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_edit_distance(&self) -> bool {
        *self == Self::edit_distance()
    }

    /// The alphabet size, if the scheme restricts ranks to one.
    #[inline]
    #[must_use]
    pub fn alphabet_size(&self) -> Option<usize> {
        match self {
            ScoringScheme::MatchMismatch { .. } => None,
            ScoringScheme::Matrix(matrix) => Some(matrix.alphabet_size),
        }
    }

}

/// A square substitution matrix over the ranks `0..alphabet_size`, stored
/// row-major.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubstitutionMatrix {
    alphabet_size: usize,
    scores:        Vec<i32>,
}

impl SubstitutionMatrix {
    /// Creates a matrix from row-major scores.
    ///
    /// ## Errors
    ///
    /// `scores` must hold exactly `alphabet_size²` entries, and the alphabet
    /// must have at most 256 symbols.
    pub fn new(alphabet_size: usize, scores: Vec<i32>) -> Result<Self, ConfigError> {
        if alphabet_size == 0 || alphabet_size > 256 || scores.len() != alphabet_size * alphabet_size {
            return Err(ConfigError::MalformedMatrix {
                alphabet_size,
                len: scores.len(),
            });
        }
        Ok(SubstitutionMatrix { alphabet_size, scores })
    }

    /// Creates a matrix from an array of rows.
    ///
    /// ## Panics
    ///
    /// `S` must be between 1 and 256.
    #[must_use]
    pub fn from_rows<const S: usize>(rows: [[i32; S]; S]) -> Self {
        assert!(S > 0 && S <= 256);
        SubstitutionMatrix {
            alphabet_size: S,
            scores:        rows.iter().flatten().copied().collect(),
        }
    }

    /// A matrix scoring `match_score` on the diagonal and `mismatch_score`
    /// elsewhere.
    ///
    /// ## Panics
    ///
    /// `alphabet_size` must be between 1 and 256.
    #[must_use]
    pub fn with_match_mismatch(alphabet_size: usize, match_score: i32, mismatch_score: i32) -> Self {
        assert!(alphabet_size > 0 && alphabet_size <= 256);
        let scores = (0..alphabet_size * alphabet_size)
            .map(|i| {
                if i / alphabet_size == i % alphabet_size {
                    match_score
                } else {
                    mismatch_score
                }
            })
            .collect();
        SubstitutionMatrix { alphabet_size, scores }
    }

    /// A DNA matrix in `ACGT` rank order distinguishing transitions
    /// (A↔G, C↔T) from transversions.
    #[must_use]
    pub fn dna_transition_transversion(match_score: i32, transition: i32, transversion: i32) -> Self {
        let (m, ts, tv) = (match_score, transition, transversion);
        Self::from_rows([[m, tv, ts, tv], [tv, m, tv, ts], [ts, tv, m, tv], [tv, ts, tv, m]])
    }

    /// A BLOSUM matrix over the ranks of
    /// [`PROTEIN_RANKS`](crate::data::mappings::PROTEIN_RANKS).
    #[must_use]
    pub fn blosum(blosum: Blosum) -> Self {
        let rows = match blosum {
            Blosum::B30 => &BLOSUM_30,
            Blosum::B45 => &BLOSUM_45,
            Blosum::B62 => &BLOSUM_62,
            Blosum::B80 => &BLOSUM_80,
        };
        Self::from_rows(rows.map(|row| row.map(i32::from)))
    }

    #[inline]
    #[must_use]
    pub const fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// ## Panics
    ///
    /// Both ranks must be within the alphabet.
    #[inline]
    #[must_use]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        self.scores[usize::from(a) * self.alphabet_size + usize::from(b)]
    }
}

/// The BLOSUM matrices available through [`SubstitutionMatrix::blosum`].
///
/// Higher numbers are built from more similar blocks and suit closely related
/// proteins. BLOSUM62 is the usual default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
pub enum Blosum {
    B30,
    B45,
    #[default]
    B62,
    B80,
}

impl fmt::Display for Blosum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let number = match self {
            Blosum::B30 => 30,
            Blosum::B45 => 45,
            Blosum::B62 => 62,
            Blosum::B80 => 80,
        };
        write!(f, "BLOSUM{number}")
    }
}

impl FromStr for Blosum {
    type Err = ConfigError;

    /// Parses names such as `BLOSUM62`, `blosum 62`, `BLOSUM_62` or
    /// `blosum-62`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ConfigError::UnknownMatrix(s.to_string());
        let name = s.trim();
        let number = name
            .get(..6)
            .filter(|prefix| prefix.eq_ignore_ascii_case("blosum"))
            .and_then(|_| name.get(6..))
            .ok_or_else(unknown)?;
        let number = number.strip_prefix([' ', '_', '-']).unwrap_or(number);
        match number {
            "30" => Ok(Blosum::B30),
            "45" => Ok(Blosum::B45),
            "62" => Ok(Blosum::B62),
            "80" => Ok(Blosum::B80),
            _ => Err(unknown()),
        }
    }
}

/// Converts a configured value into the score type, or reports which value
/// does not fit.
pub(crate) fn convert_score<T: ScoreInt>(value: i64, score_type: ScoreType) -> Result<T, ConfigError> {
    T::from_i64(value).ok_or(ConfigError::ScoreNotRepresentable { value, score_type })
}

/// A scoring scheme prepared for one score representation `S`.
///
/// The DP sweep calls [`column_profile`] once per column of the matrix (per
/// symbol of sequence 1) and [`score`] once per cell, so any per-symbol work
/// that can be shared down a column belongs in the profile.
///
/// [`column_profile`]: ScoringProfile::column_profile
/// [`score`]: ScoringProfile::score
pub(crate) trait ScoringProfile<S: DpScore>: Send + Sync {
    /// A symbol, or one symbol per lane.
    type Symbol: Copy + Send + Sync;
    /// Precomputed data for one symbol of sequence 1.
    type Column: Copy;

    fn column_profile(&self, a: Self::Symbol) -> Self::Column;

    fn score(&self, column: Self::Column, b: Self::Symbol) -> S;
}

/// Match/mismatch scoring for scalar scores.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScalarMatchMismatch<T> {
    match_score:    T,
    mismatch_score: T,
}

impl<T: ScoreInt> ScalarMatchMismatch<T> {
    pub(crate) fn new(match_score: i32, mismatch_score: i32, score_type: ScoreType) -> Result<Self, ConfigError> {
        Ok(ScalarMatchMismatch {
            match_score:    convert_score(i64::from(match_score), score_type)?,
            mismatch_score: convert_score(i64::from(mismatch_score), score_type)?,
        })
    }
}

impl<T: ScoreInt + DpScore> ScoringProfile<T> for ScalarMatchMismatch<T> {
    type Symbol = u8;
    type Column = u8;

    #[inline]
    fn column_profile(&self, a: u8) -> u8 {
        a
    }

    #[inline]
    fn score(&self, a: u8, b: u8) -> T {
        if a == b { self.match_score } else { self.mismatch_score }
    }
}

/// Substitution matrix scoring for scalar scores. The column profile is the
/// offset of the row of the symbol of sequence 1.
#[derive(Clone, Debug)]
pub(crate) struct ScalarMatrix<T> {
    alphabet_size: usize,
    table:         Vec<T>,
}

impl<T: ScoreInt> ScalarMatrix<T> {
    pub(crate) fn new(matrix: &SubstitutionMatrix, score_type: ScoreType) -> Result<Self, ConfigError> {
        let table = matrix
            .scores
            .iter()
            .map(|&s| convert_score(i64::from(s), score_type))
            .collect::<Result<Vec<T>, _>>()?;
        Ok(ScalarMatrix {
            alphabet_size: matrix.alphabet_size,
            table,
        })
    }
}

impl<T: ScoreInt + DpScore> ScoringProfile<T> for ScalarMatrix<T> {
    type Symbol = u8;
    type Column = usize;

    #[inline]
    fn column_profile(&self, a: u8) -> usize {
        usize::from(a) * self.alphabet_size
    }

    #[inline]
    fn score(&self, row: usize, b: u8) -> T {
        self.table[row + usize::from(b)]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn schemes_score_ranks() {
        let mm = ScoringScheme::match_mismatch(2, -3);
        assert_eq!(mm.score(1, 1), 2);
        assert_eq!(mm.score(1, 2), -3);
        assert!(ScoringScheme::edit_distance().is_edit_distance());
        assert!(!mm.is_edit_distance());

        let matrix = SubstitutionMatrix::dna_transition_transversion(5, -1, -4);
        assert_eq!(matrix.score(0, 2), -1);
        assert_eq!(matrix.score(0, 1), -4);
        assert_eq!(ScoringScheme::Matrix(matrix).alphabet_size(), Some(4));
    }

    #[test]
    fn blosum_by_name() {
        assert_eq!("BLOSUM62".parse(), Ok(Blosum::B62));
        assert_eq!("blosum 30".parse(), Ok(Blosum::B30));
        assert_eq!(" BLOSUM_80".parse(), Ok(Blosum::B80));
        assert_eq!("blosum-45".parse(), Ok(Blosum::B45));
        assert_eq!(
            "BLOSUM29".parse::<Blosum>(),
            Err(ConfigError::UnknownMatrix("BLOSUM29".to_string()))
        );
        assert!("BLOSUM".parse::<Blosum>().is_err());
        assert!("PAM250".parse::<Blosum>().is_err());
        assert_eq!(Blosum::default().to_string(), "BLOSUM62");
    }

    #[test]
    fn blosum_matrices_score_residues() {
        use crate::data::mappings::PROTEIN_RANKS;

        let blosum62 = SubstitutionMatrix::blosum(Blosum::B62);
        assert_eq!(blosum62.alphabet_size(), 21);
        let score = |a: u8, b: u8| blosum62.score(PROTEIN_RANKS[a], PROTEIN_RANKS[b]);
        assert_eq!(score(b'W', b'W'), 11);
        assert_eq!(score(b'A', b'R'), -1);
        assert_eq!(score(b'N', b'A'), -2);

        let heavy: i32 = PROTEIN_RANKS
            .encode(b"HEAGAWGHEE")
            .iter()
            .map(|&r| SubstitutionMatrix::blosum(Blosum::B80).score(r, r))
            .sum();
        assert_eq!(heavy, 12 + 8 + 7 + 9 + 7 + 16 + 9 + 12 + 8 + 8);
    }

    #[test]
    fn malformed_matrix() {
        assert_eq!(
            SubstitutionMatrix::new(3, vec![0; 8]),
            Err(ConfigError::MalformedMatrix { alphabet_size: 3, len: 8 })
        );
        assert!(SubstitutionMatrix::new(2, vec![1, -1, -1, 1]).is_ok());
    }

    #[test]
    fn scalar_profiles() {
        let profile = ScalarMatrix::<i8>::new(&SubstitutionMatrix::with_match_mismatch(3, 4, -2), ScoreType::I8).unwrap();
        let column = profile.column_profile(2);
        assert_eq!(profile.score(column, 2), 4);
        assert_eq!(profile.score(column, 0), -2);

        let wide = SubstitutionMatrix::with_match_mismatch(2, 300, -1);
        assert_eq!(
            ScalarMatrix::<i8>::new(&wide, ScoreType::I8).unwrap_err(),
            ConfigError::ScoreNotRepresentable {
                value:      300,
                score_type: ScoreType::I8,
            }
        );
    }
}
