//! Alignments as pairs of gapped sequences, and their conversion to and
//! from CIGAR strings.

use crate::{
    alignment::{CigarConversionError, GapCost, GapSegment, MatrixCoordinate, ScoringScheme, Traceback},
    data::cigar::{Ciglet, Cigar},
};

/// The aligned part of a sequence together with the gaps inserted into it.
///
/// Gap positions are relative to the aligned part: a segment at position `p`
/// is inserted before its `p`-th symbol, and a segment at its length is
/// appended.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct GappedSequence {
    symbols: Vec<u8>,
    gaps:    Vec<GapSegment>,
}

impl GappedSequence {
    /// Decorates `symbols` with `gaps`, which must be ordered by position.
    #[must_use]
    pub fn new(symbols: Vec<u8>, mut gaps: Vec<GapSegment>) -> Self {
        gaps.retain(|g| g.length > 0);
        debug_assert!(gaps.windows(2).all(|w| w[0].position <= w[1].position));
        GappedSequence { symbols, gaps }
    }

    /// The aligned symbols without gaps.
    #[inline]
    #[must_use]
    pub fn ungapped(&self) -> &[u8] {
        &self.symbols
    }

    #[inline]
    #[must_use]
    pub fn gaps(&self) -> &[GapSegment] {
        &self.gaps
    }

    /// The number of symbols plus the number of gaps.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len() + self.gaps.iter().map(|g| g.length).sum::<usize>()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the gapped sequence, yielding `None` for gaps.
    pub fn iter(&self) -> impl Iterator<Item = Option<u8>> + '_ {
        let mut gaps = self.gaps.iter().peekable();
        (0..=self.symbols.len()).flat_map(move |i| {
            let mut length = 0;
            while let Some(gap) = gaps.next_if(|g| g.position == i) {
                length += gap.length;
            }
            std::iter::repeat_n(None, length).chain(self.symbols.get(i).copied().map(Some))
        })
    }

    /// Renders the gapped sequence, decoding every rank with `decode`.
    pub fn to_bytes(&self, mut decode: impl FnMut(u8) -> u8, gap: u8) -> Vec<u8> {
        self.iter().map(|s| s.map_or(gap, &mut decode)).collect()
    }
}

/// Two gapped sequences of equal length. Sequence 1 takes the role of the
/// reference in CIGAR strings and sequence 2 that of the query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PairwiseAlignment {
    pub first:  GappedSequence,
    pub second: GappedSequence,
}

impl PairwiseAlignment {
    /// Cuts the aligned parts out of both sequences and attaches the gaps of
    /// a traceback ending at `end`.
    pub(crate) fn from_traceback(seq1: &[u8], seq2: &[u8], traceback: Traceback, end: MatrixCoordinate) -> Self {
        let Traceback {
            begin,
            first_gaps,
            second_gaps,
        } = traceback;
        let relative = |gaps: Vec<GapSegment>, start: usize| {
            gaps.into_iter()
                .map(|g| GapSegment {
                    position: g.position - start,
                    length:   g.length,
                })
                .collect()
        };

        PairwiseAlignment {
            first:  GappedSequence::new(seq1[begin.col..end.col].to_vec(), relative(first_gaps, begin.col)),
            second: GappedSequence::new(seq2[begin.row..end.row].to_vec(), relative(second_gaps, begin.row)),
        }
    }

    /// The columns of the alignment.
    pub fn columns(&self) -> impl Iterator<Item = (Option<u8>, Option<u8>)> + '_ {
        self.first.iter().zip(self.second.iter())
    }

    /// The number of columns.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.first.len().max(self.second.len())
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scores the alignment column by column. A run of `n` gaps in one row
    /// costs `open + n * extend`; columns with a gap in both rows are skipped.
    #[must_use]
    pub fn rescore(&self, scheme: &ScoringScheme, gap_cost: GapCost) -> i64 {
        #[derive(PartialEq)]
        enum Run {
            None,
            First,
            Second,
        }

        let mut score = 0i64;
        let mut run = Run::None;
        for column in self.columns() {
            let (next, delta) = match column {
                (Some(a), Some(b)) => (Run::None, i64::from(scheme.score(a, b))),
                (None, Some(_)) if run == Run::First => (Run::First, i64::from(gap_cost.extend)),
                (None, Some(_)) => (Run::First, gap_cost.cost(1)),
                (Some(_), None) if run == Run::Second => (Run::Second, i64::from(gap_cost.extend)),
                (Some(_), None) => (Run::Second, gap_cost.cost(1)),
                (None, None) => continue,
            };
            score += delta;
            run = next;
        }
        score
    }
}

/// Bases clipped off the query on either side of an alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ClippedBases {
    pub hard_front: usize,
    pub soft_front: usize,
    pub soft_back:  usize,
    pub hard_back:  usize,
}

/// Describes an alignment as a CIGAR string.
///
/// Sequence 1 is the reference: a gap in it is an insertion (`I`) and a gap
/// in sequence 2 a deletion (`D`). Gap against gap is padding (`P`). Aligned
/// symbols are `M`, or `=` and `X` when `extended` is set.
#[must_use]
pub fn cigar_from_alignment(alignment: &PairwiseAlignment, clipped: ClippedBases, extended: bool) -> Cigar {
    let op = |column: (Option<u8>, Option<u8>)| match column {
        (Some(a), Some(b)) if extended => {
            if a == b {
                b'='
            } else {
                b'X'
            }
        }
        (Some(_), Some(_)) => b'M',
        (None, Some(_)) => b'I',
        (Some(_), None) => b'D',
        (None, None) => b'P',
    };

    let front = [(clipped.hard_front, b'H'), (clipped.soft_front, b'S')];
    let back = [(clipped.soft_back, b'S'), (clipped.hard_back, b'H')];

    Cigar::from_ciglets(
        front
            .into_iter()
            .map(|(inc, op)| Ciglet { inc, op })
            .chain(alignment.columns().map(|c| Ciglet { inc: 1, op: op(c) }))
            .chain(back.into_iter().map(|(inc, op)| Ciglet { inc, op })),
    )
}

#[inline]
fn push_gap(gaps: &mut Vec<GapSegment>, position: usize, length: usize) {
    match gaps.last_mut() {
        Some(last) if last.position == position => last.length = last.length.saturating_add(length),
        _ => gaps.push(GapSegment { position, length }),
    }
}

/// Rebuilds the alignment described by a CIGAR string.
///
/// The alignment starts at `reference_start` of `reference`. Soft clips crop
/// the query, hard clips are not part of it. `N` skips reference like `D`,
/// and `P` inserts a gap into both rows.
///
/// ## Errors
///
/// The CIGAR must not be empty, the reference must be long enough for the
/// CIGAR, and the clips and query-consuming operations must add up to the
/// length of `query`.
pub fn alignment_from_cigar(
    cigar: &Cigar, reference: &[u8], reference_start: usize, query: &[u8],
) -> Result<PairwiseAlignment, CigarConversionError> {
    if cigar.is_empty() {
        return Err(CigarConversionError::EmptyCigar);
    }

    let reference_length = cigar.reference_length();
    let Some(reference_end) = reference_start
        .checked_add(reference_length)
        .filter(|&end| end <= reference.len())
    else {
        return Err(CigarConversionError::ReferenceTooShort {
            required:  reference_start.saturating_add(reference_length),
            available: reference.len(),
        });
    };

    let implied = cigar.query_length();
    if implied != query.len() {
        return Err(CigarConversionError::QueryLengthMismatch {
            implied,
            actual: query.len(),
        });
    }

    // Both totals are checked, so the running positions cannot overflow
    let mut soft_front = 0;
    let mut reference_position = 0;
    let mut query_position = 0;
    let mut reference_gaps = Vec::new();
    let mut query_gaps = Vec::new();
    let mut aligned = false;

    for Ciglet { inc, op } in cigar {
        match op {
            b'S' if !aligned => soft_front += inc,
            b'S' | b'H' => {}
            b'M' | b'=' | b'X' => {
                reference_position += inc;
                query_position += inc;
            }
            b'I' => {
                push_gap(&mut reference_gaps, reference_position, inc);
                query_position += inc;
            }
            b'D' | b'N' => {
                push_gap(&mut query_gaps, query_position, inc);
                reference_position += inc;
            }
            b'P' => {
                push_gap(&mut reference_gaps, reference_position, inc);
                push_gap(&mut query_gaps, query_position, inc);
            }
            _ => unreachable!("a validated CIGAR only holds known operations"),
        }
        aligned |= !matches!(op, b'S' | b'H');
    }

    Ok(PairwiseAlignment {
        first:  GappedSequence::new(reference[reference_start..reference_end].to_vec(), reference_gaps),
        second: GappedSequence::new(query[soft_front..soft_front + query_position].to_vec(), query_gaps),
    })
}
