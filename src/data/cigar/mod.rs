use crate::data::err::GetCode;
use std::{error::Error, fmt, str::FromStr};

/// One CIGAR operation and how many columns it spans.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Ciglet {
    /// Number of alignment columns
    pub inc: usize,
    /// Operation code, one of `MIDNSHPX=`
    pub op:  u8,
}

impl Ciglet {
    /// Whether the operation advances along the reference.
    #[inline]
    #[must_use]
    pub const fn consumes_reference(&self) -> bool {
        matches!(self.op, b'M' | b'D' | b'N' | b'=' | b'X')
    }

    /// Whether the operation advances along the query. Soft clips do, hard
    /// clips do not.
    #[inline]
    #[must_use]
    pub const fn consumes_query(&self) -> bool {
        matches!(self.op, b'M' | b'I' | b'S' | b'=' | b'X')
    }
}

impl fmt::Display for Ciglet {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(itoa::Buffer::new().format(self.inc))?;
        write!(f, "{}", self.op as char)
    }
}

impl fmt::Debug for Ciglet {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.inc, self.op as char)
    }
}

/// A condensed [CIGAR string] describing a pairwise alignment, with sequence
/// 1 as the reference and sequence 2 as the query.
///
/// The operations are kept parsed. Adjacent operations never share an opcode
/// and no operation has length zero. The empty CIGAR prints as `*`.
///
/// [CIGAR string]: https://samtools.github.io/hts-specs/SAMv1.pdf
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Cigar(Vec<Ciglet>);

const fn is_cigar_op(b: u8) -> bool {
    matches!(b, b'M' | b'I' | b'D' | b'N' | b'S' | b'H' | b'P' | b'X' | b'=')
}

impl Cigar {
    /// Creates an empty CIGAR.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Cigar(Vec::new())
    }

    /// Builds a CIGAR from a sequence of operations, merging adjacent
    /// ciglets with the same opcode and skipping zero lengths.
    #[must_use]
    pub fn from_ciglets(ciglets: impl IntoIterator<Item = Ciglet>) -> Self {
        let mut condensed: Vec<Ciglet> = Vec::new();
        for ciglet in ciglets.into_iter().filter(|c| c.inc > 0) {
            match condensed.last_mut() {
                Some(last) if last.op == ciglet.op => last.inc += ciglet.inc,
                _ => condensed.push(ciglet),
            }
        }
        Cigar(condensed)
    }

    /// The number of reference symbols covered by the alignment, saturating
    /// at `usize::MAX`.
    #[must_use]
    pub fn reference_length(&self) -> usize {
        self.iter()
            .filter(Ciglet::consumes_reference)
            .fold(0, |length, c| length.saturating_add(c.inc))
    }

    /// The number of query symbols the CIGAR accounts for, including soft
    /// clips, saturating at `usize::MAX`.
    #[must_use]
    pub fn query_length(&self) -> usize {
        self.iter()
            .filter(Ciglet::consumes_query)
            .fold(0, |length, c| length.saturating_add(c.inc))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Ciglet> + '_ {
        self.0.iter().copied()
    }

    /// The number of operations.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Cigar {
    type Item = Ciglet;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Ciglet>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("*");
        }
        self.iter().try_for_each(|ciglet| write!(f, "{ciglet}"))
    }
}

impl fmt::Debug for Cigar {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl TryFrom<&[u8]> for Cigar {
    type Error = CigarParseError;

    /// Parses a CIGAR. `*` and surrounding whitespace parse to the empty
    /// CIGAR, and repeated opcodes are merged.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes = bytes.trim_ascii();
        if bytes == b"*" {
            return Ok(Cigar::new());
        }

        let mut ciglets = Vec::new();
        let mut inc: Option<usize> = None;
        for &b in bytes {
            if b.is_ascii_digit() {
                let value = inc
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(usize::from(b - b'0')))
                    .ok_or(CigarParseError::LengthOverflow)?;
                inc = Some(value);
            } else if is_cigar_op(b) {
                match inc.take() {
                    None => return Err(CigarParseError::MissingLength(b)),
                    Some(0) => return Err(CigarParseError::ZeroLength(b)),
                    Some(inc) => ciglets.push(Ciglet { inc, op: b }),
                }
            } else {
                return Err(CigarParseError::UnknownOperation(b));
            }
        }

        if inc.is_some() {
            return Err(CigarParseError::MissingOperation);
        }
        Ok(Cigar::from_ciglets(ciglets))
    }
}

impl TryFrom<&str> for Cigar {
    type Error = CigarParseError;

    #[inline]
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Cigar::try_from(s.as_bytes())
    }
}

impl FromStr for Cigar {
    type Err = CigarParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cigar::try_from(s.as_bytes())
    }
}

/// Errors when parsing a CIGAR string.
#[non_exhaustive]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum CigarParseError {
    /// A byte that is neither a digit nor one of `MIDNSHPX=`
    UnknownOperation(u8),
    /// An operation with length zero
    ZeroLength(u8),
    /// A length that does not fit into `usize`
    LengthOverflow,
    /// An operation without a preceding length
    MissingLength(u8),
    /// A trailing length without an operation
    MissingOperation,
}

impl fmt::Display for CigarParseError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CigarParseError::UnknownOperation(b) => write!(
                f,
                "The CIGAR operation '{}' is not one of M, I, D, N, S, H, P, X, =",
                b.escape_ascii()
            ),
            CigarParseError::ZeroLength(op) => write!(f, "The CIGAR operation '{}' has length zero", *op as char),
            CigarParseError::LengthOverflow => write!(f, "A CIGAR length exceeds {}", usize::MAX),
            CigarParseError::MissingLength(op) => {
                write!(f, "The CIGAR operation '{}' is not preceded by a length", *op as char)
            }
            CigarParseError::MissingOperation => write!(f, "The CIGAR ends in a length without an operation"),
        }
    }
}

impl fmt::Debug for CigarParseError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl Error for CigarParseError {}
impl GetCode for CigarParseError {}

#[cfg(test)]
mod test;
