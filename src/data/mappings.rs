use std::ops::Index;

/// Encodes text into the symbol ranks the aligners work on, and back.
///
/// Rank `i` belongs to the `i`-th symbol. Bytes that are not symbols take the
/// rank of the catch-all symbol, so encoding never fails.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ByteIndexMap<const S: usize> {
    ranks:   [u8; 256],
    symbols: [u8; S],
}

impl<const S: usize> ByteIndexMap<S> {
    /// Builds the mapping for `symbols`. Upper and lower case of a letter
    /// share a rank when `ignore_case` is set, and the symbols are then kept
    /// uppercased.
    ///
    /// ## Panics
    ///
    /// There must be at most 255 distinct symbols, and `catch_all` must be one
    /// of them.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn new(mut symbols: [u8; S], catch_all: u8, ignore_case: bool) -> Self {
        assert!(S < 256, "ranks are bytes");
        let catch_all = if ignore_case {
            catch_all.to_ascii_uppercase()
        } else {
            catch_all
        };

        let mut catch_all_rank = None;
        let mut i = 0;
        while i < S {
            if ignore_case {
                symbols[i] = symbols[i].to_ascii_uppercase();
            }
            let mut j = 0;
            while j < i {
                assert!(symbols[i] != symbols[j], "symbols must be distinct");
                j += 1;
            }
            if symbols[i] == catch_all {
                catch_all_rank = Some(i as u8);
            }
            i += 1;
        }
        let Some(catch_all_rank) = catch_all_rank else {
            panic!("the catch-all must be one of the symbols");
        };

        let mut ranks = [catch_all_rank; 256];
        let mut rank = 0;
        while rank < S {
            let symbol = symbols[rank];
            ranks[symbol as usize] = rank as u8;
            if ignore_case {
                ranks[symbol.to_ascii_lowercase() as usize] = rank as u8;
            }
            rank += 1;
        }
        ByteIndexMap { ranks, symbols }
    }

    /// The alphabet size.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        S
    }

    #[inline]
    #[must_use]
    pub const fn to_index(&self, b: u8) -> usize {
        self.ranks[b as usize] as usize
    }

    /// The symbol of `rank`, if the rank belongs to the alphabet.
    #[inline]
    #[must_use]
    pub const fn to_byte(&self, rank: u8) -> Option<u8> {
        if (rank as usize) < S {
            Some(self.symbols[rank as usize])
        } else {
            None
        }
    }

    #[must_use]
    pub fn encode(&self, bytes: &[u8]) -> Vec<u8> {
        bytes.iter().map(|&b| self[b]).collect()
    }

    /// Turns ranks back into symbols, writing `?` for ranks outside the
    /// alphabet.
    #[must_use]
    pub fn decode(&self, ranks: &[u8]) -> Vec<u8> {
        ranks.iter().map(|&r| self.to_byte(r).unwrap_or(b'?')).collect()
    }
}

impl<const S: usize> Index<u8> for ByteIndexMap<S> {
    type Output = u8;

    #[inline]
    fn index(&self, b: u8) -> &u8 {
        &self.ranks[b as usize]
    }
}

/// The four DNA bases, with anything else read as `A`.
pub const DNA_RANKS: ByteIndexMap<4> = ByteIndexMap::new(*b"ACGT", b'A', true);

/// DNA with `N` for every other byte.
pub const DNA5_RANKS: ByteIndexMap<5> = ByteIndexMap::new(*b"ACGTN", b'N', true);

/// The twenty standard amino acids in BLOSUM order, with `X` for every other
/// byte.
pub const PROTEIN_RANKS: ByteIndexMap<21> = ByteIndexMap::new(*b"ARNDCQEGHILKMFPSTWYVX", b'X', true);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn dna_round_trip() {
        let ranks = DNA_RANKS.encode(b"ACgtN");
        assert_eq!(ranks, vec![0, 1, 2, 3, 0]);
        assert_eq!(DNA_RANKS.decode(&ranks[..4]), b"ACGT");
        assert_eq!(DNA_RANKS.to_byte(4), None);
        assert_eq!(DNA5_RANKS.to_index(b'x'), 4);
        assert_eq!(PROTEIN_RANKS.len(), 21);
        assert_eq!(PROTEIN_RANKS.to_index(b'w'), 17);
    }

    #[test]
    fn case_sensitive_symbols() {
        let map = ByteIndexMap::new(*b"aAb", b'b', false);
        assert_eq!(map.encode(b"aAbB"), [0, 1, 2, 2]);
        assert_eq!(map.decode(&[1, 3]), b"A?");
    }
}
