//! Seeded random sequences for tests and experiments.

use rand_xoshiro::{
    Xoshiro256PlusPlus,
    rand_core::{RngCore, SeedableRng},
};
use std::ops::Range;

/// A random sequence of `length` symbols drawn from `alpha`.
#[must_use]
pub fn rand_sequence(alpha: &[u8], length: usize, seed: u64) -> Vec<u8> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    draw(&mut rng, alpha, length)
}

/// A random rank-encoded sequence over the ranks `0..alphabet_size`.
#[must_use]
pub fn rand_ranks(alphabet_size: u8, length: usize, seed: u64) -> Vec<u8> {
    let alpha: Vec<u8> = (0..alphabet_size).collect();
    rand_sequence(&alpha, length, seed)
}

/// `count` pairs of random rank-encoded sequences whose lengths are drawn
/// from `lengths`.
///
/// ## Panics
///
/// `lengths` must not be empty.
#[must_use]
pub fn rand_pairs(alphabet_size: u8, lengths: Range<usize>, count: usize, seed: u64) -> Vec<(Vec<u8>, Vec<u8>)> {
    assert!(!lengths.is_empty(), "the length range must not be empty");
    let alpha: Vec<u8> = (0..alphabet_size).collect();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let length = |rng: &mut Xoshiro256PlusPlus| lengths.start + rng.next_u64() as usize % lengths.len();

    (0..count)
        .map(|_| {
            let (len1, len2) = (length(&mut rng), length(&mut rng));
            (draw(&mut rng, &alpha, len1), draw(&mut rng, &alpha, len2))
        })
        .collect()
}

/// A copy of `sequence` with about one in `rate` positions substituted,
/// deleted or followed by an inserted symbol, which keeps the optimal
/// alignment of the two close to the main diagonal.
///
/// ## Panics
///
/// `rate` must not be zero.
#[must_use]
pub fn mutate(sequence: &[u8], alphabet_size: u8, rate: u32, seed: u64) -> Vec<u8> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut mutated = Vec::with_capacity(sequence.len());
    for &symbol in sequence {
        if rng.next_u32() % rate != 0 {
            mutated.push(symbol);
            continue;
        }
        let random = (rng.next_u32() % u32::from(alphabet_size)) as u8;
        match rng.next_u32() % 3 {
            0 => mutated.push(random),
            1 => {}
            _ => mutated.extend([symbol, random]),
        }
    }
    mutated
}

#[inline]
fn draw(rng: &mut Xoshiro256PlusPlus, alpha: &[u8], length: usize) -> Vec<u8> {
    (0..length).map(|_| alpha[rng.next_u32() as usize % alpha.len()]).collect()
}
