//! # BitSet — Packed Bit Array for Coverage Indicators
//!
//! Backs the coverage indicator B (bit `k` set iff `k ∈ A+A`) and the
//! membership tests used by the augmentation solver. 8× memory reduction over
//! `Vec<bool>`: an indicator for n = 50M takes ~6 MB instead of 50 MB, which
//! keeps one private buffer per parallel worker affordable.
//!
//! Bit layout: bit `i` is stored in word `i / 64`, bit position `i % 64`.
//! Bits at positions `>= len` in the last word are always clear, so word-wise
//! equality and popcount are exact.

use anyhow::{anyhow, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// Create a bitset of `len` bits, all cleared.
    ///
    /// Allocation failure is reported as an error rather than aborting, so
    /// oversized instances surface to the caller.
    pub fn try_new(len: usize) -> Result<Self> {
        let num_words = len.div_ceil(64);
        let mut words = Vec::new();
        words
            .try_reserve_exact(num_words)
            .map_err(|e| anyhow!("cannot allocate {}-bit indicator: {}", len, e))?;
        words.resize(num_words, 0u64);
        Ok(BitSet { words, len })
    }

    /// Build a membership set over `[0, len)` from values; values `>= len`
    /// are ignored.
    pub fn try_from_values(len: usize, values: &[u64]) -> Result<Self> {
        let mut bits = Self::try_new(len)?;
        for &v in values {
            if (v as usize) < len {
                bits.set(v as usize);
            }
        }
        Ok(bits)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get bit `index`. Out-of-range indices read as clear.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Set bit `index`.
    #[inline]
    pub fn set(&mut self, index: usize) {
        debug_assert!(
            index < self.len,
            "BitSet index out of bounds: {} >= {}",
            index,
            self.len
        );
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    /// Word-wise OR of `other` into `self`. Both must have the same length.
    pub fn union_with(&mut self, other: &BitSet) {
        debug_assert_eq!(self.len, other.len);
        for (w, o) in self.words.iter_mut().zip(&other.words) {
            *w |= *o;
        }
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Number of clear bits within the logical length.
    pub fn count_zeros(&self) -> usize {
        self.len - self.count_ones()
    }

    /// Indices of all set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(wi, &word)| BitIter {
                word,
                base: wi * 64,
            })
    }

    /// Indices of all clear bits in `[from, len)`, ascending.
    pub fn iter_zeros_from(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        let len = self.len;
        let first_word = from / 64;
        self.words
            .iter()
            .enumerate()
            .skip(first_word)
            .flat_map(move |(wi, &word)| {
                let mut inverted = !word;
                if wi == first_word {
                    inverted &= u64::MAX.checked_shl((from % 64) as u32).unwrap_or(0);
                }
                BitIter {
                    word: inverted,
                    base: wi * 64,
                }
            })
            .take_while(move |&i| i < len)
    }
}

/// Iterator over set bits within a single u64 word.
struct BitIter {
    word: u64,
    base: usize,
}

impl Iterator for BitIter {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.word == 0 {
            return None;
        }
        let tz = self.word.trailing_zeros() as usize;
        self.word &= self.word - 1;
        Some(self.base + tz)
    }
}
