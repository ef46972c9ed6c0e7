//! Immutable bit vector with rank/select support.
//!
//! [`BitVec`] is the queryable handle produced by
//! [`BitVecBuilder::build`](crate::BitVecBuilder::build). It owns the raw
//! words, the rank directory, and the optional select samplings; nothing can
//! mutate it afterwards, so sharing it across threads for concurrent reads is
//! safe.
//!
//! # Example
//!
//! ```
//! use sbvec::{BitVecBuilder, RankSelect};
//!
//! let mut builder = BitVecBuilder::new();
//! builder.push_bits(0b1011, 4);
//! let bv = builder.build();
//!
//! assert_eq!(bv.len(), 4);
//! assert_eq!(bv.rank1(4).unwrap(), 3);
//! assert_eq!(bv.select1(2).unwrap(), 3);
//! assert_eq!(bv.select0(0).unwrap(), 2);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::broadword::{low_mask, popcount_word, select_in_word};
use crate::error::{Error, Result};
use crate::rank::{BLOCK_RATE, LARGE_BLOCK, RankDirectory, SMALL_BLOCK};
use crate::raw::RawBits;
use crate::select::{SearchHint, SelectSamples};
use crate::{Config, RankSelect};

/// Window length (in large blocks) below which select scans linearly instead
/// of binary-searching.
const LINEAR_SCAN_BLOCKS: u64 = 10;

/// An immutable succinct bit vector.
///
/// Answers `rank` in constant time and `select` in constant time when the
/// corresponding sampling was built (logarithmic in the number of large
/// blocks otherwise).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitVec {
    pub(crate) raw: RawBits,
    pub(crate) num_ones: u64,
    pub(crate) ranks: RankDirectory,
    pub(crate) select1_samples: SelectSamples,
    pub(crate) select0_samples: SelectSamples,
}

impl BitVec {
    /// Freeze `raw` and build the query index over it.
    pub(crate) fn from_raw(raw: RawBits, config: Config) -> Self {
        let (ranks, num_ones) = RankDirectory::build(raw.words());
        let select1_samples = if config.build_select1 {
            SelectSamples::build(raw.words(), raw.len(), true)
        } else {
            SelectSamples::disabled()
        };
        let select0_samples = if config.build_select0 {
            SelectSamples::build(raw.words(), raw.len(), false)
        } else {
            SelectSamples::disabled()
        };
        Self {
            raw,
            num_ones,
            ranks,
            select1_samples,
            select0_samples,
        }
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> u64 {
        self.raw.len()
    }

    /// Returns true if the vector holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Total number of 1-bits.
    #[inline]
    pub fn count_ones(&self) -> u64 {
        self.num_ones
    }

    /// Total number of 0-bits.
    #[inline]
    pub fn count_zeros(&self) -> u64 {
        self.raw.len() - self.num_ones
    }

    /// Total number of bits equal to `bit`.
    #[inline]
    pub fn count(&self, bit: bool) -> u64 {
        if bit { self.count_ones() } else { self.count_zeros() }
    }

    /// Read the bit at position `i`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] when `i >= len()`.
    #[inline]
    pub fn get(&self, i: u64) -> Result<bool> {
        self.raw.get(i)
    }

    /// Read the `len`-bit field starting at `pos`, `len` in `1..=64`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] when `pos + len > self.len()`.
    #[inline]
    pub fn get_bits(&self, pos: u64, len: u64) -> Result<u64> {
        self.raw.get_bits(pos, len)
    }

    /// Find the large block holding occurrence `k` within `begin..end`.
    ///
    /// `zeros` flips the per-block cumulative counts to 0-counts. Short
    /// windows scan linearly; anything longer binary-searches.
    fn refine_window(&self, k: u64, mut begin: u64, mut end: u64, zeros: bool) -> u64 {
        let count_before = |id: u64| {
            if zeros {
                self.ranks.zeros_before(id as usize)
            } else {
                self.ranks.abs(id as usize)
            }
        };
        if begin + LINEAR_SCAN_BLOCKS >= end {
            while k >= count_before(begin + 1) {
                begin += 1;
            }
        } else {
            while begin + 1 < end {
                let pivot = (begin + end) / 2;
                if k < count_before(pivot) {
                    end = pivot;
                } else {
                    begin = pivot;
                }
            }
        }
        begin
    }
}

impl RankSelect for BitVec {
    fn rank1(&self, i: u64) -> Result<u64> {
        if i > self.raw.len() {
            return Err(Error::OutOfBounds);
        }
        let block = (i / SMALL_BLOCK) as usize;
        let entry = self.ranks.entry((i / LARGE_BLOCK) as usize);
        let mut offset = entry.abs();
        let phase = block % BLOCK_RATE;
        if phase != 0 {
            offset += entry.rel(phase);
        }
        let r = i % SMALL_BLOCK;
        if r != 0 {
            offset += u64::from(popcount_word(self.raw.word(block) & low_mask(r)));
        }
        Ok(offset)
    }

    fn select1(&self, k: u64) -> Result<u64> {
        if k >= self.num_ones {
            return Err(Error::OutOfBounds);
        }
        let (begin, end) = match self.select1_samples.hint(k) {
            SearchHint::Position(pos) => return Ok(pos),
            SearchHint::Window { begin, end } => (begin, end),
            SearchHint::Unbounded => (0, self.ranks.len() as u64),
        };
        let large = self.refine_window(k, begin, end, false);
        let entry = self.ranks.entry(large as usize);
        let mut k = k - entry.abs();
        let (sub, consumed) = entry.locate_one(k);
        k -= consumed;
        let block = large as usize * BLOCK_RATE + sub;
        Ok(select_in_word(
            self.raw.word(block),
            k,
            block as u64 * SMALL_BLOCK,
        ))
    }

    fn select0(&self, k: u64) -> Result<u64> {
        if k >= self.count_zeros() {
            return Err(Error::OutOfBounds);
        }
        let (begin, end) = match self.select0_samples.hint(k) {
            SearchHint::Position(pos) => return Ok(pos),
            SearchHint::Window { begin, end } => (begin, end),
            SearchHint::Unbounded => (0, self.ranks.len() as u64),
        };
        let large = self.refine_window(k, begin, end, true);
        let entry = self.ranks.entry(large as usize);
        let mut k = k - self.ranks.zeros_before(large as usize);
        let (sub, consumed) = entry.locate_zero(k);
        k -= consumed;
        let block = large as usize * BLOCK_RATE + sub;
        Ok(select_in_word(
            !self.raw.word(block),
            k,
            block as u64 * SMALL_BLOCK,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BitVecBuilder;

    fn from_words(words: &[u64], len: u64) -> BitVec {
        let mut raw = RawBits::from_parts(words.to_vec(), len);
        raw.mask_tail();
        BitVec::from_raw(raw, Config::default())
    }

    #[test]
    fn test_empty_vector() {
        let bv = BitVec::from_raw(RawBits::new(), Config::default());
        assert_eq!(bv.len(), 0);
        assert!(bv.is_empty());
        assert_eq!(bv.count_ones(), 0);
        assert_eq!(bv.count_zeros(), 0);
        assert_eq!(bv.rank1(0).unwrap(), 0);
        assert_eq!(bv.rank0(0).unwrap(), 0);
        assert_eq!(bv.rank1(1), Err(Error::OutOfBounds));
        assert_eq!(bv.select1(0), Err(Error::OutOfBounds));
        assert_eq!(bv.select0(0), Err(Error::OutOfBounds));
        assert_eq!(bv.get(0), Err(Error::OutOfBounds));
    }

    #[test]
    fn test_rank_simple() {
        // Bits 1 0 1 1 0 0 1 0 from the LSB up.
        let bv = from_words(&[0b0100_1101], 8);
        assert_eq!(bv.rank1(0).unwrap(), 0);
        assert_eq!(bv.rank1(1).unwrap(), 1);
        assert_eq!(bv.rank1(3).unwrap(), 2);
        assert_eq!(bv.rank1(4).unwrap(), 3);
        assert_eq!(bv.rank1(8).unwrap(), 4);
        assert_eq!(bv.rank0(8).unwrap(), 4);
        assert_eq!(bv.rank1(9), Err(Error::OutOfBounds));
    }

    #[test]
    fn test_rank_at_len_word_aligned() {
        let bv = from_words(&[u64::MAX, u64::MAX], 128);
        assert_eq!(bv.rank1(64).unwrap(), 64);
        assert_eq!(bv.rank1(128).unwrap(), 128);
        assert_eq!(bv.rank1(129), Err(Error::OutOfBounds));
    }

    #[test]
    fn test_rank_at_large_block_boundary() {
        let bv = from_words(&[u64::MAX; 8], 512);
        assert_eq!(bv.rank1(511).unwrap(), 511);
        assert_eq!(bv.rank1(512).unwrap(), 512);
    }

    #[test]
    fn test_select_simple() {
        let bv = from_words(&[0b0100_1101], 8);
        assert_eq!(bv.select1(0).unwrap(), 0);
        assert_eq!(bv.select1(1).unwrap(), 2);
        assert_eq!(bv.select1(2).unwrap(), 3);
        assert_eq!(bv.select1(3).unwrap(), 6);
        assert_eq!(bv.select1(4), Err(Error::OutOfBounds));
        assert_eq!(bv.select0(0).unwrap(), 1);
        assert_eq!(bv.select0(1).unwrap(), 4);
        assert_eq!(bv.select0(3).unwrap(), 7);
        assert_eq!(bv.select0(4), Err(Error::OutOfBounds));
    }

    #[test]
    fn test_select_across_large_blocks() {
        let mut words = vec![0u64; 16];
        words[7] = 1 << 63;
        words[8] = 1;
        let bv = from_words(&words, 1024);
        assert_eq!(bv.count_ones(), 2);
        assert_eq!(bv.select1(0).unwrap(), 511);
        assert_eq!(bv.select1(1).unwrap(), 512);
        assert_eq!(bv.rank1(512).unwrap(), 1);
    }

    #[test]
    fn test_select_sampled_ordinal_fast_path() {
        // Dense vector: ordinal 512 is sampled and must hit the fast path.
        let bv = from_words(&vec![u64::MAX; 24], 24 * 64);
        assert_eq!(bv.select1(512).unwrap(), 512);
        assert_eq!(bv.select1(1024).unwrap(), 1024);
        assert_eq!(bv.select1(513).unwrap(), 513);
    }

    #[test]
    fn test_select_without_samples_matches() {
        let words: Vec<u64> = (0..64u64)
            .map(|i| i.wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .collect();
        let len = 64 * 64;
        let sampled = from_words(&words, len);
        let mut raw = RawBits::from_parts(words, len);
        raw.mask_tail();
        let plain = BitVec::from_raw(
            raw,
            Config {
                build_select1: false,
                build_select0: false,
            },
        );
        for k in 0..sampled.count_ones() {
            assert_eq!(sampled.select1(k).unwrap(), plain.select1(k).unwrap(), "k={}", k);
        }
        for k in 0..sampled.count_zeros() {
            assert_eq!(sampled.select0(k).unwrap(), plain.select0(k).unwrap(), "k={}", k);
        }
    }

    #[test]
    fn test_rank_select_roundtrip() {
        let bv = from_words(&[0xAAAA_AAAA_AAAA_AAAA, 0x5555_5555_5555_5555], 128);
        for i in 0..128 {
            if bv.get(i).unwrap() {
                assert_eq!(bv.select1(bv.rank1(i).unwrap()).unwrap(), i);
            } else {
                assert_eq!(bv.select0(bv.rank0(i).unwrap()).unwrap(), i);
            }
        }
    }

    #[test]
    fn test_partial_tail_rank_uses_filled_counts() {
        // n = 704: the trailing large block ends in sub-block 2, so
        // rank1(704) reads a partial count written by the trailing fill.
        let mut builder = BitVecBuilder::new();
        for pos in [0u64, 600, 650, 700] {
            builder.set(pos, true);
        }
        builder.set(703, false);
        let bv = builder.build();
        assert_eq!(bv.len(), 704);
        assert_eq!(bv.count_ones(), 4);
        assert_eq!(bv.rank1(704).unwrap(), 4);
        assert_eq!(bv.select1(3).unwrap(), 700);
        // Position 699 is a 0-bit preceded by three 1-bits.
        assert_eq!(bv.select0(696).unwrap(), 699);
        assert_eq!(bv.select0(697).unwrap(), 701);
    }

    #[test]
    fn test_count_dispatch() {
        let bv = from_words(&[0xF0], 8);
        assert_eq!(bv.count(true), 4);
        assert_eq!(bv.count(false), 4);
        assert_eq!(bv.rank(8, true).unwrap(), 4);
        assert_eq!(bv.rank(8, false).unwrap(), 4);
        assert_eq!(bv.select(0, true).unwrap(), 4);
        assert_eq!(bv.select(0, false).unwrap(), 0);
    }
}
