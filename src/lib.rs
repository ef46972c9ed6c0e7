//! # sbvec
//!
//! A succinct bit vector: plain word storage plus a packed rank directory and
//! optional select samplings, answering `rank` in constant time and `select`
//! in constant or near-constant time. These operations underpin wavelet
//! trees, FM-indexes, LOUDS trees, and other compressed structures.
//!
//! Bits accumulate in a [`BitVecBuilder`]; building it produces an immutable
//! [`BitVec`] whose queries come from the [`RankSelect`] trait. The index
//! keeps one 128-bit entry per 512 bits of payload (an absolute 1-count plus
//! seven packed partial counts), and in-word select uses broadword arithmetic
//! with a byte lookup table.
//!
//! ## Quick Start
//!
//! ```
//! use sbvec::{BitVecBuilder, RankSelect};
//!
//! let mut builder = BitVecBuilder::new();
//! builder.push_bits(0b1011, 4);
//! builder.set(6000, true);
//! let bv = builder.build();
//!
//! assert_eq!(bv.len(), 6001);
//! assert_eq!(bv.rank1(4).unwrap(), 3);
//! assert_eq!(bv.select1(3).unwrap(), 6000);
//! assert_eq!(bv.select0(0).unwrap(), 2);
//! ```
//!
//! ## Features
//!
//! - `std` - Implement `std::error::Error` for [`Error`] (the crate is
//!   `no_std` + `alloc` otherwise)
//! - `serde` - Serde serialization for [`BitVec`]
//!
//! A compact binary round-trip is always available through
//! [`BitVec::to_bytes`] and [`BitVec::from_bytes`].

// Use no_std unless the std feature is enabled or we're in test mode
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// When using no_std, we need to explicitly link the alloc crate
#[cfg(not(any(test, feature = "std")))]
extern crate alloc;

// When using std, re-export alloc types from std for compatibility
#[cfg(any(test, feature = "std"))]
extern crate std as alloc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod binary;
mod bitvec;
mod broadword;
mod builder;
mod error;
mod rank;
mod raw;
mod select;
mod table;

pub use binary::MIN_SERIALIZED_BYTES;
pub use bitvec::BitVec;
pub use broadword::{popcount_word, select_in_word};
pub use builder::BitVecBuilder;
pub use error::{Error, Result};

/// Sentinel position reported by sentinel-style callers instead of an error.
///
/// Every query returns a [`Result`]; callers that prefer the sentinel shape
/// can write `bv.select1(k).unwrap_or(NOT_FOUND)`.
pub const NOT_FOUND: u64 = 0xFFFF_FFFF_FFFF_FFFF;

/// Options for building the query index.
///
/// Rank support is always built; the two select samplings are optional.
/// Without a sampling, the matching select query still works by searching the
/// rank directory, trading constant time for a logarithmic scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Sample 1-bit positions for constant-time `select1` (default: true)
    pub build_select1: bool,
    /// Sample 0-bit positions for constant-time `select0` (default: true)
    pub build_select0: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build_select1: true,
            build_select0: true,
        }
    }
}

/// Read-only rank/select queries over a bit sequence.
///
/// - `rank_b(i)` counts occurrences of bit `b` in positions `[0, i)`; it is
///   defined for `i` up to and including the bit length so callers can rank
///   over the whole sequence.
/// - `select_b(k)` returns the position of the `k`-th (0-indexed) occurrence
///   of bit `b`; `rank_b(select_b(k)) == k` always holds.
pub trait RankSelect {
    /// Count 1-bits in positions `[0, i)`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] when `i` exceeds the bit length.
    fn rank1(&self, i: u64) -> Result<u64>;

    /// Count 0-bits in positions `[0, i)`.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] when `i` exceeds the bit length.
    fn rank0(&self, i: u64) -> Result<u64> {
        Ok(i - self.rank1(i)?)
    }

    /// Count occurrences of `bit` in positions `[0, i)`.
    fn rank(&self, i: u64, bit: bool) -> Result<u64> {
        if bit { self.rank1(i) } else { self.rank0(i) }
    }

    /// Position of the `k`-th (0-indexed) 1-bit.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] when fewer than `k + 1` 1-bits exist.
    fn select1(&self, k: u64) -> Result<u64>;

    /// Position of the `k`-th (0-indexed) 0-bit.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] when fewer than `k + 1` 0-bits exist.
    fn select0(&self, k: u64) -> Result<u64>;

    /// Position of the `k`-th (0-indexed) occurrence of `bit`.
    fn select(&self, k: u64, bit: bool) -> Result<u64> {
        if bit { self.select1(k) } else { self.select0(k) }
    }
}
