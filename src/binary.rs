//! Self-describing binary serialization.
//!
//! The wire format is little-endian throughout and starts with its own total
//! size, so a reader can validate a buffer before touching any payload:
//!
//! ```text
//! u64 total_byte_size      includes this field
//! u64 len                  bit length
//! u64 num_ones
//! u32 word_count      u64 words[word_count]
//! u32 rank_count      { u64 abs, u64 rel } ranks[rank_count]
//! u32 s1_count        u64 select1_samples[s1_count]
//! u32 s0_count        u64 select0_samples[s0_count]
//! ```
//!
//! Every rank entry occupies exactly 16 bytes on the wire regardless of host
//! layout. The smallest well-formed buffer is 40 bytes (three `u64` header
//! fields plus four empty-section counts).

#[cfg(not(test))]
use alloc::vec::Vec;

use crate::bitvec::BitVec;
use crate::error::{Error, Result};
use crate::rank::{RankDirectory, RankEntry};
use crate::raw::RawBits;
use crate::select::SelectSamples;

/// Bytes in the fixed header: `total_byte_size`, `len`, `num_ones`, and the
/// four section counts.
pub const MIN_SERIALIZED_BYTES: usize = 3 * 8 + 4 * 4;

/// On-wire size of one rank entry.
const RANK_ENTRY_BYTES: usize = 16;

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn u32(&mut self) -> Result<u32> {
        let end = self.pos + 4;
        if end > self.data.len() {
            return Err(Error::InvalidFormat);
        }
        let mut buf = [0u8; 4];
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(u32::from_le_bytes(buf))
    }

    fn u64(&mut self) -> Result<u64> {
        let end = self.pos + 8;
        if end > self.data.len() {
            return Err(Error::InvalidFormat);
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(u64::from_le_bytes(buf))
    }

    /// Read a `u32` count followed by that many `u64` values, verifying the
    /// section fits before allocating.
    fn u64_section(&mut self) -> Result<Vec<u64>> {
        let count = self.u32()? as usize;
        if self.remaining() < count * 8 {
            return Err(Error::InvalidFormat);
        }
        let mut vals = Vec::with_capacity(count);
        for _ in 0..count {
            vals.push(self.u64()?);
        }
        Ok(vals)
    }

    fn rank_section(&mut self) -> Result<Vec<RankEntry>> {
        let count = self.u32()? as usize;
        if self.remaining() < count * RANK_ENTRY_BYTES {
            return Err(Error::InvalidFormat);
        }
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let abs = self.u64()?;
            let rel = self.u64()?;
            entries.push(RankEntry::from_parts(abs, rel));
        }
        Ok(entries)
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

fn push_u32(out: &mut Vec<u8>, val: u32) {
    out.extend_from_slice(&val.to_le_bytes());
}

fn push_u64(out: &mut Vec<u8>, val: u64) {
    out.extend_from_slice(&val.to_le_bytes());
}

impl BitVec {
    /// Serialize into the self-describing little-endian format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let words = self.raw.words();
        let entries = self.ranks.entries();
        let s1 = self.select1_samples.positions();
        let s0 = self.select0_samples.positions();

        let total = MIN_SERIALIZED_BYTES
            + words.len() * 8
            + entries.len() * RANK_ENTRY_BYTES
            + s1.len() * 8
            + s0.len() * 8;

        let mut out = Vec::with_capacity(total);
        push_u64(&mut out, total as u64);
        push_u64(&mut out, self.raw.len());
        push_u64(&mut out, self.num_ones);

        push_u32(&mut out, words.len() as u32);
        for &word in words {
            push_u64(&mut out, word);
        }

        push_u32(&mut out, entries.len() as u32);
        for entry in entries {
            let (abs, rel) = entry.to_parts();
            push_u64(&mut out, abs);
            push_u64(&mut out, rel);
        }

        push_u32(&mut out, s1.len() as u32);
        for &pos in s1 {
            push_u64(&mut out, pos);
        }

        push_u32(&mut out, s0.len() as u32);
        for &pos in s0 {
            push_u64(&mut out, pos);
        }

        out
    }

    /// Deserialize a vector previously produced by
    /// [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidLength`] when `data` is shorter than the 40-byte
    ///   minimum.
    /// - [`Error::InvalidFormat`] when the declared total size disagrees with
    ///   `data.len()`, a section extends past the buffer, or trailing bytes
    ///   remain unconsumed.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_SERIALIZED_BYTES {
            return Err(Error::InvalidLength);
        }
        let mut reader = Reader::new(data);
        let declared = reader.u64()?;
        if declared != data.len() as u64 {
            return Err(Error::InvalidFormat);
        }
        let len = reader.u64()?;
        let num_ones = reader.u64()?;
        let words = reader.u64_section()?;
        let entries = reader.rank_section()?;
        let s1 = reader.u64_section()?;
        let s0 = reader.u64_section()?;
        if reader.remaining() != 0 {
            return Err(Error::InvalidFormat);
        }
        Ok(BitVec {
            raw: RawBits::from_parts(words, len),
            num_ones,
            ranks: RankDirectory::from_entries(entries),
            select1_samples: SelectSamples::from_positions(s1),
            select0_samples: SelectSamples::from_positions(s0),
        })
    }
}
