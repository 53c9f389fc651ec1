//! Fixed-capacity compressed chunk and its wire format.
//!
//! A chunk owns a zero-initialized payload of `capacity` bytes plus the
//! rolling codec state. The state is part of the wire format, so a chunk
//! written out with [`CompressedChunk::to_bytes`] and restored with
//! [`CompressedChunk::from_bytes`] keeps accepting appends exactly where the
//! original left off.

use serde::{Deserialize, Serialize};

use crate::decoder::ChunkIter;
use crate::encoder;
use crate::error::{AppendError, DecodeError};

/// Byte length of the serialized chunk header
pub const HEADER_SIZE: usize = 66;

// Header field offsets; every field is little-endian.
const OFF_SIZE: usize = 0;
const OFF_NUM_SAMPLES: usize = 8;
const OFF_BASE_TIMESTAMP: usize = 16;
const OFF_BASE_VALUE: usize = 24;
const OFF_IDX: usize = 32;
const OFF_PREV_TIMESTAMP: usize = 40;
const OFF_PREV_DELTA: usize = 48;
const OFF_PREV_VALUE: usize = 56;
const OFF_PREV_LEADING: usize = 64;
const OFF_PREV_TRAILING: usize = 65;

/// A fixed-capacity chunk of delta-of-delta/XOR compressed samples.
///
/// The first sample is held verbatim in the header; every later sample is
/// appended to the bit stream. Appending never reallocates: once a sample no
/// longer fits, [`append`](Self::append) reports
/// [`AppendError::ChunkFull`] with the chunk untouched, and the caller seals
/// it and starts the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedChunk {
    /// Payload bins; global bit `64 * k + i` is bit `i` of `data[k]`
    pub(crate) data: Vec<u64>,
    /// Capacity in bytes
    pub(crate) size: u64,
    pub(crate) num_samples: u64,
    pub(crate) base_timestamp: u64,
    /// Raw IEEE-754 bits of the first value
    pub(crate) base_value: u64,
    /// Write cursor in bits
    pub(crate) idx: u64,
    pub(crate) prev_timestamp: u64,
    pub(crate) prev_timestamp_delta: i64,
    /// Raw IEEE-754 bits of the last value
    pub(crate) prev_value: u64,
    pub(crate) prev_leading: u8,
    pub(crate) prev_trailing: u8,
}

impl CompressedChunk {
    /// Create an empty chunk with a zeroed payload of `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity.div_ceil(8)],
            size: capacity as u64,
            num_samples: 0,
            base_timestamp: 0,
            base_value: 0,
            idx: 0,
            prev_timestamp: 0,
            prev_timestamp_delta: 0,
            prev_value: 0,
            prev_leading: 0,
            prev_trailing: 0,
        }
    }

    /// Append a sample.
    ///
    /// Timestamps must be non-decreasing. The value is stored through its raw
    /// IEEE-754 bit pattern, so NaN payloads and signed zero survive a
    /// round trip.
    ///
    /// # Errors
    /// - [`AppendError::ChunkFull`] if the encoded sample does not fit; the
    ///   chunk state is rolled back and the sample belongs in a new chunk.
    /// - [`AppendError::OutOfOrder`] if `ts` is older than the previous
    ///   sample's timestamp.
    #[inline]
    pub fn append(&mut self, ts: u64, value: f64) -> Result<(), AppendError> {
        encoder::append(self, ts, value)
    }

    /// Number of samples currently encoded
    #[inline]
    #[must_use]
    pub fn num_samples(&self) -> u64 {
        self.num_samples
    }

    /// Payload capacity in bytes
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.size as usize
    }

    /// Bits of payload consumed so far
    #[inline]
    #[must_use]
    pub fn bits_used(&self) -> u64 {
        self.idx
    }

    /// `true` if no samples have been appended
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_samples == 0
    }

    /// Iterate the samples in insertion order.
    #[must_use]
    pub fn iter(&self) -> ChunkIter<'_> {
        ChunkIter::new(self)
    }

    /// Serialize header and payload into the wire format.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.size as usize);
        out.extend_from_slice(&self.size.to_le_bytes());
        out.extend_from_slice(&self.num_samples.to_le_bytes());
        out.extend_from_slice(&self.base_timestamp.to_le_bytes());
        out.extend_from_slice(&self.base_value.to_le_bytes());
        out.extend_from_slice(&self.idx.to_le_bytes());
        out.extend_from_slice(&self.prev_timestamp.to_le_bytes());
        out.extend_from_slice(&self.prev_timestamp_delta.to_le_bytes());
        out.extend_from_slice(&self.prev_value.to_le_bytes());
        out.push(self.prev_leading);
        out.push(self.prev_trailing);
        for bin in &self.data {
            out.extend_from_slice(&bin.to_le_bytes());
        }
        // The last bin may run past a capacity that is not a multiple of 8.
        out.truncate(HEADER_SIZE + self.size as usize);
        out
    }

    /// Deserialize a chunk previously produced by [`to_bytes`](Self::to_bytes).
    ///
    /// The restored chunk carries the full rolling codec state and keeps
    /// accepting appends.
    ///
    /// # Errors
    /// Returns a [`DecodeError`] if the buffer is shorter than header plus
    /// declared payload, longer than that, or the header fields contradict
    /// each other.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() < HEADER_SIZE {
            return Err(DecodeError::BufferTooShort {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let size = read_u64_le(bytes, OFF_SIZE);
        let num_samples = read_u64_le(bytes, OFF_NUM_SAMPLES);
        let base_timestamp = read_u64_le(bytes, OFF_BASE_TIMESTAMP);
        let base_value = read_u64_le(bytes, OFF_BASE_VALUE);
        let idx = read_u64_le(bytes, OFF_IDX);
        let prev_timestamp = read_u64_le(bytes, OFF_PREV_TIMESTAMP);
        let prev_timestamp_delta = read_u64_le(bytes, OFF_PREV_DELTA) as i64;
        let prev_value = read_u64_le(bytes, OFF_PREV_VALUE);
        let prev_leading = bytes[OFF_PREV_LEADING];
        let prev_trailing = bytes[OFF_PREV_TRAILING];

        if size > usize::MAX as u64 {
            return Err(DecodeError::InvalidHeader);
        }
        let expected = (size as usize)
            .checked_add(HEADER_SIZE)
            .ok_or(DecodeError::InvalidHeader)?;
        if bytes.len() < expected {
            return Err(DecodeError::BufferTooShort {
                expected,
                actual: bytes.len(),
            });
        }
        if bytes.len() > expected {
            return Err(DecodeError::MalformedData);
        }
        if idx > size * 8
            || (num_samples == 0 && idx != 0)
            || u32::from(prev_leading) + u32::from(prev_trailing) > 64
        {
            return Err(DecodeError::InvalidHeader);
        }

        let payload = &bytes[HEADER_SIZE..];
        let mut data = vec![0u64; (size as usize).div_ceil(8)];
        for (k, bin) in data.iter_mut().enumerate() {
            let start = k * 8;
            let end = (start + 8).min(payload.len());
            let mut word = [0u8; 8];
            word[..end - start].copy_from_slice(&payload[start..end]);
            *bin = u64::from_le_bytes(word);
        }

        Ok(Self {
            data,
            size,
            num_samples,
            base_timestamp,
            base_value,
            idx,
            prev_timestamp,
            prev_timestamp_delta,
            prev_value,
            prev_leading,
            prev_trailing,
        })
    }
}

#[inline]
fn read_u64_le(buf: &[u8], offset: usize) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_le_bytes(word)
}
