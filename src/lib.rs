//! `doubledelta` - Gorilla-style time series compression
//!
//! A bit-packed codec for `(timestamp, f64)` samples in fixed-capacity
//! chunks, following the scheme of Facebook's Gorilla paper (*"Gorilla: A
//! Fast, Scalable, In-Memory Time Series Database"*, VLDB 2015, section 4.1):
//! delta-of-delta encoding for timestamps and XOR encoding for values.
//!
//! # Features
//! - **High compression**: a steady series costs ~2 bits per sample
//! - **O(1) append**: samples are encoded as they arrive, nothing is re-encoded
//! - **Lossless**: bit-exact reconstruction, NaN payloads and signed zero included
//! - **Fixed footprint**: a chunk never reallocates; a full chunk reports
//!   [`AppendError::ChunkFull`] and rolls the failed append back
//!
//! # Example
//! ```
//! use doubledelta::CompressedChunk;
//!
//! let mut chunk = CompressedChunk::with_capacity(4096);
//! chunk.append(1_760_000_000, 21.5).unwrap();
//! chunk.append(1_760_000_300, 21.5).unwrap();
//! chunk.append(1_760_000_600, 22.0).unwrap();
//!
//! let samples: Vec<_> = chunk.iter().collect();
//! assert_eq!(samples.len(), 3);
//! assert_eq!(samples[0].ts, 1_760_000_000);
//! assert_eq!(samples[2].value, 22.0);
//! ```
//!
//! # Encoding Format
//!
//! The first sample of a chunk lives verbatim in the header. Every later
//! sample appends two variable-length records to the bit stream, which is
//! addressed as 64-bit little-endian bins with bit 0 the least significant.
//!
//! ## Timestamps
//!
//! The delta-of-delta between consecutive timestamp deltas is written with a
//! unary-style prefix, consumed one bit at a time (a 1-bit widens the bucket,
//! a 0-bit stops):
//!
//! | leading 1-bits | payload bits | range |
//! |----------------|--------------|-------|
//! | 0 | 0  | 0 |
//! | 1 | 5  | [-16, 15] |
//! | 2 | 8  | [-128, 127] |
//! | 3 | 11 | [-1024, 1023] |
//! | 4 | 15 | [-16384, 16383] |
//! | 5 | 32 | [-2^31, 2^31 - 1] |
//! | 6 | 64 | full i64 (no stop bit) |
//!
//! Payloads are the low bits of the two's-complement value and are
//! sign-extended on read.
//!
//! ## Values
//!
//! Each value is XORed with the previous value's bit pattern:
//!
//! - `0` — XOR is zero, nothing else is written
//! - `1 0` + block — the significant block, sent through the previous
//!   (leading, trailing) window
//! - `1 1` + 5-bit leading count + 6-bit (block size - 1) + block — a fresh
//!   window
//!
//! A fresh window is only skipped when the old one still covers the block
//! and doing so actually saves bits. Leading-zero counts above 31 are stored
//! as 31 so they fit the 5-bit field.
//!
//! ## Wire format
//!
//! [`CompressedChunk::to_bytes`] emits a 66-byte little-endian header
//! (capacity, sample count, first sample, cursor, rolling codec state)
//! followed by the payload bytes. [`CompressedChunk::from_bytes`] restores a
//! chunk that keeps accepting appends.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

mod bins;
pub mod chunk;
mod constants;
pub mod decoder;
mod encoder;
pub mod error;
pub mod sample;

pub use chunk::{CompressedChunk, HEADER_SIZE};
pub use decoder::{decode, ChunkIter};
pub use error::{AppendError, DecodeError};
pub use sample::Sample;
