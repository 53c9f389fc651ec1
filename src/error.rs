//! Error types for chunk append and decode operations.

use std::fmt;

/// Error returned when appending a sample fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendError {
    /// The encoded sample does not fit in the remaining capacity. The chunk
    /// is unchanged; seal it and append to a fresh chunk.
    ChunkFull,
    /// Timestamp is older than the last appended sample
    OutOfOrder { ts: u64, prev_ts: u64 },
}

/// Error returned when deserializing a chunk fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer is too short for a header plus the declared payload
    BufferTooShort { expected: usize, actual: usize },
    /// Header fields are inconsistent with each other
    InvalidHeader,
    /// Payload length does not match the header
    MalformedData,
}

impl fmt::Display for AppendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChunkFull => write!(f, "chunk is full"),
            Self::OutOfOrder { ts, prev_ts } => {
                write!(f, "timestamp {ts} is before previous timestamp {prev_ts}")
            }
        }
    }
}

impl std::error::Error for AppendError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooShort { expected, actual } => {
                write!(f, "buffer too short: expected at least {expected} bytes, got {actual}")
            }
            Self::InvalidHeader => write!(f, "invalid header in encoded chunk"),
            Self::MalformedData => write!(f, "encoded chunk is malformed or corrupted"),
        }
    }
}

impl std::error::Error for DecodeError {}
