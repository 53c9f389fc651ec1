//! Append path: delta-of-delta timestamps, XOR-compressed values.
//!
//! Both codecs check remaining capacity before touching the bit stream, and
//! the outer append rolls back everything a partially written sample left
//! behind, so a failed append is observationally a no-op.

use crate::bins::{append_bits, clear_bits};
use crate::chunk::CompressedChunk;
use crate::constants::{
    in_range, int_to_bin, CMPR_L1, CMPR_L2, CMPR_L3, CMPR_L4, CMPR_L5, DOUBLE_BLOCK_ADJUST,
    DOUBLE_BLOCK_SIZE, DOUBLE_LEADING, MAX_LEADING,
};
use crate::error::AppendError;

/// Bits of payload still unwritten
#[inline]
fn space_left(chunk: &CompressedChunk) -> u64 {
    chunk.size * 8 - chunk.idx
}

#[inline]
fn check_space(chunk: &CompressedChunk, need: u32) -> Result<(), AppendError> {
    if u64::from(need) <= space_left(chunk) {
        Ok(())
    } else {
        Err(AppendError::ChunkFull)
    }
}

/// Append one sample, rolling back on failure.
pub(crate) fn append(chunk: &mut CompressedChunk, ts: u64, value: f64) -> Result<(), AppendError> {
    if chunk.num_samples == 0 {
        // The first sample lives in the header, not the bit stream.
        chunk.base_timestamp = ts;
        chunk.prev_timestamp = ts;
        chunk.base_value = value.to_bits();
        chunk.prev_value = value.to_bits();
        chunk.prev_timestamp_delta = 0;
        chunk.num_samples = 1;
        return Ok(());
    }

    if ts < chunk.prev_timestamp {
        return Err(AppendError::OutOfOrder {
            ts,
            prev_ts: chunk.prev_timestamp,
        });
    }

    let idx = chunk.idx;
    let prev_timestamp = chunk.prev_timestamp;
    let prev_timestamp_delta = chunk.prev_timestamp_delta;

    let result = append_timestamp(chunk, ts).and_then(|()| append_value(chunk, value));
    if let Err(err) = result {
        // The value codec can fail with the timestamp bits already down;
        // zero them so the region past the cursor stays writable.
        clear_bits(&mut chunk.data, idx, chunk.idx);
        chunk.idx = idx;
        chunk.prev_timestamp = prev_timestamp;
        chunk.prev_timestamp_delta = prev_timestamp_delta;
        return Err(err);
    }

    chunk.num_samples += 1;
    Ok(())
}

/// Encode one timestamp as a delta-of-delta.
///
/// Every space check reserves one bit beyond the integer encoding, the
/// minimum the value codec can consume. The encoder picks the narrowest
/// bucket whose range contains the delta-of-delta; one 1-bit of prefix per
/// rejected bucket, a 0-bit to stop, six 1-bits for the raw 64-bit escape.
fn append_timestamp(chunk: &mut CompressedChunk, ts: u64) -> Result<(), AppendError> {
    let cur_delta = ts.wrapping_sub(chunk.prev_timestamp) as i64;
    let dod = cur_delta.wrapping_sub(chunk.prev_timestamp_delta);

    if dod == 0 {
        check_space(chunk, 1 + 1)?;
        append_bits(&mut chunk.data, &mut chunk.idx, 0x00, 1);
    } else if in_range(dod, CMPR_L1) {
        check_space(chunk, 2 + u32::from(CMPR_L1) + 1)?;
        append_bits(&mut chunk.data, &mut chunk.idx, 0x01, 2);
        append_bits(&mut chunk.data, &mut chunk.idx, int_to_bin(dod, CMPR_L1), CMPR_L1);
    } else if in_range(dod, CMPR_L2) {
        check_space(chunk, 3 + u32::from(CMPR_L2) + 1)?;
        append_bits(&mut chunk.data, &mut chunk.idx, 0x03, 3);
        append_bits(&mut chunk.data, &mut chunk.idx, int_to_bin(dod, CMPR_L2), CMPR_L2);
    } else if in_range(dod, CMPR_L3) {
        check_space(chunk, 4 + u32::from(CMPR_L3) + 1)?;
        append_bits(&mut chunk.data, &mut chunk.idx, 0x07, 4);
        append_bits(&mut chunk.data, &mut chunk.idx, int_to_bin(dod, CMPR_L3), CMPR_L3);
    } else if in_range(dod, CMPR_L4) {
        check_space(chunk, 5 + u32::from(CMPR_L4) + 1)?;
        append_bits(&mut chunk.data, &mut chunk.idx, 0x0f, 5);
        append_bits(&mut chunk.data, &mut chunk.idx, int_to_bin(dod, CMPR_L4), CMPR_L4);
    } else if in_range(dod, CMPR_L5) {
        check_space(chunk, 6 + u32::from(CMPR_L5) + 1)?;
        append_bits(&mut chunk.data, &mut chunk.idx, 0x1f, 6);
        append_bits(&mut chunk.data, &mut chunk.idx, int_to_bin(dod, CMPR_L5), CMPR_L5);
    } else {
        check_space(chunk, 6 + 64 + 1)?;
        append_bits(&mut chunk.data, &mut chunk.idx, 0x3f, 6);
        append_bits(&mut chunk.data, &mut chunk.idx, dod as u64, 64);
    }

    chunk.prev_timestamp_delta = cur_delta;
    chunk.prev_timestamp = ts;
    Ok(())
}

/// Encode one value as an XOR against the previous value.
///
/// A zero XOR costs the single bit the timestamp check reserved. Otherwise
/// the significant block is written either through the previous
/// (leading, trailing) window or through a fresh one, whichever is cheaper;
/// the full cost of the chosen branch is checked before any bit is emitted.
fn append_value(chunk: &mut CompressedChunk, value: f64) -> Result<(), AppendError> {
    let bits = value.to_bits();
    let xor = bits ^ chunk.prev_value;

    if xor == 0 {
        append_bits(&mut chunk.data, &mut chunk.idx, 0, 1);
        return Ok(());
    }

    // The 5-bit leading field cannot hold 32; a larger count is stored as 31
    // and the block keeps the surplus zero bits.
    let leading = (xor.leading_zeros() as u8).min(MAX_LEADING);
    let trailing = xor.trailing_zeros() as u8;
    debug_assert!(leading + trailing <= 64);
    let block_size = 64 - leading - trailing;

    debug_assert!(chunk.prev_leading + chunk.prev_trailing <= 64);
    let prev_block_size = 64 - chunk.prev_leading - chunk.prev_trailing;
    let new_window_bits =
        u32::from(DOUBLE_LEADING) + u32::from(DOUBLE_BLOCK_SIZE) + u32::from(block_size);

    if leading >= chunk.prev_leading
        && trailing >= chunk.prev_trailing
        && new_window_bits > u32::from(prev_block_size)
    {
        // Marker, reuse control bit, then the block through the old window.
        check_space(chunk, 2 + u32::from(prev_block_size))?;
        append_bits(&mut chunk.data, &mut chunk.idx, 1, 1);
        append_bits(&mut chunk.data, &mut chunk.idx, 0, 1);
        append_bits(
            &mut chunk.data,
            &mut chunk.idx,
            xor >> chunk.prev_trailing,
            prev_block_size,
        );
    } else {
        // Marker, new-window control bit, window fields, block.
        check_space(chunk, 2 + new_window_bits)?;
        append_bits(&mut chunk.data, &mut chunk.idx, 1, 1);
        append_bits(&mut chunk.data, &mut chunk.idx, 1, 1);
        append_bits(&mut chunk.data, &mut chunk.idx, u64::from(leading), DOUBLE_LEADING);
        append_bits(
            &mut chunk.data,
            &mut chunk.idx,
            u64::from(block_size - DOUBLE_BLOCK_ADJUST),
            DOUBLE_BLOCK_SIZE,
        );
        append_bits(&mut chunk.data, &mut chunk.idx, xor >> trailing, block_size);
        chunk.prev_leading = leading;
        chunk.prev_trailing = trailing;
    }

    chunk.prev_value = bits;
    Ok(())
}
