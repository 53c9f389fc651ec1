#![no_main]

use doubledelta::{decode, CompressedChunk};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut chunk = CompressedChunk::with_capacity(4096);
    let mut accepted = Vec::new();
    let mut ts = 1_760_000_000u64;

    // Bytes are interpreted as (ts_delta: u16, value_bits: u64) records
    for record in data.chunks(10) {
        if record.len() < 10 {
            break;
        }
        let delta = u64::from(u16::from_le_bytes([record[0], record[1]]));
        let mut bits = [0u8; 8];
        bits.copy_from_slice(&record[2..10]);
        let value = f64::from_bits(u64::from_le_bytes(bits));

        ts += delta;
        if chunk.append(ts, value).is_ok() {
            accepted.push((ts, value));
        }
    }

    // Property 1: count() == decode().len() == accepted
    let decoded = decode(&chunk);
    assert_eq!(chunk.num_samples(), accepted.len() as u64, "count mismatch");
    assert_eq!(decoded.len(), accepted.len(), "decode length mismatch");

    // Property 2: bit-exact replay, NaN payloads included
    for (sample, &(ts, value)) in decoded.iter().zip(accepted.iter()) {
        assert_eq!(sample.ts, ts, "timestamp mismatch");
        assert_eq!(
            sample.value.to_bits(),
            value.to_bits(),
            "value bits mismatch"
        );
    }

    // Property 3: timestamps are non-decreasing
    for window in decoded.windows(2) {
        assert!(window[0].ts <= window[1].ts, "timestamps went backwards");
    }
});
