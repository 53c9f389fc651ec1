#![no_main]

use doubledelta::{decode, CompressedChunk};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // A parsed buffer must re-serialize to the same bytes. The payload is
    // not decoded here: arbitrary bit streams are out of contract.
    if let Ok(parsed) = CompressedChunk::from_bytes(data) {
        assert!(parsed.bits_used() <= 8 * parsed.capacity() as u64);
        assert_eq!(parsed.to_bytes(), data, "reserialization mismatch");
    }

    // Build a real chunk from the input and push it through the wire format.
    let mut chunk = CompressedChunk::with_capacity(512);
    let mut ts = 1_760_000_000u64;
    for record in data.chunks(10) {
        if record.len() < 10 {
            break;
        }
        let delta = u64::from(u16::from_le_bytes([record[0], record[1]]));
        let mut bits = [0u8; 8];
        bits.copy_from_slice(&record[2..10]);
        ts += delta;
        let _ = chunk.append(ts, f64::from_bits(u64::from_le_bytes(bits)));
    }

    let bytes = chunk.to_bytes();
    let restored = CompressedChunk::from_bytes(&bytes).expect("own bytes failed to parse");
    assert_eq!(restored.to_bytes(), bytes, "wire format not idempotent");

    let direct = decode(&chunk);
    let via_bytes = decode(&restored);
    assert_eq!(direct.len(), via_bytes.len(), "decode length mismatch");
    for (a, b) in direct.iter().zip(via_bytes.iter()) {
        assert_eq!(a.ts, b.ts, "timestamp mismatch");
        assert_eq!(a.value.to_bits(), b.value.to_bits(), "value bits mismatch");
    }
});
