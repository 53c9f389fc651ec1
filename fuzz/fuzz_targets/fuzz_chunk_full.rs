#![no_main]

use doubledelta::{decode, AppendError, CompressedChunk};
use libfuzzer_sys::fuzz_target;

// Small enough that most inputs hit the capacity boundary
const CAPACITY: usize = 64;

fuzz_target!(|data: &[u8]| {
    let mut chunk = CompressedChunk::with_capacity(CAPACITY);
    let mut ts = 0u64;

    for record in data.chunks(10) {
        if record.len() < 10 {
            break;
        }
        let delta = u64::from(u16::from_le_bytes([record[0], record[1]]));
        let mut bits = [0u8; 8];
        bits.copy_from_slice(&record[2..10]);
        let value = f64::from_bits(u64::from_le_bytes(bits));
        ts += delta;

        // Property: a rejected append is observationally a no-op, and later
        // cheaper samples still encode on clean bits.
        let before = chunk.to_bytes();
        match chunk.append(ts, value) {
            Ok(()) => {}
            Err(AppendError::ChunkFull) => {
                assert_eq!(chunk.to_bytes(), before, "rejected append changed state");
            }
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    assert_eq!(decode(&chunk).len() as u64, chunk.num_samples());
    assert!(chunk.bits_used() <= 8 * CAPACITY as u64);
});
