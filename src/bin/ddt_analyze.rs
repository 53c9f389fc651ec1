//! Report compression ratios for synthetic sample streams.

use clap::{Parser, ValueEnum};
use doubledelta::{CompressedChunk, HEADER_SIZE};
use rand::Rng;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Workload {
    /// Constant value at a fixed interval
    Flat,
    /// Small random walk with long idle stretches
    Walk,
    /// Wide value jumps with jittered arrival times
    Spiky,
}

#[derive(Parser)]
#[command(name = "ddt-analyze")]
#[command(about = "Report compression ratios for synthetic sample streams")]
struct Args {
    /// Samples to generate
    #[arg(short, long, default_value = "100000")]
    samples: u64,

    /// Chunk capacity in bytes
    #[arg(short, long, default_value = "4096")]
    capacity: usize,

    /// Workload shape
    #[arg(short, long, value_enum, default_value = "walk")]
    workload: Workload,
}

fn generate(workload: Workload, samples: u64) -> Vec<(u64, f64)> {
    let mut rng = rand::rng();
    let mut ts = 1_760_000_000u64;
    let mut value = 22.0f64;
    let mut out = Vec::with_capacity(samples as usize);

    for _ in 0..samples {
        match workload {
            Workload::Flat => {
                ts += 300;
            }
            Workload::Walk => {
                ts += 300;
                if rng.random_range(0..10) < 3 {
                    value += f64::from(rng.random_range(-2i32..=2));
                }
            }
            Workload::Spiky => {
                ts += rng.random_range(1..3600);
                value = rng.random_range(-1.0e4..1.0e4);
            }
        }
        out.push((ts, value));
    }
    out
}

fn main() {
    let args = Args::parse();
    let samples = generate(args.workload, args.samples);

    let mut chunks = vec![CompressedChunk::with_capacity(args.capacity)];
    for &(ts, value) in &samples {
        if chunks.last_mut().unwrap().append(ts, value).is_err() {
            let mut next = CompressedChunk::with_capacity(args.capacity);
            next.append(ts, value)
                .expect("fresh chunk rejected a sample");
            chunks.push(next);
        }
    }

    let stored: u64 = chunks.iter().map(CompressedChunk::num_samples).sum();
    if stored == 0 {
        println!("no samples generated");
        return;
    }

    let payload_bytes: usize = chunks
        .iter()
        .map(|c| (c.bits_used() as usize).div_ceil(8))
        .sum();
    let total_bytes = payload_bytes + chunks.len() * HEADER_SIZE;
    // Raw storage: one u64 timestamp plus one f64 per sample.
    let raw_bytes = stored as usize * 16;

    println!("workload: {:?}", args.workload);
    println!(
        "samples: {stored} across {} chunks of {} bytes",
        chunks.len(),
        args.capacity
    );
    println!(
        "payload: {} KB ({:.2} bytes/sample)",
        payload_bytes / 1024,
        payload_bytes as f64 / stored as f64
    );
    println!(
        "with headers: {} KB | raw: {} KB | ratio: {:.1}x",
        total_bytes / 1024,
        raw_bytes / 1024,
        raw_bytes as f64 / total_bytes as f64
    );
}
