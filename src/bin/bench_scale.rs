use rand::RngCore;
use rand::SeedableRng;
use rayon::prelude::*;
use sparse_life::{SparseLife, SparseLifeConfig};
use std::time::Instant;

/// Independent soups simulated per board size.
const SEEDS: [u64; 4] = [0x5EED_1234_ABCD_EF01, 0xA1, 0xB2, 0xC3];

fn bench_sparse(size: i32, density: f64, iterations: u64, seed: u64) -> (f64, u64, usize) {
    let config = SparseLifeConfig::default().seed(seed);
    let mut engine = SparseLife::with_config(config).expect("default config is valid");
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let threshold = (u64::MAX as f64 * density) as u64;

    for y in 0..size {
        for x in 0..size {
            if rng.next_u64() <= threshold {
                engine.add_cell(x, y);
            }
        }
    }

    let start = Instant::now();
    engine.step_n(iterations);
    let duration = start.elapsed();

    let total_ms = duration.as_secs_f64() * 1000.0;
    (total_ms, engine.live_count(), engine.registry_len())
}

fn main() {
    let scales: &[(i32, u64)] = &[
        (64, 400),
        (128, 200),
        (256, 100),
        (512, 50),
        (1024, 20),
    ];

    println!(
        "{:<10} {:>8} {:>12} {:>12} {:>10} {:>10}",
        "Grid", "Iters", "Total(ms)", "Avg(ms)", "Live", "Tracked"
    );
    println!("{}", "-".repeat(68));

    for &(size, iters) in scales {
        // Each soup runs on its own engine instance; nothing is shared.
        let runs: Vec<(f64, u64, usize)> = SEEDS
            .par_iter()
            .map(|&seed| bench_sparse(size, 0.42, iters, seed))
            .collect();
        let total_ms = runs.iter().map(|r| r.0).sum::<f64>() / runs.len() as f64;
        let live = runs.iter().map(|r| r.1).sum::<u64>() / runs.len() as u64;
        let tracked = runs.iter().map(|r| r.2).sum::<usize>() / runs.len();
        let avg_ms = total_ms / iters as f64;
        println!(
            "{:<10} {:>8} {:>12.1} {:>12.4} {:>10} {:>10}",
            format!("{}x{}", size, size),
            iters,
            total_ms,
            avg_ms,
            live,
            tracked
        );
    }
}
