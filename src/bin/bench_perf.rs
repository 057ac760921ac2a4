#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use rand::RngCore;
use rand::SeedableRng;
use sparse_life::{RuleTable, SparseLife, SparseLifeConfig, TickStats};
use std::env;
use std::time::Instant;

#[derive(Clone, Debug)]
struct BenchConfig {
    size: i32,
    density: f64,
    warmup: u64,
    iters: u64,
    seed: u64,
    rule: RuleTable,
    prune_every: Option<u64>,
    json: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: 512,
            density: 0.42,
            warmup: 3,
            iters: 50,
            seed: 0x5EED_1234_ABCD_EF01,
            rule: RuleTable::conway(),
            prune_every: None,
            json: false,
        }
    }
}

fn parse_args() -> BenchConfig {
    let mut cfg = BenchConfig::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--size" => {
                if let Some(v) = args.next() {
                    cfg.size = v.parse().expect("--size expects i32");
                }
            }
            "--density" => {
                if let Some(v) = args.next() {
                    cfg.density = v.parse().expect("--density expects f64");
                }
            }
            "--warmup" => {
                if let Some(v) = args.next() {
                    cfg.warmup = v.parse().expect("--warmup expects u64");
                }
            }
            "--iters" => {
                if let Some(v) = args.next() {
                    cfg.iters = v.parse().expect("--iters expects u64");
                }
            }
            "--seed" => {
                if let Some(v) = args.next() {
                    cfg.seed = if let Some(hex) = v.strip_prefix("0x") {
                        u64::from_str_radix(hex, 16).expect("--seed hex parse failed")
                    } else {
                        v.parse().expect("--seed expects u64")
                    };
                }
            }
            "--rule" => {
                if let Some(v) = args.next() {
                    cfg.rule = v.parse().expect("--rule expects a rulestring like B3/S23");
                }
            }
            "--prune-every" => {
                if let Some(v) = args.next() {
                    cfg.prune_every = Some(v.parse().expect("--prune-every expects u64"));
                }
            }
            "--json" => {
                cfg.json = true;
            }
            other => panic!("unknown arg: {other}"),
        }
    }
    cfg
}

fn seed_board(engine: &mut SparseLife, size: i32, density: f64, seed: u64) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let threshold = (u64::MAX as f64 * density) as u64;
    for y in 0..size {
        for x in 0..size {
            if rng.next_u64() <= threshold {
                engine.add_cell(x, y);
            }
        }
    }
}

fn main() {
    let cfg = parse_args();

    let mut config = SparseLifeConfig::default().rule(cfg.rule).seed(cfg.seed);
    if let Some(every) = cfg.prune_every {
        config = config.prune_interval(every);
    }
    let mut engine = SparseLife::with_config(config).expect("invalid bench configuration");
    seed_board(&mut engine, cfg.size, cfg.density, cfg.seed);

    if cfg.warmup > 0 {
        engine.step_n(cfg.warmup);
    }

    let mut totals = TickStats::default();
    let start = Instant::now();
    for _ in 0..cfg.iters {
        let stats = engine.tick();
        totals.propagated += stats.propagated;
        totals.evaluated += stats.evaluated;
    }
    let elapsed = start.elapsed();
    let total_ms = elapsed.as_secs_f64() * 1000.0;
    let avg_ms = total_ms / cfg.iters as f64;
    let population = engine.live_count();
    let tracked = engine.registry_len();

    if cfg.json {
        println!(
            "{{\"size\":{},\"density\":{},\"rule\":\"{}\",\"warmup\":{},\"iters\":{},\"seed\":{},\"total_ms\":{:.6},\"avg_ms\":{:.6},\"population\":{},\"tracked\":{},\"propagated\":{},\"evaluated\":{}}}",
            cfg.size,
            cfg.density,
            cfg.rule,
            cfg.warmup,
            cfg.iters,
            cfg.seed,
            total_ms,
            avg_ms,
            population,
            tracked,
            totals.propagated,
            totals.evaluated,
        );
    } else {
        println!(
            "size={},density={},rule={},warmup={},iters={},seed={},total_ms={:.6},avg_ms={:.6},population={},tracked={},propagated={},evaluated={}",
            cfg.size,
            cfg.density,
            cfg.rule,
            cfg.warmup,
            cfg.iters,
            cfg.seed,
            total_ms,
            avg_ms,
            population,
            tracked,
            totals.propagated,
            totals.evaluated,
        );
    }
}
