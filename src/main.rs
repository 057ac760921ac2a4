#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use rand::RngCore;
use rand::SeedableRng;
use sparse_life::{Pattern, RuleTable, SparseLife, SparseLifeConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: sparse-life [--config FILE] [--rule B3/S23] \
[--pattern line|blinker|block|glider|r-pentomino|random] [--size N] [--density P] \
[--ticks N] [--every N] [--seed N] [--disobedience P] [--prune-every N] [--interval-ms N]";

struct MainArgs {
    config_path: Option<PathBuf>,
    rule: Option<RuleTable>,
    seed: Option<u64>,
    disobedience: Option<f64>,
    prune_every: Option<u64>,
    pattern: String,
    size: i32,
    density: f64,
    ticks: u64,
    every: u64,
    interval: Option<Duration>,
}

impl Default for MainArgs {
    fn default() -> Self {
        Self {
            config_path: None,
            rule: None,
            seed: None,
            disobedience: None,
            prune_every: None,
            pattern: "line".to_owned(),
            size: 160,
            density: 0.35,
            ticks: 1000,
            every: 100,
            interval: None,
        }
    }
}

fn parse_u64(value: &str, flag: &str) -> anyhow::Result<u64> {
    let parsed = if let Some(hex) = value.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else {
        value.parse()
    };
    parsed.with_context(|| format!("{flag} expects an unsigned integer, got {value:?}"))
}

fn parse_args() -> anyhow::Result<MainArgs> {
    let mut out = MainArgs::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .with_context(|| format!("{flag} requires a value\n{USAGE}"))
        };
        match arg.as_str() {
            "--config" => out.config_path = Some(PathBuf::from(value("--config")?)),
            "--rule" => {
                let rule = value("--rule")?;
                out.rule = Some(rule.parse().with_context(|| format!("--rule {rule:?}"))?);
            }
            "--pattern" => out.pattern = value("--pattern")?,
            "--size" => {
                out.size = value("--size")?
                    .parse()
                    .context("--size expects a positive integer")?;
            }
            "--density" => {
                out.density = value("--density")?
                    .parse()
                    .context("--density expects a probability")?;
            }
            "--ticks" => out.ticks = parse_u64(&value("--ticks")?, "--ticks")?,
            "--every" => out.every = parse_u64(&value("--every")?, "--every")?.max(1),
            "--seed" => out.seed = Some(parse_u64(&value("--seed")?, "--seed")?),
            "--disobedience" => {
                out.disobedience = Some(
                    value("--disobedience")?
                        .parse()
                        .context("--disobedience expects a probability")?,
                );
            }
            "--prune-every" => {
                out.prune_every = Some(parse_u64(&value("--prune-every")?, "--prune-every")?);
            }
            "--interval-ms" => {
                let ms = parse_u64(&value("--interval-ms")?, "--interval-ms")?;
                out.interval = Some(Duration::from_millis(ms));
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}\n{USAGE}"),
        }
    }
    Ok(out)
}

fn build_config(args: &MainArgs) -> anyhow::Result<SparseLifeConfig> {
    let mut config = match &args.config_path {
        Some(path) => SparseLifeConfig::from_file(path)?,
        None => SparseLifeConfig::default(),
    };
    if let Some(rule) = args.rule {
        config = config.rule(rule);
    }
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if let Some(p) = args.disobedience {
        config = config.disobedience(p);
    }
    if let Some(every) = args.prune_every {
        config = config.prune_interval(every);
    }
    Ok(config)
}

fn seed_world(engine: &mut SparseLife, args: &MainArgs, seed: u64) -> anyhow::Result<()> {
    if args.pattern.eq_ignore_ascii_case("random") {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let threshold = (u64::MAX as f64 * args.density.clamp(0.0, 1.0)) as u64;
        let half = args.size / 2;
        for y in -half..half {
            for x in -half..half {
                if rng.next_u64() <= threshold {
                    engine.add_cell(x, y);
                }
            }
        }
        return Ok(());
    }

    let line_len = args.size.max(1) as u32;
    let Some(pattern) = Pattern::from_name(&args.pattern, line_len) else {
        bail!("unknown pattern: {}\n{USAGE}", args.pattern);
    };
    engine.add_cells(pattern.cells(0, 0));
    Ok(())
}

fn run(args: MainArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let seed = config.seed;
    info!(rule = %config.rule, pattern = %args.pattern, ticks = args.ticks, "sparse-life starting");

    let mut engine = SparseLife::with_config(config)?;
    seed_world(&mut engine, &args, seed)?;

    let start = Instant::now();
    let mut checkpoint_start = Instant::now();
    let mut redraws = 0usize;
    for _ in 0..args.ticks {
        let tick_start = Instant::now();
        let stats = engine.tick();
        redraws += engine.changed_cells().count();

        if stats.generation % args.every == 0 {
            let phase_ms = checkpoint_start.elapsed().as_secs_f64() * 1000.0;
            let avg_ms = phase_ms / args.every as f64;
            println!(
                "Generation {}: live = {}, tracked = {}, redraws = {redraws} | {phase_ms:.3} ms total, {avg_ms:.6} ms/tick",
                stats.generation,
                engine.live_count(),
                engine.registry_len(),
            );
            redraws = 0;
            checkpoint_start = Instant::now();
        }

        if let Some(interval) = args.interval {
            if let Some(rest) = interval.checked_sub(tick_start.elapsed()) {
                std::thread::sleep(rest);
            }
        }
    }

    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    println!("\n--- Summary ({} ticks) ---", args.ticks);
    println!(
        "live = {}, tracked = {}, bounds = {:?}, {total_ms:.3} ms total",
        engine.live_count(),
        engine.registry_len(),
        engine.bounds(),
    );
    info!(generation = engine.generation(), live = engine.live_count(), "sparse-life finished");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let args = parse_args()?;
    run(args)
}
