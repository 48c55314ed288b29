//! Slice generation statistics
//!
//! Runs slice generation many times and reports how many batches each run
//! needed and how the resulting slices are balanced.

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use slice_draft::catalog::{StandardTileCatalog, TileCatalog};
use slice_draft::core::config::DraftConfig;
use slice_draft::core::error::Result;
use slice_draft::draft::DraftVariant;
use slice_draft::generation::{adjacent_anomalies, SliceGenerator};

#[derive(Parser, Debug)]
#[command(name = "slice_stats")]
#[command(about = "Measure slice generation attempts and balance")]
struct Args {
    /// Generation runs
    #[arg(long, default_value_t = 100)]
    runs: u32,

    /// Number of players (3-8)
    #[arg(long, default_value_t = 6)]
    players: usize,

    /// Use the milty_eq variant
    #[arg(long)]
    eq: bool,

    /// TOML draft configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the first run; run i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Serialize, Default)]
struct Stats {
    runs: u32,
    failures: u32,
    attempts_min: u32,
    attempts_max: u32,
    attempts_mean: f64,
    total_min: f32,
    total_max: f32,
    total_mean: f64,
    adjacent_anomaly_slices: u32,
    elapsed_ms: u128,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("slice_draft=warn")
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => DraftConfig::from_toml_file(path)?,
        None => DraftConfig::new(DraftVariant::Milty, args.players),
    };
    if args.eq {
        config.variant = DraftVariant::MiltyEq;
    }
    config.check()?;

    let catalog = StandardTileCatalog::standard()?;
    let generator = SliceGenerator::new(&catalog, &config);
    let shape = config.variant.shape_kind().shape();
    let base_seed = args.seed.unwrap_or_else(rand::random);

    let mut stats = Stats {
        attempts_min: u32::MAX,
        total_min: f32::MAX,
        ..Stats::default()
    };
    let mut attempts_sum = 0u64;
    let mut total_sum = 0f64;
    let mut slice_count = 0u64;
    let start = Instant::now();

    for run in 0..args.runs {
        stats.runs += 1;
        let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(run as u64));
        let generated = match generator.generate(&mut rng) {
            Ok(generated) => generated,
            Err(e) if e.is_retryable() => {
                stats.failures += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        stats.attempts_min = stats.attempts_min.min(generated.attempts);
        stats.attempts_max = stats.attempts_max.max(generated.attempts);
        attempts_sum += generated.attempts as u64;

        for slice in &generated.slices {
            let total = slice.totals(&catalog)?.total();
            stats.total_min = stats.total_min.min(total);
            stats.total_max = stats.total_max.max(total);
            total_sum += total as f64;
            slice_count += 1;
            if !adjacent_anomalies(slice, &shape, &catalog).is_empty() {
                stats.adjacent_anomaly_slices += 1;
            }
        }
    }

    let successes = (stats.runs - stats.failures) as f64;
    if successes > 0.0 {
        stats.attempts_mean = attempts_sum as f64 / successes;
    }
    if slice_count > 0 {
        stats.total_mean = total_sum / slice_count as f64;
    }
    stats.elapsed_ms = start.elapsed().as_millis();

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("=== SLICE GENERATION STATS ===");
        println!(
            "{} players, {} variant, {} tiles in catalog",
            config.player_count,
            config.variant.name(),
            catalog.tiles().len()
        );
        println!("Runs: {} ({} failed)", stats.runs, stats.failures);
        println!(
            "Attempts: min {} / mean {:.1} / max {}",
            stats.attempts_min, stats.attempts_mean, stats.attempts_max
        );
        println!(
            "Slice res+inf: min {:.1} / mean {:.2} / max {:.1}",
            stats.total_min, stats.total_mean, stats.total_max
        );
        println!("Slices with adjacent anomalies: {}", stats.adjacent_anomaly_slices);
        println!("Elapsed: {} ms", stats.elapsed_ms);
    }
    Ok(())
}
