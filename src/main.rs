//! Slice Draft - Command line draft runner
//!
//! Generates a draft (or loads a custom one), hands slice i and faction i to
//! seat i, and prints the slices, factions and finished map string.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use slice_draft::catalog::{FactionCatalog, StandardTileCatalog, TileCatalog};
use slice_draft::core::config::DraftConfig;
use slice_draft::core::error::{DraftError, Result};
use slice_draft::core::types::TileId;
use slice_draft::draft::{draft_rng, DraftOutcome, DraftSession, DraftVariant};
use slice_draft::map::StandardSeats;

/// Run a slice draft and print the resulting map
#[derive(Parser, Debug)]
#[command(name = "slice-draft")]
#[command(about = "Generate balanced slices and factions and lay them out on a hex map")]
struct Args {
    /// Number of players (3-8)
    #[arg(long)]
    players: Option<usize>,

    /// Draft variant: milty or milty_eq
    #[arg(long)]
    variant: Option<String>,

    /// Random seed for deterministic drafts
    #[arg(long)]
    seed: Option<u64>,

    /// TOML draft configuration; command line flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Custom draft string (slices=..&factions=..&fixed=..&labels=..)
    #[arg(long)]
    custom: Option<String>,

    /// Tiles already in play (comma separated); with factions.seed_from_table
    /// their factions lead the offer
    #[arg(long, value_delimiter = ',')]
    table: Vec<u32>,

    /// Tile catalog TOML instead of the built-in tiles
    #[arg(long)]
    tiles: Option<PathBuf>,

    /// Faction catalog TOML instead of the built-in factions
    #[arg(long)]
    factions: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Serialize)]
struct SliceOutput {
    label: String,
    tiles: Vec<u32>,
    resources: f32,
    influence: f32,
}

#[derive(Serialize)]
struct DraftOutput {
    variant: DraftVariant,
    players: usize,
    seed: Option<u64>,
    attempts: u32,
    slices: Vec<SliceOutput>,
    factions: Vec<String>,
    fixed: Vec<u32>,
    outcome: DraftOutcome,
}

fn parse_variant(name: &str) -> Result<DraftVariant> {
    match name {
        "milty" => Ok(DraftVariant::Milty),
        "milty_eq" | "miltyeq" | "eq" => Ok(DraftVariant::MiltyEq),
        other => Err(DraftError::InvalidConfig(vec![format!(
            "unknown variant \"{}\" (expected milty or milty_eq)",
            other
        )])),
    }
}

fn load_config(args: &Args) -> Result<DraftConfig> {
    let mut config = match &args.config {
        Some(path) => DraftConfig::from_toml_file(path)?,
        None => DraftConfig::default(),
    };
    if let Some(players) = args.players {
        config.player_count = players;
    }
    if let Some(variant) = &args.variant {
        config.variant = parse_variant(variant)?;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    // Pin the seed so the run can be reproduced from the output
    if config.seed.is_none() {
        config.seed = Some(rand::random());
    }
    Ok(config)
}

fn load_catalogs(args: &Args) -> Result<(StandardTileCatalog, FactionCatalog)> {
    let tiles = match &args.tiles {
        Some(path) => StandardTileCatalog::load(path)?,
        None => StandardTileCatalog::standard()?,
    };
    let factions = match &args.factions {
        Some(path) => FactionCatalog::load(path)?,
        None => FactionCatalog::standard()?,
    };
    Ok((tiles, factions))
}

fn run(args: &Args, tiles: &StandardTileCatalog, factions: &FactionCatalog) -> Result<DraftOutput> {
    let config = load_config(args)?;
    let mut rng = draft_rng(&config);
    let seats = StandardSeats::for_player_count(config.player_count)?;
    let table = args.table.iter().copied().map(TileId).collect();
    let mut session = DraftSession::new(tiles, factions, config.clone())?.with_table(table);
    match &args.custom {
        Some(custom) => session.start_custom(custom, &mut rng)?,
        None => session.start(&mut rng)?,
    }

    let slices = session
        .slices()
        .iter()
        .enumerate()
        .map(|(i, slice)| {
            let totals = slice.totals(tiles)?;
            Ok(SliceOutput {
                label: session.label(i),
                tiles: slice.tiles().iter().map(|t| t.0).collect(),
                resources: totals.resources,
                influence: totals.influence,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let faction_pool = session.faction_pool().to_vec();
    let fixed = session.fixed().iter().map(|t| t.0).collect();
    let attempts = session.attempts();

    for seat in 0..config.player_count {
        session.pick_slice(seat, seat)?;
        if let Some(faction) = faction_pool.get(seat) {
            session.pick_faction(seat, faction)?;
        }
    }
    let outcome = session.finish(&seats)?;

    Ok(DraftOutput {
        variant: config.variant,
        players: config.player_count,
        seed: config.seed,
        attempts,
        slices,
        factions: faction_pool,
        fixed,
        outcome,
    })
}

fn print_text(output: &DraftOutput, tiles: &dyn TileCatalog) {
    println!("=== SLICE DRAFT ===");
    println!(
        "Variant: {}  Players: {}  Seed: {}",
        output.variant.name(),
        output.players,
        output.seed.map_or_else(|| "random".to_string(), |s| s.to_string())
    );
    println!("Slice batches drawn: {}", output.attempts);
    println!();

    println!("Slices:");
    for slice in &output.slices {
        let wormholes: Vec<String> = slice
            .tiles
            .iter()
            .filter_map(|&id| tiles.tile(TileId(id)))
            .filter_map(|t| t.wormhole.map(|w| format!("{:?}", w).to_lowercase()))
            .collect();
        println!(
            "  {:>2}: {:<24} {:>4.1}/{:<4.1} {}",
            slice.label,
            format!("{:?}", slice.tiles),
            slice.resources,
            slice.influence,
            wormholes.join(",")
        );
    }
    if !output.fixed.is_empty() {
        println!("Fixed systems: {:?}", output.fixed);
    }
    println!("Factions: {}", output.factions.join(", "));
    println!();

    println!("Seats:");
    for seat in &output.outcome.seats {
        println!(
            "  Seat {}: slice {} faction {} home {}",
            seat.seat,
            seat.label,
            seat.faction.as_deref().unwrap_or("-"),
            seat.home
        );
    }
    println!();
    println!("Map string:");
    println!("{}", output.outcome.map_string);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("slice_draft=info")
        .init();

    let args = Args::parse();
    let (tiles, factions) = load_catalogs(&args)?;
    let output = match run(&args, &tiles, &factions) {
        Ok(output) => output,
        Err(e) => {
            tracing::error!("Draft failed: {}", e);
            if e.is_retryable() {
                eprintln!("Constraints could not be met; loosen the slice bounds or try another seed.");
            }
            return Err(e);
        }
    };

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(&output, &tiles);
    }
    Ok(())
}
