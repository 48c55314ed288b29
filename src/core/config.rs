//! Draft configuration
//!
//! Every knob the generators read, with defaults tuned for the standard tile
//! set. Loaded once per draft from TOML (all fields optional) and read-only
//! while generating.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{DraftError, Result};
use crate::core::types::{TileId, Tier};
use crate::draft::variant::DraftVariant;
use crate::layout::shape::SeatOverride;
use crate::map::seats::StandardSeats;

/// Tiles of each tier drawn into one slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceComposition {
    pub high: usize,
    pub med: usize,
    pub low: usize,
    pub red: usize,
}

impl SliceComposition {
    /// One of each blue tier plus two red tiles
    pub const STANDARD: SliceComposition = SliceComposition {
        high: 1,
        med: 1,
        low: 1,
        red: 2,
    };

    /// One of each tier
    pub const COMPACT: SliceComposition = SliceComposition {
        high: 1,
        med: 1,
        low: 1,
        red: 1,
    };

    pub fn count(&self, tier: Tier) -> usize {
        match tier {
            Tier::High => self.high,
            Tier::Med => self.med,
            Tier::Low => self.low,
            Tier::Red => self.red,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.med + self.low + self.red
    }

    /// One entry per tile drawn, in tier order
    pub fn tiers(&self) -> Vec<Tier> {
        Tier::ALL
            .iter()
            .flat_map(|&tier| std::iter::repeat(tier).take(self.count(tier)))
            .collect()
    }
}

/// Slice generation knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceConfig {
    /// Slices to generate; defaults to one per player
    pub count: Option<usize>,

    /// Minimum alpha wormhole tiles across all slices
    pub min_alpha: usize,

    /// Minimum beta wormhole tiles across all slices
    pub min_beta: usize,

    /// Minimum legendary tiles across all slices
    pub min_legendary: usize,

    /// Per-slice optimal resource floor
    pub min_resources: f32,

    /// Per-slice optimal influence floor
    pub min_influence: f32,

    /// Per-slice resource + influence window
    pub min_total: f32,
    pub max_total: f32,

    /// Tier draw per slice; defaults to the variant's composition
    pub composition: Option<SliceComposition>,

    /// Ceiling on whole-batch attempts before generation is reported failed
    ///
    /// A batch succeeds well under 1% of the time with the default bounds,
    /// so a few thousand attempts are typical.
    pub max_attempts: u32,
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self {
            count: None,
            min_alpha: 2,
            min_beta: 2,
            min_legendary: 1,
            min_resources: 3.0,
            min_influence: 4.0,
            min_total: 9.0,
            max_total: 13.0,
            composition: None,
            max_attempts: 1_000_000,
        }
    }
}

impl SliceConfig {
    fn validate(&self, errors: &mut Vec<String>) {
        if self.min_resources < 0.0 || self.min_influence < 0.0 || self.min_total < 0.0 {
            errors.push("slice minimums must not be negative".into());
        }
        if self.min_total > self.max_total {
            errors.push(format!(
                "slices.min_total ({}) exceeds slices.max_total ({})",
                self.min_total, self.max_total
            ));
        }
        if self.min_resources + self.min_influence > self.max_total {
            errors.push(format!(
                "slices.min_resources + slices.min_influence ({}) exceeds slices.max_total ({})",
                self.min_resources + self.min_influence,
                self.max_total
            ));
        }
        if self.max_attempts == 0 {
            errors.push("slices.max_attempts must be positive".into());
        }
    }
}

/// Fixed (shared) system generation knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedConfig {
    /// Fixed systems to generate; defaults to what the variant places
    pub count: Option<usize>,

    /// Minimum wormholes among fixed systems, split between alpha and beta
    pub min_wormholes: usize,

    pub min_legendary: usize,

    /// Relative weight of drawing a red tile for a fixed system
    pub red_weight: u32,

    /// Relative weight of each blue tier
    pub tier_weight: u32,
}

impl Default for FixedConfig {
    fn default() -> Self {
        Self {
            count: None,
            min_wormholes: 2,
            min_legendary: 0,
            red_weight: 2,
            tier_weight: 1,
        }
    }
}

/// Faction selection knobs
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FactionConfig {
    /// Factions offered; defaults to one per player
    pub count: Option<usize>,

    /// Offer factions whose home systems are already on the table first
    pub seed_from_table: bool,

    /// Faction nsids never offered
    pub exclude: Vec<String>,
}

/// Complete configuration for one draft
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    pub variant: DraftVariant,

    pub player_count: usize,

    /// RNG seed; random when absent
    pub seed: Option<u64>,

    /// Tile placed at the map center, if any
    pub center_tile: Option<TileId>,

    /// Whole-draft retries when fixed systems cannot be drawn from what the
    /// slices left over
    pub draft_attempts: u32,

    pub slices: SliceConfig,

    pub fixed: FixedConfig,

    pub factions: FactionConfig,

    /// Extra per-seat shape/direction overrides on top of the variant's own
    pub seat_overrides: Vec<SeatOverride>,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            variant: DraftVariant::Milty,
            player_count: 6,
            seed: None,
            center_tile: None,
            draft_attempts: 32,
            slices: SliceConfig::default(),
            fixed: FixedConfig::default(),
            factions: FactionConfig::default(),
            seat_overrides: Vec::new(),
        }
    }
}

impl DraftConfig {
    pub fn new(variant: DraftVariant, player_count: usize) -> Self {
        Self {
            variant,
            player_count,
            ..Self::default()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn slice_count(&self) -> usize {
        self.slices.count.unwrap_or(self.player_count)
    }

    pub fn faction_count(&self) -> usize {
        self.factions.count.unwrap_or(self.player_count)
    }

    pub fn fixed_count(&self) -> usize {
        self.fixed
            .count
            .unwrap_or_else(|| self.variant.fixed_count(self.player_count))
    }

    pub fn composition(&self) -> SliceComposition {
        self.slices
            .composition
            .unwrap_or_else(|| self.variant.composition())
    }

    /// Check internal consistency, collecting every problem found
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(StandardSeats::MIN_PLAYERS..=StandardSeats::MAX_PLAYERS)
            .contains(&self.player_count)
        {
            errors.push(format!(
                "player_count {} outside {}..={}",
                self.player_count,
                StandardSeats::MIN_PLAYERS,
                StandardSeats::MAX_PLAYERS
            ));
        } else if self.player_count > self.variant.max_players() {
            errors.push(format!(
                "variant {:?} supports at most {} players",
                self.variant,
                self.variant.max_players()
            ));
        }

        if self.slice_count() < self.player_count {
            errors.push(format!(
                "{} slices cannot cover {} players",
                self.slice_count(),
                self.player_count
            ));
        }
        if self.faction_count() < self.player_count {
            errors.push(format!(
                "{} factions cannot cover {} players",
                self.faction_count(),
                self.player_count
            ));
        }

        let expected_fixed = self.variant.fixed_count(self.player_count);
        if self.fixed_count() != expected_fixed {
            errors.push(format!(
                "fixed system count {} does not match the {} positions variant {:?} places",
                self.fixed_count(),
                expected_fixed,
                self.variant
            ));
        }

        let body_len = self.variant.shape_kind().shape().body_len();
        if self.composition().total() != body_len {
            errors.push(format!(
                "slice composition draws {} tiles but the {} shape holds {}",
                self.composition().total(),
                self.variant.shape_kind().name(),
                body_len
            ));
        }

        if self.draft_attempts == 0 {
            errors.push("draft_attempts must be positive".into());
        }

        self.slices.validate(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// `validate` as a crate error
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(DraftError::InvalidConfig)
    }
}
