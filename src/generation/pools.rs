//! Tiered tile pools shared by slice and fixed-system generation
//!
//! Tiles are split into one pool per tier. Special-terrain minimums are met
//! by moving random candidates from the available pools into the required
//! pools before the rest of the draw.

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::tiles::{TileCatalog, TileInfo};
use crate::core::types::{Tier, TileId, Wormhole};

/// Interchangeable groups of tiles that satisfy a generation minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialTerrain {
    Alpha,
    Beta,
    Legendary,
}

impl SpecialTerrain {
    pub const ALL: [SpecialTerrain; 3] = [
        SpecialTerrain::Alpha,
        SpecialTerrain::Beta,
        SpecialTerrain::Legendary,
    ];

    pub fn matches(self, tile: &TileInfo) -> bool {
        match self {
            SpecialTerrain::Alpha => tile.wormhole == Some(Wormhole::Alpha),
            SpecialTerrain::Beta => tile.wormhole == Some(Wormhole::Beta),
            SpecialTerrain::Legendary => tile.legendary,
        }
    }

    /// True when both tiles belong to the same special group
    pub fn shares_group(a: &TileInfo, b: &TileInfo) -> bool {
        Self::ALL.iter().any(|g| g.matches(a) && g.matches(b))
    }
}

/// A minimum count of one special terrain group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub terrain: SpecialTerrain,
    pub count: usize,
}

impl Requirement {
    pub fn new(terrain: SpecialTerrain, count: usize) -> Self {
        Self { terrain, count }
    }
}

/// Per-tier available and required tiles for one generation attempt
#[derive(Debug, Clone)]
pub struct TierPools<'a> {
    available: [Vec<&'a TileInfo>; 4],
    required: [Vec<&'a TileInfo>; 4],
}

impl<'a> TierPools<'a> {
    /// Bucket every catalog tile not in `exclude` by tier
    pub fn from_catalog(catalog: &'a dyn TileCatalog, exclude: &AHashSet<TileId>) -> Self {
        let mut available: [Vec<&'a TileInfo>; 4] = Default::default();
        for tile in catalog.tiles() {
            if !exclude.contains(&tile.id) {
                available[tile.tier.index()].push(tile);
            }
        }
        Self {
            available,
            required: Default::default(),
        }
    }

    pub fn available(&self, tier: Tier) -> &[&'a TileInfo] {
        &self.available[tier.index()]
    }

    pub fn required(&self, tier: Tier) -> &[&'a TileInfo] {
        &self.required[tier.index()]
    }

    pub fn required_count(&self) -> usize {
        self.required.iter().map(Vec::len).sum()
    }

    fn required_matching(&self, terrain: SpecialTerrain) -> usize {
        self.required
            .iter()
            .flatten()
            .filter(|t| terrain.matches(t))
            .count()
    }

    /// Move random candidates into the required pools until `requirement` holds.
    ///
    /// Returns false when the available pools run out of candidates.
    pub fn fix_up<R: Rng + ?Sized>(&mut self, requirement: Requirement, rng: &mut R) -> bool {
        let terrain = requirement.terrain;
        let mut have = self.required_matching(terrain);
        while have < requirement.count {
            let candidates: Vec<(usize, usize)> = self
                .available
                .iter()
                .enumerate()
                .flat_map(move |(tier, pool)| {
                    pool.iter()
                        .enumerate()
                        .filter(move |(_, t)| terrain.matches(t))
                        .map(move |(i, _)| (tier, i))
                })
                .collect();
            let Some(&(tier, i)) = candidates.choose(rng) else {
                return false;
            };
            let tile = self.available[tier].swap_remove(i);
            self.required[tier].push(tile);
            have += 1;
        }
        true
    }

    /// Apply every requirement in a random order
    pub fn apply_fixups<R: Rng + ?Sized>(
        &mut self,
        requirements: &[Requirement],
        rng: &mut R,
    ) -> bool {
        let mut order = requirements.to_vec();
        order.shuffle(rng);
        order.into_iter().all(|req| self.fix_up(req, rng))
    }

    /// Pick exactly `needed[tier]` tiles per tier, required tiles first, each
    /// list shuffled. `None` when a tier has too many required tiles or too few
    /// tiles overall.
    pub fn choose<R: Rng + ?Sized>(
        mut self,
        needed: [usize; 4],
        rng: &mut R,
    ) -> Option<[Vec<&'a TileInfo>; 4]> {
        let mut chosen: [Vec<&'a TileInfo>; 4] = Default::default();
        for tier in Tier::ALL {
            let i = tier.index();
            let required = std::mem::take(&mut self.required[i]);
            if required.len() > needed[i] {
                return None;
            }
            let fill = needed[i] - required.len();
            let available = &mut self.available[i];
            if available.len() < fill {
                return None;
            }
            available.shuffle(rng);
            let mut picked = required;
            picked.extend(available.drain(..fill));
            picked.shuffle(rng);
            chosen[i] = picked;
        }
        Some(chosen)
    }

    /// Remaining available tiles and required tiles, consumed
    pub fn into_parts(self) -> ([Vec<&'a TileInfo>; 4], [Vec<&'a TileInfo>; 4]) {
        (self.available, self.required)
    }
}

/// Catalog tiles matching a terrain group
pub fn candidate_count(catalog: &dyn TileCatalog, terrain: SpecialTerrain) -> usize {
    catalog.tiles().iter().filter(|t| terrain.matches(t)).count()
}
