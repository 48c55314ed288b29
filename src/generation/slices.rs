//! Balanced slice generation
//!
//! Rejection sampling over whole batches: special-terrain minimums are met
//! constructively through pool fixups, and the loose resource/influence
//! bounds are left to retry. Any slice out of bounds discards the batch.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::tiles::{TileCatalog, TileInfo};
use crate::core::config::{DraftConfig, SliceComposition, SliceConfig};
use crate::core::error::{DraftError, Result};
use crate::core::types::{Tier, TileId};
use crate::generation::anomaly::separate_anomalies;
use crate::generation::pools::{candidate_count, Requirement, SpecialTerrain, TierPools};
use crate::layout::shape::SliceShape;

/// Tiles awarded to one player, in shape body order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slice {
    tiles: Vec<TileId>,
}

impl Slice {
    pub fn new(tiles: Vec<TileId>) -> Self {
        Self { tiles }
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Replace the tile at `index`
    pub fn set(&mut self, index: usize, tile: TileId) -> Result<()> {
        let len = self.tiles.len();
        let slot = self.tiles.get_mut(index).ok_or_else(|| {
            DraftError::InvalidConfig(vec![format!(
                "slice position {} out of range for {} tiles",
                index, len
            )])
        })?;
        *slot = tile;
        Ok(())
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.tiles.swap(a, b);
    }

    /// Optimal resources and influence summed over the slice
    pub fn totals(&self, catalog: &dyn TileCatalog) -> Result<SliceTotals> {
        let mut totals = SliceTotals::default();
        for &id in &self.tiles {
            let tile = catalog.tile(id).ok_or(DraftError::UnknownTile(id))?;
            totals.add(tile);
        }
        Ok(totals)
    }
}

/// Optimal resource/influence sum of a slice
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SliceTotals {
    pub resources: f32,
    pub influence: f32,
}

impl SliceTotals {
    fn add(&mut self, tile: &TileInfo) {
        self.resources += tile.resources;
        self.influence += tile.influence;
    }

    pub fn total(&self) -> f32 {
        self.resources + self.influence
    }

    pub fn within(&self, config: &SliceConfig) -> bool {
        self.resources >= config.min_resources
            && self.influence >= config.min_influence
            && self.total() >= config.min_total
            && self.total() <= config.max_total
    }
}

/// Result of a successful generation run
#[derive(Debug, Clone)]
pub struct GeneratedSlices {
    pub slices: Vec<Slice>,
    /// Batches drawn, including the successful one
    pub attempts: u32,
}

/// Produces balanced slices from a tile catalog
pub struct SliceGenerator<'a> {
    catalog: &'a dyn TileCatalog,
    config: &'a SliceConfig,
    count: usize,
    composition: SliceComposition,
    shape: SliceShape,
}

impl<'a> SliceGenerator<'a> {
    pub fn new(catalog: &'a dyn TileCatalog, config: &'a DraftConfig) -> Self {
        Self {
            catalog,
            config: &config.slices,
            count: config.slice_count(),
            composition: config.composition(),
            shape: config.variant.shape_kind().shape(),
        }
    }

    /// Special-terrain minimums across all slices
    pub fn requirements(&self) -> [Requirement; 3] {
        [
            Requirement::new(SpecialTerrain::Alpha, self.config.min_alpha),
            Requirement::new(SpecialTerrain::Beta, self.config.min_beta),
            Requirement::new(SpecialTerrain::Legendary, self.config.min_legendary),
        ]
    }

    /// Reject constraints no number of attempts can satisfy
    pub fn check_feasible(&self) -> Result<()> {
        if self.composition.total() != self.shape.body_len() {
            return Err(DraftError::Infeasible(format!(
                "composition draws {} tiles, shape {} holds {}",
                self.composition.total(),
                self.shape.name(),
                self.shape.body_len()
            )));
        }

        for tier in Tier::ALL {
            let needed = self.composition.count(tier) * self.count;
            let have = self.catalog.tiles().iter().filter(|t| t.tier == tier).count();
            if have < needed {
                return Err(DraftError::Infeasible(format!(
                    "{} slices need {} {:?} tiles, catalog has {}",
                    self.count, needed, tier, have
                )));
            }
        }

        for req in self.requirements() {
            let candidates = candidate_count(self.catalog, req.terrain);
            if req.count > candidates {
                return Err(DraftError::Infeasible(format!(
                    "minimum {} {:?} tiles, catalog has {}",
                    req.count, req.terrain, candidates
                )));
            }
            // At most one tile per group fits in a slice
            if req.count > self.count {
                return Err(DraftError::Infeasible(format!(
                    "minimum {} {:?} tiles cannot spread over {} slices",
                    req.count, req.terrain, self.count
                )));
            }
        }
        Ok(())
    }

    /// Generate slices, retrying whole batches up to the configured ceiling
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GeneratedSlices> {
        self.check_feasible()?;

        for attempt in 1..=self.config.max_attempts {
            if let Some(mut slices) = self.attempt(rng) {
                let mut swaps = 0;
                for slice in &mut slices {
                    swaps += separate_anomalies(slice, &self.shape, self.catalog);
                }
                tracing::debug!(
                    "Generated {} slices after {} attempts ({} anomaly swaps)",
                    slices.len(),
                    attempt,
                    swaps
                );
                return Ok(GeneratedSlices {
                    slices,
                    attempts: attempt,
                });
            }
        }

        tracing::warn!(
            "Slice generation gave up after {} attempts",
            self.config.max_attempts
        );
        Err(DraftError::GenerationFailed {
            attempts: self.config.max_attempts,
        })
    }

    /// One batch; `None` when any step fails
    fn attempt<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Vec<Slice>> {
        let mut pools = TierPools::from_catalog(self.catalog, &Default::default());
        if !pools.apply_fixups(&self.requirements(), rng) {
            return None;
        }

        let needed = Tier::ALL.map(|tier| self.composition.count(tier) * self.count);
        let mut chosen = pools.choose(needed, rng)?;

        let mut slices = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            let mut tiers = self.composition.tiers();
            tiers.shuffle(rng);

            let mut drawn: Vec<&TileInfo> = Vec::with_capacity(tiers.len());
            for tier in tiers {
                let pool = &mut chosen[tier.index()];
                let open: Vec<usize> = (0..pool.len())
                    .filter(|&i| {
                        !drawn
                            .iter()
                            .any(|t| SpecialTerrain::shares_group(t, pool[i]))
                    })
                    .collect();
                let &pick = open.choose(rng)?;
                drawn.push(pool.swap_remove(pick));
            }

            let mut totals = SliceTotals::default();
            for tile in &drawn {
                totals.add(tile);
            }
            if !totals.within(self.config) {
                return None;
            }
            slices.push(Slice::new(drawn.iter().map(|t| t.id).collect()));
        }
        Some(slices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tiles::StandardTileCatalog;
    use crate::draft::variant::DraftVariant;
    use ahash::AHashSet;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generates_balanced_slices() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let config = DraftConfig::new(DraftVariant::Milty, 6);
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let generated = SliceGenerator::new(&catalog, &config)
            .generate(&mut rng)
            .unwrap();

        assert_eq!(generated.slices.len(), 6);
        assert!(generated.attempts >= 1);
        let mut seen = AHashSet::new();
        for slice in &generated.slices {
            assert_eq!(slice.len(), 5);
            let totals = slice.totals(&catalog).unwrap();
            assert!(totals.within(&config.slices), "{:?}", totals);
            for &id in slice.tiles() {
                assert!(seen.insert(id), "tile {} reused", id);
            }
        }
    }

    #[test]
    fn test_slice_tier_composition() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let config = DraftConfig::new(DraftVariant::Milty, 4);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let generated = SliceGenerator::new(&catalog, &config)
            .generate(&mut rng)
            .unwrap();
        for slice in &generated.slices {
            let mut counts = [0usize; 4];
            for &id in slice.tiles() {
                counts[catalog.tile(id).unwrap().tier.index()] += 1;
            }
            assert_eq!(counts, [1, 1, 1, 2]);
        }
    }

    #[test]
    fn test_one_wormhole_per_group_per_slice() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let config = DraftConfig::new(DraftVariant::Milty, 6);
        for seed in 0..3 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let generated = SliceGenerator::new(&catalog, &config)
                .generate(&mut rng)
                .unwrap();
            for slice in &generated.slices {
                for group in SpecialTerrain::ALL {
                    let n = slice
                        .tiles()
                        .iter()
                        .filter(|&&id| group.matches(catalog.tile(id).unwrap()))
                        .count();
                    assert!(n <= 1, "{:?} appears {} times", group, n);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_slices() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let config = DraftConfig::new(DraftVariant::Milty, 5);
        let a = SliceGenerator::new(&catalog, &config)
            .generate(&mut ChaCha8Rng::seed_from_u64(5))
            .unwrap();
        let b = SliceGenerator::new(&catalog, &config)
            .generate(&mut ChaCha8Rng::seed_from_u64(5))
            .unwrap();
        assert_eq!(a.slices, b.slices);
        assert_eq!(a.attempts, b.attempts);
    }

    #[test]
    fn test_infeasible_minimum_rejected_up_front() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let mut config = DraftConfig::new(DraftVariant::Milty, 6);
        config.slices.min_legendary = 3;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = SliceGenerator::new(&catalog, &config)
            .generate(&mut rng)
            .unwrap_err();
        assert!(matches!(err, DraftError::Infeasible(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_too_many_slices_infeasible() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let mut config = DraftConfig::new(DraftVariant::Milty, 6);
        config.slices.count = Some(13);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            SliceGenerator::new(&catalog, &config).generate(&mut rng),
            Err(DraftError::Infeasible(_))
        ));
    }

    #[test]
    fn test_impossible_bounds_exhaust_attempts() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let mut config = DraftConfig::new(DraftVariant::Milty, 6);
        config.slices.min_total = 40.0;
        config.slices.max_total = 50.0;
        config.slices.max_attempts = 50;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = SliceGenerator::new(&catalog, &config)
            .generate(&mut rng)
            .unwrap_err();
        assert!(matches!(err, DraftError::GenerationFailed { attempts: 50 }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_slice_setter_and_swap() {
        let mut slice = Slice::new(vec![TileId(19), TileId(20), TileId(21)]);
        slice.set(1, TileId(40)).unwrap();
        slice.swap(0, 2);
        assert_eq!(slice.tiles(), &[TileId(21), TileId(40), TileId(19)]);
        assert!(slice.set(3, TileId(1)).is_err());
    }

    #[test]
    fn test_totals_unknown_tile() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let slice = Slice::new(vec![TileId(9999)]);
        assert!(matches!(
            slice.totals(&catalog),
            Err(DraftError::UnknownTile(TileId(9999)))
        ));
    }
}
