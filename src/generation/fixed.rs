//! Fixed (shared equidistant) system generation
//!
//! Each fixed system is a single tile. Wormhole and legendary minimums are
//! met first, then every remaining position draws a weighted random tier.
//! Tiles already in player slices are never eligible.

use ahash::AHashSet;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::tiles::{TileCatalog, TileInfo};
use crate::core::config::{DraftConfig, FixedConfig};
use crate::core::error::{DraftError, Result};
use crate::core::types::{Tier, TileId};
use crate::generation::pools::{candidate_count, Requirement, SpecialTerrain, TierPools};
use crate::generation::slices::Slice;

pub struct FixedSystemsGenerator<'a> {
    catalog: &'a dyn TileCatalog,
    config: &'a FixedConfig,
    count: usize,
}

impl<'a> FixedSystemsGenerator<'a> {
    pub fn new(catalog: &'a dyn TileCatalog, config: &'a DraftConfig) -> Self {
        Self {
            catalog,
            config: &config.fixed,
            count: config.fixed_count(),
        }
    }

    fn tier_weight(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Red => self.config.red_weight,
            _ => self.config.tier_weight,
        }
    }

    /// Alpha/beta split of the wormhole minimum; an odd one out goes to a
    /// random class
    fn requirements<R: Rng + ?Sized>(&self, rng: &mut R) -> [Requirement; 3] {
        let half = self.config.min_wormholes / 2;
        let (mut alpha, mut beta) = (half, half);
        if self.config.min_wormholes % 2 == 1 {
            if rng.gen_bool(0.5) {
                alpha += 1;
            } else {
                beta += 1;
            }
        }
        [
            Requirement::new(SpecialTerrain::Alpha, alpha),
            Requirement::new(SpecialTerrain::Beta, beta),
            Requirement::new(SpecialTerrain::Legendary, self.config.min_legendary),
        ]
    }

    /// Reject minimums no draw can meet.
    ///
    /// `reserved` holds what the player slices take from the same groups.
    /// An odd wormhole minimum may land on either class, so each class is
    /// checked with the larger half.
    pub fn check_feasible(&self, reserved: &[Requirement]) -> Result<()> {
        if self.count == 0 {
            return Ok(());
        }
        if self.config.min_wormholes + self.config.min_legendary > self.count {
            return Err(DraftError::Infeasible(format!(
                "{} fixed systems cannot hold {} wormholes and {} legendaries",
                self.count, self.config.min_wormholes, self.config.min_legendary
            )));
        }

        let wormholes = self.config.min_wormholes.div_ceil(2);
        for terrain in SpecialTerrain::ALL {
            let fixed = match terrain {
                SpecialTerrain::Alpha | SpecialTerrain::Beta => wormholes,
                SpecialTerrain::Legendary => self.config.min_legendary,
            };
            if fixed == 0 {
                continue;
            }
            let sliced: usize = reserved
                .iter()
                .filter(|r| r.terrain == terrain)
                .map(|r| r.count)
                .sum();
            let candidates = candidate_count(self.catalog, terrain);
            if sliced + fixed > candidates {
                return Err(DraftError::Infeasible(format!(
                    "slices need {} and fixed systems up to {} {:?} tiles, catalog has {}",
                    sliced, fixed, terrain, candidates
                )));
            }
        }
        Ok(())
    }

    /// Draw fixed systems from tiles no slice uses.
    ///
    /// Fails with `GenerationFailed` when the leftover pool cannot meet the
    /// minimums; drawing new slices may leave a better pool.
    pub fn generate<R: Rng + ?Sized>(&self, slices: &[Slice], rng: &mut R) -> Result<Vec<TileId>> {
        if self.count == 0 {
            return Ok(Vec::new());
        }
        self.check_feasible(&[])?;

        let used: AHashSet<TileId> = slices
            .iter()
            .flat_map(|s| s.tiles().iter().copied())
            .collect();
        let mut pools = TierPools::from_catalog(self.catalog, &used);
        if !pools.apply_fixups(&self.requirements(rng), rng) {
            tracing::debug!("Leftover tiles cannot meet fixed system minimums");
            return Err(DraftError::GenerationFailed { attempts: 1 });
        }

        let (mut available, required) = pools.into_parts();
        let mut fixed: Vec<&TileInfo> = required.into_iter().flatten().collect();

        while fixed.len() < self.count {
            let tiers: Vec<Tier> = Tier::ALL
                .into_iter()
                .filter(|t| !available[t.index()].is_empty() && self.tier_weight(*t) > 0)
                .collect();
            if tiers.is_empty() {
                return Err(DraftError::GenerationFailed { attempts: 1 });
            }
            let weights = WeightedIndex::new(tiers.iter().map(|&t| self.tier_weight(t)))
                .map_err(|e| DraftError::InvalidConfig(vec![format!("fixed tier weights: {}", e)]))?;
            let tier = tiers[weights.sample(rng)];

            let pool = &mut available[tier.index()];
            let pick = rng.gen_range(0..pool.len());
            fixed.push(pool.swap_remove(pick));
        }

        fixed.shuffle(rng);
        tracing::debug!("Drew {} fixed systems", fixed.len());
        Ok(fixed.into_iter().map(|t| t.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tiles::StandardTileCatalog;
    use crate::draft::variant::DraftVariant;
    use crate::generation::slices::SliceGenerator;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_milty_has_no_fixed_systems() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let config = DraftConfig::new(DraftVariant::Milty, 6);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let fixed = FixedSystemsGenerator::new(&catalog, &config)
            .generate(&[], &mut rng)
            .unwrap();
        assert!(fixed.is_empty());
    }

    #[test]
    fn test_fixed_meets_wormhole_minimum() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let config = DraftConfig::new(DraftVariant::MiltyEq, 6);
        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let fixed = FixedSystemsGenerator::new(&catalog, &config)
                .generate(&[], &mut rng)
                .unwrap();
            assert_eq!(fixed.len(), 6);
            let wormholes = fixed
                .iter()
                .filter(|&&id| catalog.tile(id).unwrap().wormhole.is_some())
                .count();
            assert!(wormholes >= 2);
            let unique: AHashSet<TileId> = fixed.iter().copied().collect();
            assert_eq!(unique.len(), 6);
        }
    }

    #[test]
    fn test_odd_wormhole_minimum_split() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let mut config = DraftConfig::new(DraftVariant::MiltyEq, 4);
        config.fixed.min_wormholes = 3;
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let generator = FixedSystemsGenerator::new(&catalog, &config);
        let reqs = generator.requirements(&mut rng);
        assert_eq!(reqs[0].count + reqs[1].count, 3);
        assert!(reqs[0].count.abs_diff(reqs[1].count) == 1);
    }

    #[test]
    fn test_fixed_never_reuses_slice_tiles() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let config = DraftConfig::new(DraftVariant::MiltyEq, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let slices = SliceGenerator::new(&catalog, &config)
            .generate(&mut rng)
            .unwrap()
            .slices;
        let used: AHashSet<TileId> = slices.iter().flat_map(|s| s.tiles().to_vec()).collect();

        for _ in 0..10 {
            match FixedSystemsGenerator::new(&catalog, &config).generate(&slices, &mut rng) {
                Ok(fixed) => assert!(fixed.iter().all(|t| !used.contains(t))),
                Err(err) => assert!(err.is_retryable()),
            }
        }
    }

    #[test]
    fn test_only_red_when_blue_weight_zero() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let mut config = DraftConfig::new(DraftVariant::MiltyEq, 6);
        config.fixed.min_wormholes = 0;
        config.fixed.tier_weight = 0;
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let fixed = FixedSystemsGenerator::new(&catalog, &config)
            .generate(&[], &mut rng)
            .unwrap();
        assert!(fixed
            .iter()
            .all(|&id| catalog.tile(id).unwrap().tier == Tier::Red));
    }

    #[test]
    fn test_too_many_minimums_infeasible() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let mut config = DraftConfig::new(DraftVariant::MiltyEq, 3);
        config.fixed.min_wormholes = 4;
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        assert!(matches!(
            FixedSystemsGenerator::new(&catalog, &config).generate(&[], &mut rng),
            Err(DraftError::Infeasible(_))
        ));
    }

    #[test]
    fn test_slice_and_fixed_wormholes_checked_together() {
        let catalog = StandardTileCatalog::standard().unwrap();
        let mut config = DraftConfig::new(DraftVariant::MiltyEq, 6);
        config.fixed.min_wormholes = 4;
        let slices = SliceGenerator::new(&catalog, &config);
        let slice_reqs = slices.requirements();
        let fixed = FixedSystemsGenerator::new(&catalog, &config);

        // Fine alone, too many once the slices take their share
        assert!(fixed.check_feasible(&[]).is_ok());
        let err = fixed.check_feasible(&slice_reqs).unwrap_err();
        assert!(matches!(err, DraftError::Infeasible(_)));
        assert!(!err.is_retryable());

        config.fixed.min_wormholes = 2;
        let fixed = FixedSystemsGenerator::new(&catalog, &config);
        assert!(fixed.check_feasible(&slice_reqs).is_ok());
    }
}
