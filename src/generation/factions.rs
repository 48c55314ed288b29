//! Faction selection with flavor exclusivity
//!
//! Flavors of one umbrella faction (the Keleres variants) enter the shuffle
//! as a single placeholder. The placeholder resolves to a flavor whose base
//! faction has not been picked, and a base faction is skipped once its
//! flavor is in.

use ahash::AHashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::factions::{FactionCatalog, FactionInfo};
use crate::core::config::{DraftConfig, FactionConfig};
use crate::core::error::{DraftError, Result};
use crate::core::types::TileId;

#[derive(Debug, Clone)]
enum Entry<'a> {
    Faction(&'a FactionInfo),
    Umbrella(&'a str),
}

pub struct FactionGenerator<'a> {
    catalog: &'a FactionCatalog,
    config: &'a FactionConfig,
    count: usize,
}

impl<'a> FactionGenerator<'a> {
    pub fn new(catalog: &'a FactionCatalog, config: &'a DraftConfig) -> Self {
        Self {
            catalog,
            config: &config.factions,
            count: config.faction_count(),
        }
    }

    /// Override the number of factions requested
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    fn eligible(&self) -> Result<Vec<&'a FactionInfo>> {
        for nsid in &self.config.exclude {
            if self.catalog.get(nsid).is_none() {
                return Err(DraftError::UnknownFaction(nsid.clone()));
            }
        }
        Ok(self
            .catalog
            .factions()
            .iter()
            .filter(|f| !self.config.exclude.contains(&f.nsid))
            .collect())
    }

    fn on_table(
        &self,
        entry: &Entry<'a>,
        eligible: &[&'a FactionInfo],
        table: &AHashSet<TileId>,
    ) -> bool {
        let home_on_table = |f: &FactionInfo| f.home_tile.is_some_and(|t| table.contains(&t));
        match entry {
            Entry::Faction(f) => home_on_table(*f),
            Entry::Umbrella(name) => eligible
                .iter()
                .any(|f| f.umbrella.as_deref() == Some(*name) && home_on_table(*f)),
        }
    }

    /// Pick factions. `table` holds tiles already in play, used to seed
    /// factions whose home system is among them when configured.
    pub fn generate<R: Rng + ?Sized>(&self, table: &[TileId], rng: &mut R) -> Result<Vec<String>> {
        let eligible = self.eligible()?;

        let mut entries: Vec<Entry<'a>> = Vec::new();
        let mut umbrellas: Vec<&'a str> = Vec::new();
        for &faction in &eligible {
            match faction.umbrella.as_deref() {
                Some(umbrella) => {
                    if !umbrellas.contains(&umbrella) {
                        umbrellas.push(umbrella);
                        entries.push(Entry::Umbrella(umbrella));
                    }
                }
                None => entries.push(Entry::Faction(faction)),
            }
        }

        if entries.len() < self.count {
            return Err(DraftError::InsufficientFactions {
                requested: self.count,
                available: entries.len(),
            });
        }

        entries.shuffle(rng);
        if self.config.seed_from_table {
            let table: AHashSet<TileId> = table.iter().copied().collect();
            // Stable: shuffled order is kept within each half
            entries.sort_by_key(|e| !self.on_table(e, &eligible, &table));
        }

        let mut chosen: Vec<&'a FactionInfo> = Vec::with_capacity(self.count);
        for entry in entries {
            if chosen.len() == self.count {
                break;
            }
            match entry {
                Entry::Faction(faction) => {
                    let blocked = chosen
                        .iter()
                        .any(|c| c.conflicts_with.as_deref() == Some(faction.nsid.as_str()));
                    if blocked {
                        tracing::debug!("Skipping {}: a flavor of it is already in", faction.nsid);
                        continue;
                    }
                    chosen.push(faction);
                }
                Entry::Umbrella(umbrella) => {
                    let open: Vec<&'a FactionInfo> = eligible
                        .iter()
                        .copied()
                        .filter(|f| f.umbrella.as_deref() == Some(umbrella))
                        .filter(|f| {
                            !chosen
                                .iter()
                                .any(|c| f.conflicts_with.as_deref() == Some(c.nsid.as_str()))
                        })
                        .collect();
                    match open.choose(rng) {
                        Some(&flavor) => chosen.push(flavor),
                        None => tracing::debug!("No {} flavor left to offer", umbrella),
                    }
                }
            }
        }

        if chosen.len() < self.count {
            return Err(DraftError::InsufficientFactions {
                requested: self.count,
                available: chosen.len(),
            });
        }
        Ok(chosen.into_iter().map(|f| f.nsid.clone()).collect())
    }
}
