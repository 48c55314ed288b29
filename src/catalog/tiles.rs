//! System tile catalog
//!
//! The catalog is the source of truth for tile attributes. Generators query it
//! per use and never own tiles themselves.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{DraftError, Result};
use crate::core::types::{TileId, Tier, Wormhole};

const STANDARD_TILES: &str = include_str!("../../data/tiles.toml");

/// Attributes of one system tile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileInfo {
    pub id: TileId,
    pub name: String,
    pub tier: Tier,
    /// Optimal resource value
    pub resources: f32,
    /// Optimal influence value
    pub influence: f32,
    pub wormhole: Option<Wormhole>,
    pub legendary: bool,
    pub anomaly: bool,
}

impl TileInfo {
    pub fn new(id: u32, tier: Tier, resources: f32, influence: f32) -> Self {
        Self {
            id: TileId(id),
            name: String::new(),
            tier,
            resources,
            influence,
            wormhole: None,
            legendary: false,
            anomaly: false,
        }
    }

    pub fn with_wormhole(mut self, wormhole: Wormhole) -> Self {
        self.wormhole = Some(wormhole);
        self
    }

    pub fn with_legendary(mut self) -> Self {
        self.legendary = true;
        self
    }

    pub fn with_anomaly(mut self) -> Self {
        self.anomaly = true;
        self
    }

    pub fn total(&self) -> f32 {
        self.resources + self.influence
    }
}

/// Optimal (resources, influence) for a list of (resources, influence) planets.
///
/// Each planet is exhausted for whichever value is higher; ties count half
/// toward each.
pub fn optimal_values(planets: &[(u32, u32)]) -> (f32, f32) {
    planets
        .iter()
        .fold((0.0, 0.0), |(res, inf), &(r, i)| match r.cmp(&i) {
            std::cmp::Ordering::Greater => (res + r as f32, inf),
            std::cmp::Ordering::Less => (res, inf + i as f32),
            std::cmp::Ordering::Equal => (res + r as f32 / 2.0, inf + i as f32 / 2.0),
        })
}

/// Supplier of draftable system tiles
pub trait TileCatalog {
    fn tiles(&self) -> &[TileInfo];

    fn tile(&self, id: TileId) -> Option<&TileInfo> {
        self.tiles().iter().find(|t| t.id == id)
    }
}

#[derive(Debug, Deserialize)]
struct TomlTiles {
    tile: Vec<TomlTile>,
}

#[derive(Debug, Deserialize)]
struct TomlTile {
    id: u32,
    #[serde(default)]
    name: String,
    tier: Tier,
    #[serde(default)]
    planets: Vec<(u32, u32)>,
    #[serde(default)]
    wormhole: Option<Wormhole>,
    #[serde(default)]
    legendary: bool,
    #[serde(default)]
    anomaly: bool,
}

impl TomlTile {
    fn into_tile_info(self) -> TileInfo {
        let (resources, influence) = optimal_values(&self.planets);
        TileInfo {
            id: TileId(self.id),
            name: self.name,
            tier: self.tier,
            resources,
            influence,
            wormhole: self.wormhole,
            legendary: self.legendary,
            anomaly: self.anomaly,
        }
    }
}

/// In-memory catalog backed by TOML tile data
#[derive(Debug, Clone)]
pub struct StandardTileCatalog {
    tiles: Vec<TileInfo>,
    by_id: AHashMap<TileId, usize>,
}

impl StandardTileCatalog {
    pub fn new(tiles: Vec<TileInfo>) -> Result<Self> {
        let mut by_id = AHashMap::with_capacity(tiles.len());
        let mut errors = Vec::new();
        for (i, tile) in tiles.iter().enumerate() {
            if by_id.insert(tile.id, i).is_some() {
                errors.push(format!("duplicate tile id {}", tile.id));
            }
        }
        if !errors.is_empty() {
            return Err(DraftError::InvalidConfig(errors));
        }
        Ok(Self { tiles, by_id })
    }

    /// The built-in base game + expansion tile set
    pub fn standard() -> Result<Self> {
        Self::from_toml_str(STANDARD_TILES)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let data: TomlTiles = toml::from_str(content)?;
        Self::new(data.tile.into_iter().map(TomlTile::into_tile_info).collect())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

impl TileCatalog for StandardTileCatalog {
    fn tiles(&self) -> &[TileInfo] {
        &self.tiles
    }

    fn tile(&self, id: TileId) -> Option<&TileInfo> {
        self.by_id.get(&id).map(|&i| &self.tiles[i])
    }
}
