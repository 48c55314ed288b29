//! Faction catalog

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{DraftError, Result};
use crate::core::types::TileId;

const STANDARD_FACTIONS: &str = include_str!("../../data/factions.toml");

/// A draftable faction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionInfo {
    /// Stable identifier, e.g. "argent" or "keleres_argent"
    pub nsid: String,
    #[serde(default)]
    pub name: String,
    /// Home system tile, used to detect factions already on the table
    #[serde(default)]
    pub home_tile: Option<TileId>,
    /// Shared faction this one is a flavor of
    #[serde(default)]
    pub umbrella: Option<String>,
    /// Base faction this flavor may not be drafted alongside
    #[serde(default)]
    pub conflicts_with: Option<String>,
}

impl FactionInfo {
    pub fn new(nsid: &str) -> Self {
        Self {
            nsid: nsid.to_string(),
            name: String::new(),
            home_tile: None,
            umbrella: None,
            conflicts_with: None,
        }
    }

    pub fn with_home_tile(mut self, tile: u32) -> Self {
        self.home_tile = Some(TileId(tile));
        self
    }

    pub fn with_flavor(mut self, umbrella: &str, conflicts_with: &str) -> Self {
        self.umbrella = Some(umbrella.to_string());
        self.conflicts_with = Some(conflicts_with.to_string());
        self
    }

    pub fn is_flavor(&self) -> bool {
        self.umbrella.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct TomlFactions {
    faction: Vec<FactionInfo>,
}

#[derive(Debug, Clone, Default)]
pub struct FactionCatalog {
    factions: Vec<FactionInfo>,
}

impl FactionCatalog {
    pub fn new(factions: Vec<FactionInfo>) -> Result<Self> {
        let mut errors = Vec::new();
        for (i, faction) in factions.iter().enumerate() {
            if factions[..i].iter().any(|f| f.nsid == faction.nsid) {
                errors.push(format!("duplicate faction {}", faction.nsid));
            }
            if faction.umbrella.is_some() != faction.conflicts_with.is_some() {
                errors.push(format!(
                    "faction {} must set both umbrella and conflicts_with",
                    faction.nsid
                ));
            }
        }
        if !errors.is_empty() {
            return Err(DraftError::InvalidConfig(errors));
        }
        Ok(Self { factions })
    }

    /// The built-in faction list
    pub fn standard() -> Result<Self> {
        Self::from_toml_str(STANDARD_FACTIONS)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let data: TomlFactions = toml::from_str(content)?;
        Self::new(data.faction)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn factions(&self) -> &[FactionInfo] {
        &self.factions
    }

    pub fn get(&self, nsid: &str) -> Option<&FactionInfo> {
        self.factions.iter().find(|f| f.nsid == nsid)
    }

    /// Faction whose home system is `tile`
    pub fn by_home_tile(&self, tile: TileId) -> Option<&FactionInfo> {
        self.factions.iter().find(|f| f.home_tile == Some(tile))
    }
}
