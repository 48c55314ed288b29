//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// System tile identifier as printed on the physical tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl TileId {
    /// Stand-in written at a home anchor when the seat's faction is not known yet
    pub const HOME_PLACEHOLDER: TileId = TileId(0);
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a draft session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DraftId(pub Uuid);

impl DraftId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarse balance classification of a system tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    High,
    Med,
    Low,
    Red,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::High, Tier::Med, Tier::Low, Tier::Red];

    /// Position in `Tier::ALL`, used to index per-tier arrays
    pub fn index(self) -> usize {
        match self {
            Tier::High => 0,
            Tier::Med => 1,
            Tier::Low => 2,
            Tier::Red => 3,
        }
    }
}

/// Wormhole class a tile provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wormhole {
    Alpha,
    Beta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_index_matches_all_order() {
        for (i, tier) in Tier::ALL.iter().enumerate() {
            assert_eq!(tier.index(), i);
        }
    }

    #[test]
    fn test_tile_id_display() {
        assert_eq!(TileId(42).to_string(), "42");
        assert_eq!(TileId::HOME_PLACEHOLDER.to_string(), "0");
    }

    #[test]
    fn test_draft_ids_unique() {
        assert_ne!(DraftId::new(), DraftId::new());
    }
}
