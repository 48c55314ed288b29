//! Sparse hex -> tile assignment and map-string serialisation

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{DraftError, Result};
use crate::core::types::TileId;
use crate::map::hex::HexCoord;
use crate::map::index::{hex_at, hex_count, index_of};

/// Contents of one map position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapSlot {
    /// Nothing written yet
    #[default]
    Unassigned,
    /// Explicitly empty space inside the playable area
    Empty,
    Tile(TileId),
}

impl fmt::Display for MapSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapSlot::Unassigned => write!(f, "unassigned"),
            MapSlot::Empty => write!(f, "empty"),
            MapSlot::Tile(tile) => write!(f, "tile {}", tile),
        }
    }
}

/// Map assignment indexed by spiral map index
///
/// Every hex is written at most once; a second write is a layout bug and is
/// reported as a collision instead of overwriting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapAssignment {
    slots: Vec<MapSlot>,
}

impl MapAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a tile at `hex`
    pub fn place(&mut self, hex: HexCoord, tile: TileId) -> Result<()> {
        let index = index_of(hex);
        if index >= self.slots.len() {
            self.slots.resize(index + 1, MapSlot::Unassigned);
        }
        match self.slots[index] {
            MapSlot::Unassigned => {
                self.slots[index] = MapSlot::Tile(tile);
                Ok(())
            }
            existing => Err(DraftError::HexCollision {
                hex,
                existing,
                incoming: tile,
            }),
        }
    }

    pub fn get(&self, hex: HexCoord) -> MapSlot {
        self.slots
            .get(index_of(hex))
            .copied()
            .unwrap_or(MapSlot::Unassigned)
    }

    /// Tile at `hex`, if any
    pub fn tile_at(&self, hex: HexCoord) -> Option<TileId> {
        match self.get(hex) {
            MapSlot::Tile(tile) => Some(tile),
            _ => None,
        }
    }

    /// Mark every unassigned hex within `radius` rings as empty
    pub fn fill_empty(&mut self, radius: u32) {
        let count = hex_count(radius);
        if self.slots.len() < count {
            self.slots.resize(count, MapSlot::Unassigned);
        }
        for slot in self.slots.iter_mut().take(count) {
            if *slot == MapSlot::Unassigned {
                *slot = MapSlot::Empty;
            }
        }
    }

    /// Iterate over placed tiles as (hex, tile)
    pub fn tiles(&self) -> impl Iterator<Item = (HexCoord, TileId)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            MapSlot::Tile(tile) => Some((hex_at(i), *tile)),
            _ => None,
        })
    }

    /// Number of placed tiles
    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Serialise to the space-separated map string.
    ///
    /// The center is always emitted first in braces (`{-1}` when no center
    /// tile was placed). Trailing unassigned positions are dropped.
    pub fn to_map_string(&self) -> String {
        let last = self
            .slots
            .iter()
            .rposition(|slot| *slot != MapSlot::Unassigned)
            .unwrap_or(0);

        let token = |slot: Option<&MapSlot>| match slot {
            Some(MapSlot::Tile(tile)) => tile.to_string(),
            _ => "-1".to_string(),
        };

        let mut tokens = Vec::with_capacity(last + 1);
        tokens.push(format!("{{{}}}", token(self.slots.first())));
        for index in 1..=last {
            tokens.push(token(self.slots.get(index)));
        }
        tokens.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_get() {
        let mut map = MapAssignment::new();
        let hex = HexCoord::new(1, -1);
        map.place(hex, TileId(25)).unwrap();
        assert_eq!(map.get(hex), MapSlot::Tile(TileId(25)));
        assert_eq!(map.tile_at(hex), Some(TileId(25)));
        assert_eq!(map.get(HexCoord::new(5, -5)), MapSlot::Unassigned);
    }

    #[test]
    fn test_collision_is_error() {
        let mut map = MapAssignment::new();
        let hex = HexCoord::new(0, 2);
        map.place(hex, TileId(19)).unwrap();
        let err = map.place(hex, TileId(20)).unwrap_err();
        match err {
            DraftError::HexCollision {
                hex: at,
                existing,
                incoming,
            } => {
                assert_eq!(at, hex);
                assert_eq!(existing, MapSlot::Tile(TileId(19)));
                assert_eq!(incoming, TileId(20));
            }
            other => panic!("unexpected error {:?}", other),
        }
        // Original tile kept
        assert_eq!(map.tile_at(hex), Some(TileId(19)));
    }

    #[test]
    fn test_empty_map_string() {
        assert_eq!(MapAssignment::new().to_map_string(), "{-1}");
    }

    #[test]
    fn test_map_string_center_and_gaps() {
        let mut map = MapAssignment::new();
        map.place(HexCoord::ORIGIN, TileId(18)).unwrap();
        map.place(hex_at(3), TileId(40)).unwrap();
        assert_eq!(map.to_map_string(), "{18} -1 -1 40");
    }

    #[test]
    fn test_fill_empty_extends_string() {
        let mut map = MapAssignment::new();
        map.place(hex_at(2), TileId(26)).unwrap();
        map.fill_empty(1);
        assert_eq!(map.to_map_string(), "{-1} -1 26 -1 -1 -1 -1");
        assert_eq!(map.tile_count(), 1);
    }

    #[test]
    fn test_cannot_place_over_empty() {
        let mut map = MapAssignment::new();
        map.fill_empty(1);
        assert!(map.place(hex_at(4), TileId(30)).is_err());
    }
}
