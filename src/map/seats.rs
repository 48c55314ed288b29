//! Seat geometry: where each player's home system sits on the map

use glam::Vec2;

use crate::core::error::{DraftError, Result};
use crate::map::hex::HexCoord;
use crate::map::index::hex_at;

/// Source of home anchors for each seat
pub trait SeatGeometry {
    fn player_count(&self) -> usize;

    /// Cartesian position of the seat's home system, `None` for an unknown seat
    fn home_anchor(&self, seat: usize) -> Option<Vec2>;

    /// Rings of the playable area around the center
    fn map_radius(&self) -> u32;
}

/// Home positions for the standard table layouts (3 to 8 players)
#[derive(Debug, Clone)]
pub struct StandardSeats {
    anchors: Vec<HexCoord>,
    map_radius: u32,
}

impl StandardSeats {
    pub const MIN_PLAYERS: usize = 3;
    pub const MAX_PLAYERS: usize = 8;

    pub fn for_player_count(player_count: usize) -> Result<Self> {
        // Map indices; 3-6 players sit on ring 3 corners, 7-8 on ring 4
        let (indices, map_radius): (&[usize], u32) = match player_count {
            3 => (&[19, 25, 31], 3),
            4 => (&[19, 22, 28, 31], 3),
            5 => (&[19, 22, 25, 28, 31], 3),
            6 => (&[19, 22, 25, 28, 31, 34], 3),
            7 => (&[37, 40, 44, 47, 50, 54, 57], 4),
            8 => (&[37, 40, 43, 46, 49, 52, 55, 58], 4),
            _ => {
                return Err(DraftError::InvalidConfig(vec![format!(
                    "player count {} outside {}..={}",
                    player_count,
                    Self::MIN_PLAYERS,
                    Self::MAX_PLAYERS
                )]))
            }
        };

        Ok(Self {
            anchors: indices.iter().map(|&i| hex_at(i)).collect(),
            map_radius,
        })
    }

    /// Home hex of a seat
    pub fn anchor_hex(&self, seat: usize) -> Option<HexCoord> {
        self.anchors.get(seat).copied()
    }
}

impl SeatGeometry for StandardSeats {
    fn player_count(&self) -> usize {
        self.anchors.len()
    }

    fn home_anchor(&self, seat: usize) -> Option<Vec2> {
        self.anchors.get(seat).map(HexCoord::to_position)
    }

    fn map_radius(&self) -> u32 {
        self.map_radius
    }
}
