//! Anchor and rotate slices onto the shared map
//!
//! Each seat's shape is rotated so [`FORWARD`] points from the seat's home
//! anchor at its direction hex (the map center by default), then every body
//! offset is converted back to an absolute hex. Stateless: one call lays out
//! one draft.

use glam::Vec2;

use crate::core::error::{DraftError, Result};
use crate::core::types::TileId;
use crate::layout::shape::{ShapeTable, SliceShape, FORWARD};
use crate::map::assignment::MapAssignment;
use crate::map::hex::HexCoord;
use crate::map::seats::SeatGeometry;

/// Rotated offsets are rounded to this many steps per table unit (3 decimals)
const POSITION_PRECISION: f32 = 1000.0;

/// One seat's contribution to the map
#[derive(Debug, Clone)]
pub struct PlayerSlice<'a> {
    pub seat: usize,
    /// Body tiles in shape order
    pub tiles: &'a [TileId],
    /// Tile written at the anchor; placeholder when `None`
    pub home_tile: Option<TileId>,
}

fn round_position(v: Vec2) -> Vec2 {
    (v * POSITION_PRECISION).round() / POSITION_PRECISION
}

/// Angle that turns a shape authored along `FORWARD` to face `direction`
fn rotation(anchor: HexCoord, direction: HexCoord) -> f32 {
    let delta = direction.to_position() - anchor.to_position();
    if delta.length_squared() < f32::EPSILON {
        return 0.0;
    }
    let forward = FORWARD.to_position();
    delta.y.atan2(delta.x) - forward.y.atan2(forward.x)
}

/// Absolute hex of one shape offset for a slice anchored at `anchor`
pub fn place_offset(anchor: HexCoord, offset: HexCoord, direction: HexCoord) -> HexCoord {
    let turn = Vec2::from_angle(rotation(anchor, direction));
    let rotated = round_position(turn.rotate(offset.to_position()));
    HexCoord::from_position(anchor.to_position() + rotated)
}

/// Absolute hexes covered by `shape`, home first
pub fn place_shape(anchor: HexCoord, shape: &SliceShape, direction: HexCoord) -> Vec<HexCoord> {
    let turn = Vec2::from_angle(rotation(anchor, direction));
    let origin = anchor.to_position();
    shape
        .offsets()
        .iter()
        .enumerate()
        .map(|(i, offset)| {
            if i == 0 {
                anchor
            } else {
                let rotated = round_position(turn.rotate(offset.to_position()));
                HexCoord::from_position(origin + rotated)
            }
        })
        .collect()
}

/// Lays out slices using a resolved shape table
pub struct SliceLayout<'a> {
    shapes: &'a ShapeTable,
}

impl<'a> SliceLayout<'a> {
    pub fn new(shapes: &'a ShapeTable) -> Self {
        Self { shapes }
    }

    /// Home anchor hex of a seat
    pub fn anchor(&self, seats: &dyn SeatGeometry, seat: usize) -> Result<HexCoord> {
        seats
            .home_anchor(seat)
            .map(HexCoord::from_position)
            .ok_or(DraftError::InvalidSeat(seat))
    }

    /// Hexes a seat's slice occupies, home first
    pub fn seat_hexes(&self, seats: &dyn SeatGeometry, seat: usize) -> Result<Vec<HexCoord>> {
        let anchor = self.anchor(seats, seat)?;
        Ok(place_shape(
            anchor,
            self.shapes.shape_for(seat),
            self.shapes.direction_for(seat),
        ))
    }

    /// Hex of an extra offset (e.g. an equidistant system) relative to a seat
    pub fn seat_offset(
        &self,
        seats: &dyn SeatGeometry,
        seat: usize,
        offset: HexCoord,
    ) -> Result<HexCoord> {
        let anchor = self.anchor(seats, seat)?;
        Ok(place_offset(anchor, offset, self.shapes.direction_for(seat)))
    }

    /// Write every player's home and slice tiles into `map`.
    ///
    /// Fails on the first hex written twice; the map is left partially
    /// written and should be discarded.
    pub fn layout(
        &self,
        seats: &dyn SeatGeometry,
        players: &[PlayerSlice<'_>],
        map: &mut MapAssignment,
    ) -> Result<()> {
        for player in players {
            let shape = self.shapes.shape_for(player.seat);
            if player.tiles.len() != shape.body_len() {
                return Err(DraftError::InvalidConfig(vec![format!(
                    "seat {} slice has {} tiles, shape {} needs {}",
                    player.seat,
                    player.tiles.len(),
                    shape.name(),
                    shape.body_len()
                )]));
            }

            let hexes = self.seat_hexes(seats, player.seat)?;
            let home = player.home_tile.unwrap_or(TileId::HOME_PLACEHOLDER);
            map.place(hexes[0], home)?;
            for (hex, tile) in hexes[1..].iter().zip(player.tiles) {
                map.place(*hex, *tile)?;
            }
            tracing::debug!(
                "Placed seat {} slice {:?} at {}",
                player.seat,
                player.tiles,
                hexes[0]
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::shape::{SeatOverride, ShapeKind};
    use crate::map::index::{hex_count, index_of};
    use crate::map::seats::StandardSeats;
    use std::collections::HashSet;

    fn tiles(start: u32, n: u32) -> Vec<TileId> {
        (start..start + n).map(TileId).collect()
    }

    #[test]
    fn test_unrotated_seat_matches_shape() {
        // Seat at the top of the map already faces the center
        let anchor = HexCoord::new(0, -3);
        let shape = ShapeKind::Milty.shape();
        let hexes = place_shape(anchor, &shape, HexCoord::ORIGIN);
        let expected: Vec<HexCoord> = shape.offsets().iter().map(|o| anchor + *o).collect();
        assert_eq!(hexes, expected);
    }

    #[test]
    fn test_rotation_by_sixty_degrees() {
        let anchor = HexCoord::new(3, -3);
        let hex = place_offset(anchor, FORWARD, HexCoord::ORIGIN);
        // One step toward the center
        assert_eq!(hex, HexCoord::new(2, -2));
    }

    #[test]
    fn test_front_far_reaches_inner_ring() {
        let seats = StandardSeats::for_player_count(6).unwrap();
        let table = ShapeTable::new(ShapeKind::Milty.shape());
        let layout = SliceLayout::new(&table);
        for seat in 0..6 {
            let hexes = layout.seat_hexes(&seats, seat).unwrap();
            assert_eq!(hexes[5].distance(&HexCoord::ORIGIN), 1);
        }
    }

    #[test]
    fn test_six_players_fill_three_rings() {
        let seats = StandardSeats::for_player_count(6).unwrap();
        let table = ShapeTable::new(ShapeKind::Milty.shape());
        let layout = SliceLayout::new(&table);
        let slices: Vec<Vec<TileId>> = (0..6).map(|i| tiles(100 + i * 10, 5)).collect();
        let players: Vec<PlayerSlice> = slices
            .iter()
            .enumerate()
            .map(|(seat, t)| PlayerSlice {
                seat,
                tiles: t,
                home_tile: None,
            })
            .collect();

        let mut map = MapAssignment::new();
        layout.layout(&seats, &players, &mut map).unwrap();

        assert_eq!(map.tile_count(), 36);
        let indices: HashSet<usize> = map.tiles().map(|(hex, _)| index_of(hex)).collect();
        assert_eq!(indices, (1..hex_count(3)).collect::<HashSet<_>>());
    }

    #[test]
    fn test_layout_injective_for_all_standard_tables() {
        for n in 3..=8 {
            let seats = StandardSeats::for_player_count(n).unwrap();
            let mut table = ShapeTable::new(ShapeKind::Milty.shape());
            if n == 7 {
                table = table.with_override(&SeatOverride {
                    seat: 3,
                    shape: Some(ShapeKind::MiltyFlipped),
                    direction: Some(HexCoord::new(-2, 2)),
                });
            }
            let layout = SliceLayout::new(&table);
            let mut seen = HashSet::new();
            for seat in 0..n {
                for hex in layout.seat_hexes(&seats, seat).unwrap() {
                    assert!(seen.insert(hex), "{} players: {} reused", n, hex);
                    assert!(hex.distance(&HexCoord::ORIGIN) <= seats.map_radius());
                }
            }
        }
    }

    #[test]
    fn test_collision_reported() {
        let seats = StandardSeats::for_player_count(6).unwrap();
        let table = ShapeTable::new(ShapeKind::Milty.shape());
        let layout = SliceLayout::new(&table);
        let slice = tiles(19, 5);
        let players = vec![
            PlayerSlice {
                seat: 0,
                tiles: &slice,
                home_tile: None,
            },
            PlayerSlice {
                seat: 0,
                tiles: &slice,
                home_tile: None,
            },
        ];
        let mut map = MapAssignment::new();
        let err = layout.layout(&seats, &players, &mut map).unwrap_err();
        assert!(matches!(err, DraftError::HexCollision { .. }));
    }

    #[test]
    fn test_wrong_slice_length_rejected() {
        let seats = StandardSeats::for_player_count(6).unwrap();
        let table = ShapeTable::new(ShapeKind::Milty.shape());
        let layout = SliceLayout::new(&table);
        let slice = tiles(19, 4);
        let players = vec![PlayerSlice {
            seat: 0,
            tiles: &slice,
            home_tile: Some(TileId(1)),
        }];
        let mut map = MapAssignment::new();
        assert!(matches!(
            layout.layout(&seats, &players, &mut map),
            Err(DraftError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_unknown_seat() {
        let seats = StandardSeats::for_player_count(3).unwrap();
        let table = ShapeTable::new(ShapeKind::Milty.shape());
        let layout = SliceLayout::new(&table);
        assert!(matches!(
            layout.seat_hexes(&seats, 5),
            Err(DraftError::InvalidSeat(5))
        ));
    }
}
