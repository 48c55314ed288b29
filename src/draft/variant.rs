//! Draft variants: which shape, tier mix and fixed systems a draft uses

use serde::{Deserialize, Serialize};

use crate::core::config::SliceComposition;
use crate::core::error::Result;
use crate::layout::shape::{SeatOverride, ShapeKind, ShapeTable};
use crate::layout::slice_layout::SliceLayout;
use crate::map::hex::HexCoord;
use crate::map::seats::SeatGeometry;

/// Offset, relative to a seat's anchor, of the equidistant system it faces
pub const EQUIDISTANT_OFFSET: HexCoord = HexCoord::new(1, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftVariant {
    /// Five-tile slices, no shared systems
    #[default]
    Milty,
    /// Four-tile slices plus one shared equidistant system per seat
    MiltyEq,
}

impl DraftVariant {
    pub fn name(self) -> &'static str {
        match self {
            DraftVariant::Milty => "milty",
            DraftVariant::MiltyEq => "milty_eq",
        }
    }

    pub fn shape_kind(self) -> ShapeKind {
        match self {
            DraftVariant::Milty => ShapeKind::Milty,
            DraftVariant::MiltyEq => ShapeKind::MiltyEq,
        }
    }

    pub fn composition(self) -> SliceComposition {
        match self {
            DraftVariant::Milty => SliceComposition::STANDARD,
            DraftVariant::MiltyEq => SliceComposition::COMPACT,
        }
    }

    pub fn max_players(self) -> usize {
        match self {
            DraftVariant::Milty => 8,
            DraftVariant::MiltyEq => 6,
        }
    }

    pub fn fixed_count(self, player_count: usize) -> usize {
        match self {
            DraftVariant::Milty => 0,
            DraftVariant::MiltyEq => player_count,
        }
    }

    /// Overrides the variant needs to keep slices from overlapping
    pub fn seat_overrides(self, player_count: usize) -> Vec<SeatOverride> {
        match (self, player_count) {
            // Seat 3 sits on a ring-4 side; the default shape folds into itself
            (DraftVariant::Milty, 7) => vec![SeatOverride {
                seat: 3,
                shape: Some(ShapeKind::MiltyFlipped),
                direction: Some(HexCoord::new(-2, 2)),
            }],
            _ => Vec::new(),
        }
    }

    /// Shape table for a draft, variant overrides first then `extra`
    pub fn shape_table(self, player_count: usize, extra: &[SeatOverride]) -> ShapeTable {
        self.seat_overrides(player_count)
            .iter()
            .chain(extra)
            .fold(ShapeTable::new(self.shape_kind().shape()), |table, o| {
                table.with_override(o)
            })
    }

    /// Hexes of the fixed systems, one per seat in seat order
    pub fn fixed_positions(
        self,
        seats: &dyn SeatGeometry,
        shapes: &ShapeTable,
    ) -> Result<Vec<HexCoord>> {
        let layout = SliceLayout::new(shapes);
        (0..self.fixed_count(seats.player_count()))
            .map(|seat| layout.seat_offset(seats, seat, EQUIDISTANT_OFFSET))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::seats::StandardSeats;
    use std::collections::HashSet;

    #[test]
    fn test_seven_player_override() {
        let table = DraftVariant::Milty.shape_table(7, &[]);
        assert_eq!(table.shape_for(3).name(), "milty_flipped");
        assert_eq!(table.shape_for(2).name(), "milty");
        assert!(DraftVariant::Milty.shape_table(6, &[]).overridden_seats().next().is_none());
    }

    #[test]
    fn test_extra_overrides_win() {
        let extra = [SeatOverride {
            seat: 3,
            shape: Some(ShapeKind::Milty),
            direction: None,
        }];
        let table = DraftVariant::Milty.shape_table(7, &extra);
        assert_eq!(table.shape_for(3).name(), "milty");
        assert_eq!(table.direction_for(3), HexCoord::new(-2, 2));
    }

    #[test]
    fn test_direction_only_override_keeps_flipped_shape() {
        let extra = [SeatOverride {
            seat: 3,
            shape: None,
            direction: Some(HexCoord::new(-3, 3)),
        }];
        let table = DraftVariant::Milty.shape_table(7, &extra);
        assert_eq!(table.shape_for(3).name(), "milty_flipped");
        assert_eq!(table.direction_for(3), HexCoord::new(-3, 3));
    }

    #[test]
    fn test_eq_fixed_positions_distinct_and_clear_of_slices() {
        for n in 3..=6 {
            let seats = StandardSeats::for_player_count(n).unwrap();
            let table = DraftVariant::MiltyEq.shape_table(n, &[]);
            let fixed = DraftVariant::MiltyEq.fixed_positions(&seats, &table).unwrap();
            assert_eq!(fixed.len(), n);

            let layout = SliceLayout::new(&table);
            let mut seen = HashSet::new();
            for seat in 0..n {
                for hex in layout.seat_hexes(&seats, seat).unwrap() {
                    assert!(seen.insert(hex));
                }
            }
            for hex in fixed {
                assert!(seen.insert(hex), "{} players: fixed {} overlaps", n, hex);
                assert!(hex.distance(&HexCoord::ORIGIN) <= 3);
            }
        }
    }

    #[test]
    fn test_milty_has_no_fixed_positions() {
        let seats = StandardSeats::for_player_count(6).unwrap();
        let table = DraftVariant::Milty.shape_table(6, &[]);
        assert!(DraftVariant::Milty
            .fixed_positions(&seats, &table)
            .unwrap()
            .is_empty());
    }
}
