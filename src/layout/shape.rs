//! Slice shapes and per-seat shape overrides
//!
//! A shape is an ordered list of hex offsets around an implicit anchor at
//! `<0,0,0>`. The first entry is the home system, the rest are the slice body
//! in wind order. Shapes are drawn pointing at [`FORWARD`]; layout rotates
//! them to face each seat's direction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::{DraftError, Result};
use crate::map::hex::HexCoord;

/// Direction every shape is authored facing
pub const FORWARD: HexCoord = HexCoord::new(0, 1);

/// Built-in shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Home, left, front, right, left-equidistant, front-far
    Milty,
    /// Mirror image of `Milty`; the equidistant tile sits on the right
    MiltyFlipped,
    /// `Milty` without the equidistant tile
    MiltyEq,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Milty => "milty",
            ShapeKind::MiltyFlipped => "milty_flipped",
            ShapeKind::MiltyEq => "milty_eq",
        }
    }

    pub fn shape(self) -> SliceShape {
        let offsets = match self {
            ShapeKind::Milty => vec![
                HexCoord::ORIGIN,
                HexCoord::new(1, 0),
                HexCoord::new(0, 1),
                HexCoord::new(-1, 1),
                HexCoord::new(1, 1),
                HexCoord::new(0, 2),
            ],
            // Mirrored body order keeps the same adjacency between indices
            ShapeKind::MiltyFlipped => vec![
                HexCoord::ORIGIN,
                HexCoord::new(-1, 1),
                HexCoord::new(0, 1),
                HexCoord::new(1, 0),
                HexCoord::new(-1, 2),
                HexCoord::new(0, 2),
            ],
            ShapeKind::MiltyEq => vec![
                HexCoord::ORIGIN,
                HexCoord::new(1, 0),
                HexCoord::new(0, 1),
                HexCoord::new(-1, 1),
                HexCoord::new(0, 2),
            ],
        };
        SliceShape {
            name: self.name().to_string(),
            offsets,
        }
    }
}

/// Named ordered list of hex offsets
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SliceShape {
    name: String,
    offsets: Vec<HexCoord>,
}

impl SliceShape {
    pub fn new(name: &str, offsets: Vec<HexCoord>) -> Result<Self> {
        let mut errors = Vec::new();
        if offsets.first() != Some(&HexCoord::ORIGIN) {
            errors.push(format!("shape {} must start with the home offset <0,0,0>", name));
        }
        if offsets.len() < 2 {
            errors.push(format!("shape {} has no body offsets", name));
        }
        for (i, offset) in offsets.iter().enumerate() {
            if offsets[..i].contains(offset) {
                errors.push(format!("shape {} repeats offset {}", name, offset));
            }
        }
        if !errors.is_empty() {
            return Err(DraftError::InvalidConfig(errors));
        }
        Ok(Self {
            name: name.to_string(),
            offsets,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All offsets, home first
    pub fn offsets(&self) -> &[HexCoord] {
        &self.offsets
    }

    /// Offsets of the slice body (home excluded)
    pub fn body(&self) -> &[HexCoord] {
        &self.offsets[1..]
    }

    /// Number of tiles a slice for this shape holds
    pub fn body_len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Index pairs (into the body) of hex-adjacent positions
    pub fn adjacent_body_pairs(&self) -> Vec<(usize, usize)> {
        let body = self.body();
        let mut pairs = Vec::new();
        for i in 0..body.len() {
            for j in (i + 1)..body.len() {
                if body[i].distance(&body[j]) == 1 {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Whether body positions `a` and `b` are hex-adjacent
    pub fn body_adjacent(&self, a: usize, b: usize) -> bool {
        let body = self.body();
        body[a].distance(&body[b]) == 1
    }
}

/// One seat's deviation from the draft's default shape and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatOverride {
    pub seat: usize,
    #[serde(default)]
    pub shape: Option<ShapeKind>,
    /// Hex the slice should face instead of the map center
    #[serde(default)]
    pub direction: Option<HexCoord>,
}

#[derive(Debug, Clone)]
struct ResolvedOverride {
    shape: Option<SliceShape>,
    direction: Option<HexCoord>,
}

/// Shape and facing for every seat, resolved once when the draft starts
#[derive(Debug, Clone)]
pub struct ShapeTable {
    default: SliceShape,
    overrides: BTreeMap<usize, ResolvedOverride>,
}

impl ShapeTable {
    pub fn new(default: SliceShape) -> Self {
        Self {
            default,
            overrides: BTreeMap::new(),
        }
    }

    /// Add a seat override. Fields left unset keep any earlier override of
    /// the same seat.
    pub fn with_override(mut self, seat_override: &SeatOverride) -> Self {
        let entry = self
            .overrides
            .entry(seat_override.seat)
            .or_insert(ResolvedOverride {
                shape: None,
                direction: None,
            });
        if let Some(kind) = seat_override.shape {
            entry.shape = Some(kind.shape());
        }
        if let Some(direction) = seat_override.direction {
            entry.direction = Some(direction);
        }
        self
    }

    pub fn default_shape(&self) -> &SliceShape {
        &self.default
    }

    pub fn shape_for(&self, seat: usize) -> &SliceShape {
        self.overrides
            .get(&seat)
            .and_then(|o| o.shape.as_ref())
            .unwrap_or(&self.default)
    }

    /// Hex the seat's slice faces; the map center unless overridden
    pub fn direction_for(&self, seat: usize) -> HexCoord {
        self.overrides
            .get(&seat)
            .and_then(|o| o.direction)
            .unwrap_or(HexCoord::ORIGIN)
    }

    pub fn overridden_seats(&self) -> impl Iterator<Item = usize> + '_ {
        self.overrides.keys().copied()
    }

    /// Problems with the table for `player_count` seats
    pub fn validate(&self, player_count: usize) -> Vec<String> {
        let mut errors = Vec::new();
        for (&seat, o) in &self.overrides {
            if seat >= player_count {
                errors.push(format!(
                    "shape override for seat {} but only {} players",
                    seat, player_count
                ));
            }
            if let Some(shape) = &o.shape {
                if shape.body_len() != self.default.body_len() {
                    errors.push(format!(
                        "seat {} shape {} holds {} tiles, default {} holds {}",
                        seat,
                        shape.name(),
                        shape.body_len(),
                        self.default.name(),
                        self.default.body_len()
                    ));
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_shapes_valid() {
        for kind in [ShapeKind::Milty, ShapeKind::MiltyFlipped, ShapeKind::MiltyEq] {
            let shape = kind.shape();
            assert!(SliceShape::new(shape.name(), shape.offsets().to_vec()).is_ok());
            assert_eq!(shape.offsets()[0], HexCoord::ORIGIN);
        }
        assert_eq!(ShapeKind::Milty.shape().body_len(), 5);
        assert_eq!(ShapeKind::MiltyEq.shape().body_len(), 4);
    }

    #[test]
    fn test_flipped_shape_keeps_adjacency() {
        assert_eq!(
            ShapeKind::Milty.shape().adjacent_body_pairs(),
            ShapeKind::MiltyFlipped.shape().adjacent_body_pairs()
        );
    }

    #[test]
    fn test_milty_adjacency() {
        let pairs = ShapeKind::Milty.shape().adjacent_body_pairs();
        assert_eq!(pairs, vec![(0, 1), (0, 3), (1, 2), (1, 3), (1, 4), (3, 4)]);
        let shape = ShapeKind::Milty.shape();
        assert!(!shape.body_adjacent(0, 2));
        assert!(shape.body_adjacent(3, 4));
    }

    #[test]
    fn test_invalid_shapes_rejected() {
        assert!(SliceShape::new("no_home", vec![HexCoord::new(1, 0)]).is_err());
        assert!(SliceShape::new("home_only", vec![HexCoord::ORIGIN]).is_err());
        assert!(SliceShape::new(
            "repeat",
            vec![HexCoord::ORIGIN, HexCoord::new(0, 1), HexCoord::new(0, 1)]
        )
        .is_err());
    }

    #[test]
    fn test_shape_table_overrides() {
        let table = ShapeTable::new(ShapeKind::Milty.shape()).with_override(&SeatOverride {
            seat: 3,
            shape: Some(ShapeKind::MiltyFlipped),
            direction: Some(HexCoord::new(-2, 2)),
        });
        assert_eq!(table.shape_for(0).name(), "milty");
        assert_eq!(table.shape_for(3).name(), "milty_flipped");
        assert_eq!(table.direction_for(0), HexCoord::ORIGIN);
        assert_eq!(table.direction_for(3), HexCoord::new(-2, 2));
        assert!(table.validate(7).is_empty());
        assert_eq!(table.validate(3).len(), 1);
    }

    #[test]
    fn test_shape_table_rejects_mismatched_length() {
        let table = ShapeTable::new(ShapeKind::Milty.shape()).with_override(&SeatOverride {
            seat: 0,
            shape: Some(ShapeKind::MiltyEq),
            direction: None,
        });
        assert_eq!(table.validate(6).len(), 1);
    }

    #[test]
    fn test_later_override_merges_fields() {
        let table = ShapeTable::new(ShapeKind::Milty.shape())
            .with_override(&SeatOverride {
                seat: 3,
                shape: Some(ShapeKind::MiltyFlipped),
                direction: Some(HexCoord::new(-2, 2)),
            })
            .with_override(&SeatOverride {
                seat: 3,
                shape: None,
                direction: Some(HexCoord::new(-1, 1)),
            });
        assert_eq!(table.shape_for(3).name(), "milty_flipped");
        assert_eq!(table.direction_for(3), HexCoord::new(-1, 1));

        let table = table.with_override(&SeatOverride {
            seat: 3,
            shape: Some(ShapeKind::Milty),
            direction: None,
        });
        assert_eq!(table.shape_for(3).name(), "milty");
        assert_eq!(table.direction_for(3), HexCoord::new(-1, 1));
    }
}
