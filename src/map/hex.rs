//! Cube-coordinate hex grid
//!
//! Flat-top hexagons addressed by (q, r, s) with q + r + s = 0. Cartesian
//! positions are table units with y growing towards the bottom of the table,
//! so increasing angles wind clockwise.

use glam::Vec2;
use nom::character::complete::{char, i32 as signed};
use nom::sequence::delimited;
use nom::{IResult, Parser};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

use crate::core::error::DraftError;

/// Distance from hex center to corner (table units)
pub const HEX_SIZE: f32 = 5.77735;

const SQRT_3: f32 = 1.732_050_8;

/// Cube hex coordinate
///
/// Fields are private so the q + r + s = 0 invariant cannot be broken after
/// construction. The canonical text form is `<q,r,s>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexCoord {
    q: i32,
    r: i32,
    s: i32,
}

/// Neighbor offsets, starting at "north" and winding clockwise
pub const DIRECTIONS: [HexCoord; 6] = [
    HexCoord::new(0, -1),
    HexCoord::new(1, -1),
    HexCoord::new(1, 0),
    HexCoord::new(0, 1),
    HexCoord::new(-1, 1),
    HexCoord::new(-1, 0),
];

impl HexCoord {
    pub const ORIGIN: HexCoord = HexCoord::new(0, 0);

    /// Axial constructor; s is derived
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// Full cube constructor, rejecting triples that do not sum to zero
    pub fn from_cube(q: i32, r: i32, s: i32) -> Result<Self, DraftError> {
        if q + r + s != 0 {
            return Err(DraftError::InvalidHexFormat(format!(
                "<{},{},{}> does not sum to zero",
                q, r, s
            )));
        }
        Ok(Self { q, r, s })
    }

    pub fn q(&self) -> i32 {
        self.q
    }

    pub fn r(&self) -> i32 {
        self.r
    }

    pub fn s(&self) -> i32 {
        self.s
    }

    /// Nearest hex to a cartesian position
    pub fn from_position(pos: Vec2) -> Self {
        let q = (2.0 / 3.0 * pos.x) / HEX_SIZE;
        let r = (-1.0 / 3.0 * pos.x + SQRT_3 / 3.0 * pos.y) / HEX_SIZE;
        Self::round(q, r, -q - r)
    }

    /// Center of this hex in cartesian space
    pub fn to_position(&self) -> Vec2 {
        let q = self.q as f32;
        let r = self.r as f32;
        Vec2::new(
            HEX_SIZE * (3.0 / 2.0 * q),
            HEX_SIZE * (SQRT_3 / 2.0 * q + SQRT_3 * r),
        )
    }

    /// The six corner points, starting at angle 0 and winding clockwise
    pub fn corners(&self) -> [Vec2; 6] {
        let center = self.to_position();
        std::array::from_fn(|i| {
            let angle = (60.0 * i as f32).to_radians();
            center + Vec2::from_angle(angle) * HEX_SIZE
        })
    }

    /// Get all 6 adjacent hexes
    pub fn neighbors(&self) -> [HexCoord; 6] {
        DIRECTIONS.map(|d| *self + d)
    }

    /// Distance in hex steps
    pub fn distance(&self, other: &HexCoord) -> u32 {
        let d = *self - *other;
        ((d.q.abs() + d.r.abs() + d.s.abs()) / 2) as u32
    }

    /// Round fractional cube coordinates to the nearest hex.
    ///
    /// Independent rounding can break q + r + s = 0, so the component with
    /// the largest rounding error is recomputed from the other two.
    fn round(q: f32, r: f32, s: f32) -> Self {
        let mut rq = q.round();
        let mut rr = r.round();
        let mut rs = s.round();

        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            rq = -rr - rs;
        } else if r_diff > s_diff {
            rr = -rq - rs;
        } else {
            rs = -rq - rr;
        }

        Self {
            q: rq as i32,
            r: rr as i32,
            s: rs as i32,
        }
    }
}

impl Add for HexCoord {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            q: self.q + rhs.q,
            r: self.r + rhs.r,
            s: self.s + rhs.s,
        }
    }
}

impl Sub for HexCoord {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            q: self.q - rhs.q,
            r: self.r - rhs.r,
            s: self.s - rhs.s,
        }
    }
}

impl Mul<i32> for HexCoord {
    type Output = Self;
    fn mul(self, k: i32) -> Self {
        Self {
            q: self.q * k,
            r: self.r * k,
            s: self.s * k,
        }
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{},{}>", self.q, self.r, self.s)
    }
}

fn hex_key(input: &str) -> IResult<&str, (i32, i32, i32)> {
    delimited(char('<'), (signed, char(','), signed, char(','), signed), char('>'))
        .parse(input)
        .map(|(rest, (q, _, r, _, s))| (rest, (q, r, s)))
}

impl FromStr for HexCoord {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match hex_key(s.trim()) {
            Ok(("", (q, r, s))) => HexCoord::from_cube(q, r, s),
            _ => Err(DraftError::InvalidHexFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for HexCoord {
    type Error = DraftError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexCoord> for String {
    fn from(hex: HexCoord) -> Self {
        hex.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_position() {
        let pos = HexCoord::ORIGIN.to_position();
        assert!(pos.x.abs() < 0.001);
        assert!(pos.y.abs() < 0.001);
    }

    #[test]
    fn test_position_roundtrip() {
        for hex in [
            HexCoord::new(3, -2),
            HexCoord::new(-4, 1),
            HexCoord::new(0, 5),
            HexCoord::new(-7, 7),
        ] {
            assert_eq!(HexCoord::from_position(hex.to_position()), hex);
        }
    }

    #[test]
    fn test_from_position_near_center_snaps() {
        let hex = HexCoord::new(2, -1);
        let nudged = hex.to_position() + Vec2::new(0.9, -1.1);
        assert_eq!(HexCoord::from_position(nudged), hex);
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let center = HexCoord::new(1, 2);
        for n in center.neighbors() {
            assert_eq!(center.distance(&n), 1);
            assert_eq!(n.q() + n.r() + n.s(), 0);
        }
    }

    #[test]
    fn test_first_neighbor_is_north() {
        let north = HexCoord::ORIGIN.neighbors()[0].to_position();
        assert!(north.x.abs() < 0.001);
        assert!(north.y < 0.0);
    }

    #[test]
    fn test_corners_at_hex_size() {
        let hex = HexCoord::new(-2, 1);
        let center = hex.to_position();
        let corners = hex.corners();
        for corner in corners {
            assert!((corner.distance(center) - HEX_SIZE).abs() < 0.001);
        }
        // angle 0 first
        assert!((corners[0].y - center.y).abs() < 0.001);
        assert!(corners[0].x > center.x);
    }

    #[test]
    fn test_distance() {
        assert_eq!(HexCoord::ORIGIN.distance(&HexCoord::new(2, 1)), 3);
        assert_eq!(HexCoord::ORIGIN.distance(&HexCoord::new(0, -3)), 3);
        assert_eq!(HexCoord::new(1, 1).distance(&HexCoord::new(1, 1)), 0);
    }

    #[test]
    fn test_display_and_parse() {
        let hex = HexCoord::new(-1, 3);
        assert_eq!(hex.to_string(), "<-1,3,-2>");
        assert_eq!("<-1,3,-2>".parse::<HexCoord>().unwrap(), hex);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "<1,2>", "1,-1,0", "<1,-1,0", "<a,b,c>", "<1,-1,0>x"] {
            assert!(
                matches!(bad.parse::<HexCoord>(), Err(DraftError::InvalidHexFormat(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_rejects_nonzero_sum() {
        assert!(matches!(
            "<1,1,1>".parse::<HexCoord>(),
            Err(DraftError::InvalidHexFormat(_))
        ));
    }

    #[test]
    fn test_serde_uses_hex_key() {
        let hex = HexCoord::new(2, -2);
        let json = serde_json::to_string(&hex).unwrap();
        assert_eq!(json, "\"<2,-2,0>\"");
        let back: HexCoord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hex);
    }
}
