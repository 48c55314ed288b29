//! Spiral linearisation of the hex grid
//!
//! Index 0 is the center. Ring k starts at `k * <0,-1,1>` ("north") and walks
//! the ring clockwise, so the six corners of ring k sit at every k-th index.
//! This is the order tiles appear in a map string.

use crate::map::hex::{HexCoord, DIRECTIONS};

/// Number of hexes within `radius` rings of the center (center included)
pub fn hex_count(radius: u32) -> usize {
    let r = radius as usize;
    3 * r * (r + 1) + 1
}

/// Hexes of ring `radius` in map order
pub fn ring(radius: u32) -> Vec<HexCoord> {
    if radius == 0 {
        return vec![HexCoord::ORIGIN];
    }
    let k = radius as i32;
    let mut hex = DIRECTIONS[0] * k;
    let mut out = Vec::with_capacity(6 * radius as usize);
    // Walking from corner i to corner i+1 moves along DIRECTIONS[i + 2].
    for side in 0..6 {
        let step = DIRECTIONS[(side + 2) % 6];
        for _ in 0..radius {
            out.push(hex);
            hex = hex + step;
        }
    }
    out
}

/// All hexes within `radius` rings, in map order
pub fn spiral(radius: u32) -> Vec<HexCoord> {
    (0..=radius).flat_map(ring).collect()
}

/// Map index of a hex
pub fn index_of(hex: HexCoord) -> usize {
    let k = hex.distance(&HexCoord::ORIGIN);
    if k == 0 {
        return 0;
    }
    let base = hex_count(k - 1);
    let offset = ring(k)
        .iter()
        .position(|h| *h == hex)
        .unwrap_or_default();
    base + offset
}

/// Hex at a map index
pub fn hex_at(index: usize) -> HexCoord {
    let mut k = 0;
    while hex_count(k) <= index {
        k += 1;
    }
    if k == 0 {
        return HexCoord::ORIGIN;
    }
    ring(k)[index - hex_count(k - 1)]
}
